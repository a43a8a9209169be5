//! Pixel identity and the rectangular color grid consumed by the segmenter.
//!
//! Pixels are addressed two ways: by [`Position`] (row, column) and by
//! [`PixelId`], the row-major index used to key the forest arena.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::error::{Result, SegmentationError};

/// A `(row, col)` coordinate inside a grid.
///
/// # Examples
/// ```
/// use tessera_core::Position;
///
/// let position = Position::new(2, 5);
/// assert_eq!((position.row(), position.col()), (2, 5));
/// assert_eq!(position.to_string(), "(2, 5)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Creates a position from its row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row.
    #[must_use]
    #[rustfmt::skip]
    pub const fn row(self) -> usize { self.row }

    /// Returns the column.
    #[must_use]
    #[rustfmt::skip]
    pub const fn col(self) -> usize { self.col }

    /// Returns the position displaced by `(delta_row, delta_col)`, or `None`
    /// when either coordinate would become negative or overflow.
    #[must_use]
    pub fn offset(self, delta_row: isize, delta_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(delta_row)?,
            col: self.col.checked_add_signed(delta_col)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable identifier of a pixel: its row-major index in the grid.
///
/// # Examples
/// ```
/// use tessera_core::PixelId;
///
/// let id = PixelId::new(7);
/// assert_eq!(id.index(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelId(usize);

impl PixelId {
    /// Wraps a row-major index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(index: usize) -> Self { Self(index) }

    /// Returns the row-major index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn index(self) -> usize { self.0 }
}

/// A view of one grid cell: its position and a borrowed color.
///
/// Equality and hashing consider the position only, so two views of the same
/// cell always compare equal regardless of how they were obtained.
#[derive(Debug)]
pub struct Pixel<'a, C> {
    position: Position,
    color: &'a C,
}

impl<'a, C> Pixel<'a, C> {
    /// Creates a pixel view.
    #[must_use]
    pub const fn new(position: Position, color: &'a C) -> Self {
        Self { position, color }
    }

    /// Returns the pixel position.
    #[must_use]
    #[rustfmt::skip]
    pub const fn position(&self) -> Position { self.position }

    /// Returns the pixel row.
    #[must_use]
    #[rustfmt::skip]
    pub const fn row(&self) -> usize { self.position.row }

    /// Returns the pixel column.
    #[must_use]
    #[rustfmt::skip]
    pub const fn col(&self) -> usize { self.position.col }

    /// Returns the pixel color.
    #[must_use]
    #[rustfmt::skip]
    pub const fn color(&self) -> &'a C { self.color }
}

impl<C> Clone for Pixel<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Pixel<'_, C> {}

impl<C> PartialEq for Pixel<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<C> Eq for Pixel<'_, C> {}

impl<C> Hash for Pixel<'_, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

/// A non-empty rectangular grid of colors stored in row-major order.
///
/// # Examples
/// ```
/// use tessera_core::{ColorGrid, Position};
///
/// let grid = ColorGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]])?;
/// assert_eq!((grid.rows(), grid.cols()), (2, 3));
/// assert_eq!(grid.get(Position::new(1, 0)), Some(&4));
/// # Ok::<(), tessera_core::SegmentationError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid<C> {
    rows: usize,
    cols: usize,
    cells: Vec<C>,
}

impl<C> ColorGrid<C> {
    /// Builds a grid from nested rows.
    ///
    /// # Errors
    /// Returns [`SegmentationError::EmptyGrid`] when there are no rows or the
    /// first row is empty, and [`SegmentationError::RaggedRows`] when any row
    /// differs in length from the first.
    pub fn from_rows(rows: Vec<Vec<C>>) -> Result<Self> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(SegmentationError::EmptyGrid);
        }
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count.saturating_mul(expected));
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(SegmentationError::RaggedRows {
                    row,
                    expected,
                    got: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self {
            rows: row_count,
            cols: expected,
            cells,
        })
    }

    /// Builds a grid from row-major cells.
    ///
    /// # Errors
    /// Returns [`SegmentationError::EmptyGrid`] when either dimension is zero,
    /// [`SegmentationError::GridTooLarge`] when `rows * cols` overflows, and
    /// [`SegmentationError::RaggedRows`] when `cells` does not hold exactly
    /// `rows * cols` values.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<C>) -> Result<Self> {
        let len = checked_area(rows, cols)?;
        if cells.len() != len {
            // Report the first row that cannot be filled completely.
            let full_rows = cells.len() / cols;
            return Err(SegmentationError::RaggedRows {
                row: full_rows.min(rows.saturating_sub(1)),
                expected: cols,
                got: cells.len().saturating_sub(full_rows.saturating_mul(cols)),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Builds a grid of `rows * cols` copies of `color`.
    ///
    /// # Errors
    /// Returns [`SegmentationError::EmptyGrid`] or
    /// [`SegmentationError::GridTooLarge`] for unusable dimensions.
    pub fn filled(rows: usize, cols: usize, color: C) -> Result<Self>
    where
        C: Clone,
    {
        let len = checked_area(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![color; len],
        })
    }

    /// Returns the number of rows.
    #[must_use]
    #[rustfmt::skip]
    pub fn rows(&self) -> usize { self.rows }

    /// Returns the number of columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn cols(&self) -> usize { self.cols }

    /// Returns the number of pixels.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.cells.len() }

    /// Always `false`: grids hold at least one pixel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the row-major cells.
    #[must_use]
    #[rustfmt::skip]
    pub fn cells(&self) -> &[C] { &self.cells }

    /// Returns one row, or `None` when out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[C]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    /// Returns the color at `position`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&C> {
        self.id_of(position)
            .and_then(|id| self.cells.get(id.index()))
    }

    /// Maps a position to its pixel id, or `None` when out of bounds.
    #[must_use]
    pub fn id_of(&self, position: Position) -> Option<PixelId> {
        (position.row < self.rows && position.col < self.cols)
            .then(|| PixelId::new(position.row * self.cols + position.col))
    }

    /// Maps a pixel id back to its position, or `None` when out of bounds.
    #[must_use]
    pub fn position_of(&self, id: PixelId) -> Option<Position> {
        (id.index() < self.cells.len())
            .then(|| Position::new(id.index() / self.cols, id.index() % self.cols))
    }

    /// Returns a view of the pixel with the given id.
    #[must_use]
    pub fn pixel(&self, id: PixelId) -> Option<Pixel<'_, C>> {
        let position = self.position_of(id)?;
        self.cells
            .get(id.index())
            .map(|color| Pixel::new(position, color))
    }

    /// Iterates over all pixels in row-major order alongside their ids.
    pub fn pixels(&self) -> impl Iterator<Item = (PixelId, Pixel<'_, C>)> + '_ {
        self.cells.iter().enumerate().map(|(index, color)| {
            let position = Position::new(index / self.cols, index % self.cols);
            (PixelId::new(index), Pixel::new(position, color))
        })
    }

    /// Consumes the grid, returning nested rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<C>> {
        let cols = self.cols;
        let mut rows = Vec::with_capacity(self.rows);
        let mut cells = self.cells.into_iter();
        for _ in 0..self.rows {
            rows.push(cells.by_ref().take(cols).collect());
        }
        rows
    }
}

pub(crate) fn checked_area(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(SegmentationError::EmptyGrid);
    }
    rows.checked_mul(cols)
        .ok_or(SegmentationError::GridTooLarge { rows, cols })
}
