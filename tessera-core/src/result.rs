//! Result types for segmentation runs.

use crate::grid::{ColorGrid, PixelId};

/// Identifier of a final region, contiguous from zero in the order regions are
/// first met by a row-major scan.
///
/// # Examples
/// ```
/// use tessera_core::RegionId;
///
/// let id = RegionId::new(3);
/// assert_eq!(id.get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    /// Creates a region identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> usize { self.0 }
}

/// Output of [`crate::Segmenter::segment`].
///
/// # Examples
/// ```
/// use tessera_core::{ColorDistance, ColorGrid, CountingPalette, SegmenterBuilder};
///
/// let grid = ColorGrid::from_rows(vec![vec![0.0, 0.0, 90.0]])?;
/// let segmenter = SegmenterBuilder::new().with_granularity(1.0).build()?;
/// let weigher = ColorDistance::new(|a: &f64, b: &f64| (a - b).abs());
/// let segmentation = segmenter.segment(&grid, &weigher, &mut CountingPalette::default())?;
///
/// assert_eq!(segmentation.region_count(), 2);
/// assert_eq!(segmentation.colors().cells(), &[0, 0, 1]);
/// assert_eq!(segmentation.merges(), 1);
/// # Ok::<(), tessera_core::SegmentationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation<C> {
    colors: ColorGrid<C>,
    regions: Vec<RegionId>,
    region_count: usize,
    merges: usize,
}

impl<C> Segmentation<C> {
    pub(crate) fn new(
        colors: ColorGrid<C>,
        regions: Vec<RegionId>,
        region_count: usize,
        merges: usize,
    ) -> Self {
        Self {
            colors,
            regions,
            region_count,
            merges,
        }
    }

    /// Returns the output grid: one representative color per pixel.
    #[must_use]
    #[rustfmt::skip]
    pub fn colors(&self) -> &ColorGrid<C> { &self.colors }

    /// Consumes the result, returning the output grid.
    #[must_use]
    #[rustfmt::skip]
    pub fn into_colors(self) -> ColorGrid<C> { self.colors }

    /// Returns the region of every pixel in row-major order.
    #[must_use]
    #[rustfmt::skip]
    pub fn regions(&self) -> &[RegionId] { &self.regions }

    /// Returns the region of one pixel.
    #[must_use]
    pub fn region_of(&self, pixel: PixelId) -> Option<RegionId> {
        self.regions.get(pixel.index()).copied()
    }

    /// Returns the number of final regions.
    #[must_use]
    #[rustfmt::skip]
    pub fn region_count(&self) -> usize { self.region_count }

    /// Returns how many unions the merge pass performed.
    #[must_use]
    #[rustfmt::skip]
    pub fn merges(&self) -> usize { self.merges }
}
