//! Pixel adjacency edges.
//!
//! Edges join each pixel to its forward neighbours (see
//! [`Connectivity`]), carry the dissimilarity reported by the edge-weight
//! collaborator, and are held as a deduplicated list sorted by weight.
//! Ties are broken by pixel id so iteration order is reproducible.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::{
    Result,
    builder::Connectivity,
    error::SegmentationError,
    grid::{ColorGrid, Pixel, PixelId},
    weight::EdgeWeight,
};

/// An undirected adjacency edge in canonical form (`first < second`).
///
/// # Examples
/// ```
/// use tessera_core::{GridEdge, PixelId};
///
/// let edge = GridEdge::new(PixelId::new(4), PixelId::new(1), 2.5);
/// assert_eq!(edge.first(), PixelId::new(1));
/// assert_eq!(edge.second(), PixelId::new(4));
/// assert_eq!(edge.weight(), 2.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridEdge {
    first: PixelId,
    second: PixelId,
    weight: f64,
}

impl GridEdge {
    /// Creates an edge, ordering its endpoints canonically.
    #[must_use]
    pub fn new(a: PixelId, b: PixelId, weight: f64) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            weight,
        }
    }

    /// Returns the smaller endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn first(&self) -> PixelId { self.first }

    /// Returns the larger endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn second(&self) -> PixelId { self.second }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f64 { self.weight }

    fn endpoints(&self) -> (PixelId, PixelId) {
        (self.first, self.second)
    }
}

impl Eq for GridEdge {}

impl Ord for GridEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.first.cmp(&other.first))
            .then_with(|| self.second.cmp(&other.second))
    }
}

impl PartialOrd for GridEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Builds the sorted, deduplicated adjacency edge list for `grid`.
///
/// # Errors
/// Returns [`SegmentationError::EdgeWeight`] when the collaborator fails and
/// [`SegmentationError::InvalidEdgeWeight`] when it reports a negative or
/// non-finite weight.
#[instrument(
    name = "core.build_edges",
    err,
    skip(grid, weigher),
    fields(rows = grid.rows(), cols = grid.cols(), connectivity = ?connectivity),
)]
pub(crate) fn build_edges<C, W>(
    grid: &ColorGrid<C>,
    weigher: &W,
    connectivity: Connectivity,
) -> Result<Vec<GridEdge>>
where
    W: EdgeWeight<C> + ?Sized,
{
    let offsets = connectivity.forward_offsets();
    let mut edges = Vec::with_capacity(grid.len().saturating_mul(offsets.len()));

    for (id, pixel) in grid.pixels() {
        for &(delta_row, delta_col) in offsets {
            let Some(neighbour_id) = pixel
                .position()
                .offset(delta_row, delta_col)
                .and_then(|position| grid.id_of(position))
            else {
                continue;
            };
            let Some(neighbour) = grid.pixel(neighbour_id) else {
                continue;
            };
            let weight = checked_weight(weigher, pixel, neighbour)?;
            edges.push(GridEdge::new(id, neighbour_id, weight));
        }
    }

    let generated = edges.len();
    let edges = sort_unique(edges);
    debug!(
        generated,
        unique = edges.len(),
        "adjacency edges materialised"
    );
    Ok(edges)
}

fn checked_weight<C, W>(weigher: &W, first: Pixel<'_, C>, second: Pixel<'_, C>) -> Result<f64>
where
    W: EdgeWeight<C> + ?Sized,
{
    let weight = weigher
        .weight(first, second)
        .map_err(|error| SegmentationError::EdgeWeight {
            first: first.position(),
            second: second.position(),
            error,
        })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(SegmentationError::InvalidEdgeWeight {
            first: first.position(),
            second: second.position(),
            weight,
        });
    }
    Ok(weight)
}

/// Removes repeated endpoint pairs, keeping the first occurrence, then sorts
/// by the edge total order.
pub(crate) fn sort_unique(mut edges: Vec<GridEdge>) -> Vec<GridEdge> {
    edges.sort_by_key(GridEdge::endpoints);
    edges.dedup_by_key(|edge| edge.endpoints());
    edges.sort_unstable();
    edges
}
