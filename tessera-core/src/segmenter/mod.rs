//! Graph-based region segmentation.
//!
//! Provides the [`Segmenter`] entry point, which merges pixels along their
//! adjacency edges in ascending weight order and then colors each final
//! region.

use tracing::{debug, info, instrument};

use crate::{
    Result,
    builder::Connectivity,
    edge::GridEdge,
    error::ForestError,
    forest::WeightedForest,
    grid::{ColorGrid, PixelId},
    palette::ColorGenerator,
    result::{RegionId, Segmentation},
    weight::EdgeWeight,
};

/// Entry point for segmenting a color grid.
///
/// # Examples
/// ```
/// use tessera_core::{ColorGrid, Rgb, RgbEuclidean, SegmenterBuilder, SequentialPalette};
///
/// let sky = Rgb::new(90, 160, 230);
/// let sun = Rgb::new(250, 220, 40);
/// let grid = ColorGrid::from_rows(vec![
///     vec![sky, sky, sky],
///     vec![sky, sky, sky],
///     vec![sky, sky, sun],
/// ])?;
/// let segmentation = SegmenterBuilder::new()
///     .with_granularity(10.0)
///     .build()?
///     .segment(&grid, &RgbEuclidean, &mut SequentialPalette::new())?;
///
/// assert_eq!(segmentation.region_count(), 2);
/// let colors = segmentation.colors();
/// assert_eq!(colors.cells()[0], colors.cells()[7]);
/// assert_ne!(colors.cells()[0], colors.cells()[8]);
/// # Ok::<(), tessera_core::SegmentationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    granularity: f64,
    connectivity: Connectivity,
}

impl Segmenter {
    pub(crate) fn new(granularity: f64, connectivity: Connectivity) -> Self {
        Self {
            granularity,
            connectivity,
        }
    }

    /// Returns the granularity `k` configured for this instance.
    ///
    /// # Examples
    /// ```
    /// use tessera_core::SegmenterBuilder;
    ///
    /// let segmenter = SegmenterBuilder::new()
    ///     .with_granularity(42.0)
    ///     .build()
    ///     .expect("granularity is valid");
    /// assert_eq!(segmenter.granularity(), 42.0);
    /// ```
    #[must_use]
    pub fn granularity(&self) -> f64 {
        self.granularity
    }

    /// Returns the pixel connectivity used to build adjacency edges.
    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Segments `grid` into regions of similar color.
    ///
    /// Edges are visited once in non-decreasing weight order. An edge joins
    /// its two components when its weight is strictly below
    /// `min(internal_distance + k / size)` over both components. Every pixel
    /// of a final region then receives the color the palette issued for that
    /// region, assigned in row-major order of first visit.
    ///
    /// # Errors
    /// Returns [`crate::SegmentationError::EdgeWeight`] or
    /// [`crate::SegmentationError::InvalidEdgeWeight`] when weighing an edge
    /// fails, [`crate::SegmentationError::Palette`] when the palette fails, and
    /// [`crate::SegmentationError::Forest`] if a forest invariant is found
    /// broken.
    #[instrument(
        name = "core.segment",
        err,
        skip(self, grid, weigher, palette),
        fields(
            rows = grid.rows(),
            cols = grid.cols(),
            granularity = self.granularity,
            connectivity = ?self.connectivity
        ),
    )]
    pub fn segment<P, C, W, G>(
        &self,
        grid: &ColorGrid<P>,
        weigher: &W,
        palette: &mut G,
    ) -> Result<Segmentation<C>>
    where
        C: Clone,
        W: EdgeWeight<P> + ?Sized,
        G: ColorGenerator<C> + ?Sized,
    {
        let mut forest = WeightedForest::from_grid(grid, weigher, self.connectivity)?;
        let edges = forest.take_edges();
        let merges = self.merge_components(&mut forest, &edges)?;
        debug!(
            edges = edges.len(),
            merges,
            components = forest.component_count(),
            "merge pass completed"
        );

        let segmentation = color_regions(&mut forest, grid, palette, merges)?;
        info!(
            regions = segmentation.region_count(),
            merges,
            "segmentation completed"
        );
        #[cfg(feature = "metrics")]
        record_metrics(&segmentation);
        Ok(segmentation)
    }

    fn merge_components<C>(
        &self,
        forest: &mut WeightedForest<C>,
        edges: &[GridEdge],
    ) -> Result<usize> {
        let mut merges = 0;
        for edge in edges {
            if self.should_merge(forest, edge)? {
                forest.union(edge.first(), edge.second(), edge.weight())?;
                merges += 1;
            }
        }
        Ok(merges)
    }

    fn should_merge<C>(&self, forest: &mut WeightedForest<C>, edge: &GridEdge) -> Result<bool> {
        let root_a = forest.try_find(edge.first())?;
        let root_b = forest.try_find(edge.second())?;
        if root_a == root_b {
            return Ok(false);
        }
        let threshold_a = self.threshold(forest, root_a)?;
        let threshold_b = self.threshold(forest, root_b)?;
        Ok(edge.weight() < threshold_a.min(threshold_b))
    }

    /// `internal_distance + k / size` of the component rooted at `root`.
    fn threshold<C>(&self, forest: &WeightedForest<C>, root: PixelId) -> Result<f64> {
        let node = forest.node(root).ok_or(ForestError::UnregisteredPixel {
            index: root.index(),
            node_count: forest.len(),
        })?;
        let size = node.size() as f64;
        Ok(node.internal_distance() + self.granularity / size)
    }
}

fn color_regions<P, C, G>(
    forest: &mut WeightedForest<C>,
    grid: &ColorGrid<P>,
    palette: &mut G,
    merges: usize,
) -> Result<Segmentation<C>>
where
    C: Clone,
    G: ColorGenerator<C> + ?Sized,
{
    let mut region_of_root: Vec<Option<RegionId>> = vec![None; forest.len()];
    let mut regions = Vec::with_capacity(grid.len());
    let mut colors = Vec::with_capacity(grid.len());
    let mut region_count = 0;

    for index in 0..grid.len() {
        let pixel = PixelId::new(index);
        let root = forest.try_find(pixel)?;
        colors.push(forest.color_of(pixel, palette, region_count)?);

        let node_count = region_of_root.len();
        let slot = region_of_root
            .get_mut(root.index())
            .ok_or(ForestError::UnregisteredPixel {
                index: root.index(),
                node_count,
            })?;
        let region = *slot.get_or_insert_with(|| {
            let region = RegionId::new(region_count);
            region_count += 1;
            region
        });
        regions.push(region);
    }

    let colors = ColorGrid::from_cells(grid.rows(), grid.cols(), colors)?;
    Ok(Segmentation::new(colors, regions, region_count, merges))
}

#[cfg(feature = "metrics")]
fn record_metrics<C>(segmentation: &Segmentation<C>) {
    let merges = u64::try_from(segmentation.merges()).unwrap_or(u64::MAX);
    let regions = u64::try_from(segmentation.region_count()).unwrap_or(u64::MAX);
    metrics::counter!("segmentation_merges_total").increment(merges);
    metrics::counter!("segmentation_regions_total").increment(regions);
}

#[cfg(test)]
mod property;
#[cfg(test)]
mod tests;
