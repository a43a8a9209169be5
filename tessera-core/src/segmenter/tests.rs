//! Unit tests for the segmenter.

use std::sync::Arc;

use rstest::{fixture, rstest};

use crate::{
    ColorDistance, ColorGenerator, ColorGrid, Connectivity, CountingPalette, EdgeWeight,
    PaletteError, Pixel, Position, RegionId, SegmentationError, Segmenter, SegmenterBuilder,
    WeightError,
};

type Absolute = ColorDistance<fn(&f64, &f64) -> f64>;

fn absolute_difference(a: &f64, b: &f64) -> f64 {
    (a - b).abs()
}

#[fixture]
fn absolute() -> Absolute {
    ColorDistance::new(absolute_difference as fn(&f64, &f64) -> f64)
}

fn segmenter(granularity: f64) -> Segmenter {
    SegmenterBuilder::new()
        .with_granularity(granularity)
        .build()
        .expect("granularity is valid")
}

fn grid(rows: Vec<Vec<f64>>) -> ColorGrid<f64> {
    ColorGrid::from_rows(rows).expect("grid is rectangular")
}

fn region_ids(values: &[usize]) -> Vec<RegionId> {
    values.iter().copied().map(RegionId::new).collect()
}

#[rstest]
fn uniform_grid_collapses_into_one_region(absolute: Absolute) {
    let uniform = grid(vec![vec![7.0, 7.0], vec![7.0, 7.0]]);
    let segmentation = segmenter(1.0e-9)
        .segment(&uniform, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(segmentation.region_count(), 1);
    assert_eq!(segmentation.merges(), 3);
    assert_eq!(segmentation.colors().cells(), &[0, 0, 0, 0]);
}

#[rstest]
fn zero_granularity_never_merges_because_the_predicate_is_strict(absolute: Absolute) {
    let uniform = grid(vec![vec![7.0, 7.0], vec![7.0, 7.0]]);
    let segmentation = segmenter(0.0)
        .segment(&uniform, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(segmentation.region_count(), 4);
    assert_eq!(segmentation.merges(), 0);
}

#[rstest]
fn heavy_edge_keeps_pixels_apart(absolute: Absolute) {
    let pair = grid(vec![vec![0.0, 100.0]]);
    let segmentation = segmenter(0.0)
        .segment(&pair, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(segmentation.region_count(), 2);
    assert_eq!(segmentation.colors().cells(), &[0, 1]);
    assert_eq!(segmentation.regions(), region_ids(&[0, 1]).as_slice());
}

#[rstest]
fn outlier_corner_stays_a_singleton(absolute: Absolute) {
    let picture = grid(vec![
        vec![200.0, 10.0, 11.0],
        vec![10.0, 10.0, 11.0],
        vec![11.0, 10.0, 10.0],
    ]);
    let segmentation = segmenter(20.0)
        .segment(&picture, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(segmentation.region_count(), 2);
    assert_eq!(segmentation.merges(), 7);
    assert_eq!(
        segmentation.regions(),
        region_ids(&[0, 1, 1, 1, 1, 1, 1, 1, 1]).as_slice()
    );
}

#[rstest]
fn single_pixel_is_one_region_for_any_granularity(
    absolute: Absolute,
    #[values(0.0, 1.0, 300.0, 1.0e12)] granularity: f64,
) {
    let dot = grid(vec![vec![42.0]]);
    let segmentation = segmenter(granularity)
        .segment(&dot, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(segmentation.region_count(), 1);
    assert_eq!(segmentation.merges(), 0);
    assert_eq!(segmentation.colors().rows(), 1);
    assert_eq!(segmentation.colors().cols(), 1);
    assert_eq!(segmentation.region_of(crate::PixelId::new(0)), Some(RegionId::new(0)));
}

#[rstest]
#[case::eight(Connectivity::Eight, &[0, 1, 1, 0])]
#[case::four(Connectivity::Four, &[0, 1, 2, 3])]
fn connectivity_controls_diagonal_merges(
    absolute: Absolute,
    #[case] connectivity: Connectivity,
    #[case] expected: &[usize],
) {
    let checkerboard = grid(vec![vec![0.0, 100.0], vec![100.0, 0.0]]);
    let segmentation = SegmenterBuilder::new()
        .with_granularity(50.0)
        .with_connectivity(connectivity)
        .build()
        .expect("granularity is valid")
        .segment(&checkerboard, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(segmentation.regions(), region_ids(expected).as_slice());
}

#[rstest]
fn output_preserves_dimensions_and_labels_regions_in_visit_order(absolute: Absolute) {
    let stripes = grid(vec![
        vec![0.0, 0.0, 90.0, 90.0],
        vec![0.0, 0.0, 90.0, 90.0],
        vec![50.0, 50.0, 50.0, 50.0],
    ]);
    let segmentation = segmenter(5.0)
        .segment(&stripes, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    let colors = segmentation.colors();
    assert_eq!((colors.rows(), colors.cols()), (3, 4));
    assert_eq!(colors.cells(), &[0, 0, 1, 1, 0, 0, 1, 1, 2, 2, 2, 2]);
    let labels: Vec<u32> = segmentation
        .regions()
        .iter()
        .map(|region| u32::try_from(region.get()).expect("small label"))
        .collect();
    assert_eq!(labels.as_slice(), colors.cells());
}

#[rstest]
fn repeated_runs_are_identical(absolute: Absolute) {
    let picture = grid(vec![
        vec![3.0, 4.0, 40.0],
        vec![5.0, 38.0, 41.0],
        vec![80.0, 81.0, 39.0],
    ]);
    let segmenter = segmenter(12.0);
    let first = segmenter
        .segment(&picture, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");
    let second = segmenter
        .segment(&picture, &absolute, &mut CountingPalette::default())
        .expect("segmentation succeeds");

    assert_eq!(first, second);
}

struct Failing;

impl EdgeWeight<f64> for Failing {
    fn weight(&self, _: Pixel<'_, f64>, _: Pixel<'_, f64>) -> Result<f64, WeightError> {
        Err(WeightError::Unavailable {
            reason: Arc::from("sensor offline"),
        })
    }
}

#[test]
fn edge_weight_failures_abort_the_run() {
    let pair = grid(vec![vec![1.0], vec![2.0]]);
    let err = segmenter(1.0)
        .segment(&pair, &Failing, &mut CountingPalette::default())
        .expect_err("collaborator fails");

    assert_eq!(
        err,
        SegmentationError::EdgeWeight {
            first: Position::new(0, 0),
            second: Position::new(1, 0),
            error: WeightError::Unavailable {
                reason: Arc::from("sensor offline"),
            },
        }
    );
    assert_eq!(err.code().as_str(), "TESSERA_EDGE_WEIGHT_FAILURE");
}

#[test]
fn negative_weights_are_rejected() {
    let pair = grid(vec![vec![1.0, 2.0]]);
    let signed = ColorDistance::new(|a: &f64, b: &f64| a - b);
    let err = segmenter(1.0)
        .segment(&pair, &signed, &mut CountingPalette::default())
        .expect_err("negative weight is invalid");

    assert!(matches!(
        err,
        SegmentationError::InvalidEdgeWeight { weight, .. } if weight == -1.0
    ));
}

/// Issues `remaining` labels, then reports exhaustion.
struct Limited {
    remaining: u32,
    issued: u32,
}

impl ColorGenerator<u32> for Limited {
    fn next_color(&mut self) -> Result<u32, PaletteError> {
        if self.remaining == 0 {
            return Err(PaletteError::Exhausted {
                issued: u64::from(self.issued),
            });
        }
        self.remaining -= 1;
        self.issued += 1;
        Ok(self.issued)
    }
}

#[rstest]
fn palette_exhaustion_reports_regions_already_colored(absolute: Absolute) {
    let pair = grid(vec![vec![0.0, 100.0]]);
    let mut palette = Limited {
        remaining: 1,
        issued: 0,
    };
    let err = segmenter(0.0)
        .segment(&pair, &absolute, &mut palette)
        .expect_err("second region has no color");

    assert_eq!(
        err,
        SegmentationError::Palette {
            issued: 1,
            error: PaletteError::Exhausted { issued: 1 },
        }
    );
}

#[rstest]
fn palette_is_consulted_once_per_region(absolute: Absolute) {
    let picture = grid(vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]]);
    let mut palette = Limited {
        remaining: 1,
        issued: 0,
    };
    let segmentation = segmenter(1.0)
        .segment(&picture, &absolute, &mut palette)
        .expect("one region needs one color");

    assert_eq!(segmentation.colors().cells(), &[1; 6]);
    assert_eq!(palette.remaining, 0);
}
