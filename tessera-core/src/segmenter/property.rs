//! Property tests for segmentation output.

use std::collections::VecDeque;

use proptest::{
    prelude::*,
    test_runner::{TestCaseError, TestCaseResult},
};

use crate::{
    ColorDistance, ColorGrid, Connectivity, CountingPalette, Position, Segmentation,
    SegmenterBuilder, test_utils::suite_proptest_config,
};

const MAX_SIDE: usize = 7;

#[derive(Clone, Debug)]
struct SegmentationCase {
    grid: ColorGrid<f64>,
    granularity: f64,
    connectivity: Connectivity,
}

fn case_strategy() -> impl Strategy<Value = SegmentationCase> {
    let grid = (1..=MAX_SIDE, 1..=MAX_SIDE).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(0_u8..=255, rows * cols).prop_map(move |cells| {
            let cells = cells.into_iter().map(f64::from).collect();
            ColorGrid::from_cells(rows, cols, cells).expect("cell count matches shape")
        })
    });
    let connectivity = prop_oneof![Just(Connectivity::Eight), Just(Connectivity::Four)];
    (grid, 0.0_f64..600.0, connectivity).prop_map(|(grid, granularity, connectivity)| {
        SegmentationCase {
            grid,
            granularity,
            connectivity,
        }
    })
}

fn run(case: &SegmentationCase) -> Result<Segmentation<u32>, TestCaseError> {
    let segmenter = SegmenterBuilder::new()
        .with_granularity(case.granularity)
        .with_connectivity(case.connectivity)
        .build()
        .map_err(|err| TestCaseError::fail(format!("build failed: {err}")))?;
    let weigher = ColorDistance::new(|a: &f64, b: &f64| (a - b).abs());
    segmenter
        .segment(&case.grid, &weigher, &mut CountingPalette::default())
        .map_err(|err| TestCaseError::fail(format!("segment failed: {err}")))
}

/// Region labels are contiguous in first-visit order and agree with the
/// colors a counting palette hands out.
fn check_labels(segmentation: &Segmentation<u32>, len: usize) -> TestCaseResult {
    let regions = segmentation.regions();
    prop_assert_eq!(regions.len(), len);
    let mut next = 0;
    for (region, &color) in regions.iter().zip(segmentation.colors().cells()) {
        prop_assert!(region.get() <= next, "labels must appear in visit order");
        if region.get() == next {
            next += 1;
        }
        prop_assert_eq!(u32::try_from(region.get()).ok(), Some(color));
    }
    prop_assert_eq!(segmentation.region_count(), next);
    prop_assert_eq!(segmentation.merges() + segmentation.region_count(), len);
    Ok(())
}

fn neighbours(
    position: Position,
    connectivity: Connectivity,
) -> impl Iterator<Item = Position> {
    let diagonal = matches!(connectivity, Connectivity::Eight);
    [
        (-1, 0, false),
        (1, 0, false),
        (0, -1, false),
        (0, 1, false),
        (-1, -1, true),
        (-1, 1, true),
        (1, -1, true),
        (1, 1, true),
    ]
    .into_iter()
    .filter(move |&(_, _, is_diagonal)| diagonal || !is_diagonal)
    .filter_map(move |(delta_row, delta_col, _)| position.offset(delta_row, delta_col))
}

/// Every region is connected through same-region neighbours.
fn check_connected(case: &SegmentationCase, segmentation: &Segmentation<u32>) -> TestCaseResult {
    let grid = &case.grid;
    let regions = segmentation.regions();
    let mut seen = vec![false; grid.len()];
    let mut flood_fills = 0;

    for start in 0..grid.len() {
        if seen[start] {
            continue;
        }
        flood_fills += 1;
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(index) = queue.pop_front() {
            let position = Position::new(index / grid.cols(), index % grid.cols());
            for neighbour in neighbours(position, case.connectivity) {
                let Some(id) = grid.id_of(neighbour) else {
                    continue;
                };
                if !seen[id.index()] && regions[id.index()] == regions[index] {
                    seen[id.index()] = true;
                    queue.push_back(id.index());
                }
            }
        }
    }

    prop_assert_eq!(flood_fills, segmentation.region_count());
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(96))]

    #[test]
    fn segmentation_is_deterministic(case in case_strategy()) {
        let first = run(&case)?;
        let second = run(&case)?;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn regions_are_labelled_consistently(case in case_strategy()) {
        let segmentation = run(&case)?;
        check_labels(&segmentation, case.grid.len())?;
    }

    #[test]
    fn regions_are_spatially_connected(case in case_strategy()) {
        let segmentation = run(&case)?;
        check_connected(&case, &segmentation)?;
    }
}
