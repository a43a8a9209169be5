//! Property tests for the weighted forest.
//!
//! Random union sequences are replayed against the forest and checked
//! against a naive component labelling after every step.

use std::collections::HashMap;

use proptest::{
    prelude::*,
    test_runner::{TestCaseError, TestCaseResult},
};

use crate::{PixelId, test_utils::suite_proptest_config};

use super::{UnionOutcome, WeightedForest};

const MAX_SIDE: usize = 6;
const MAX_UNIONS: usize = 48;

#[derive(Clone, Debug)]
struct UnionPlan {
    rows: usize,
    cols: usize,
    unions: Vec<(usize, usize, f64)>,
}

fn union_plan_strategy() -> impl Strategy<Value = UnionPlan> {
    (1..=MAX_SIDE, 1..=MAX_SIDE).prop_flat_map(|(rows, cols)| {
        let len = rows * cols;
        prop::collection::vec((0..len, 0..len, 0.0_f64..100.0), 0..MAX_UNIONS)
            .prop_map(move |unions| UnionPlan { rows, cols, unions })
    })
}

/// Relabels every member of `absorbed`'s class with `survivor`'s label.
fn merge_labels(labels: &mut [usize], survivor: usize, absorbed: usize) {
    for label in labels.iter_mut() {
        if *label == absorbed {
            *label = survivor;
        }
    }
}

fn check_plan(plan: &UnionPlan) -> TestCaseResult {
    let mut forest = WeightedForest::<u32>::new(plan.rows, plan.cols)
        .map_err(|err| TestCaseError::fail(format!("forest construction failed: {err}")))?;
    let len = forest.len();
    let mut labels: Vec<usize> = (0..len).collect();

    for &(a, b, weight) in &plan.unions {
        let (a, b) = (PixelId::new(a), PixelId::new(b));
        let root_a = forest
            .find(a)
            .ok_or_else(|| TestCaseError::fail("registered pixel missed"))?;
        let root_b = forest
            .find(b)
            .ok_or_else(|| TestCaseError::fail("registered pixel missed"))?;
        let size_before = forest.node(root_a).map(|node| node.size()).unwrap_or(0)
            + if root_a == root_b {
                0
            } else {
                forest.node(root_b).map(|node| node.size()).unwrap_or(0)
            };
        let outcome = forest
            .union(a, b, weight)
            .map_err(|err| TestCaseError::fail(format!("union failed: {err}")))?;

        match outcome {
            UnionOutcome::AlreadyJoined { root } => {
                prop_assert_eq!(root, root_a);
                prop_assert_eq!(labels[a.index()], labels[b.index()]);
            }
            UnionOutcome::Merged { root, absorbed } => {
                prop_assert!(root == root_a || root == root_b);
                prop_assert_ne!(root, absorbed);
                let node = forest
                    .node(root)
                    .ok_or_else(|| TestCaseError::fail("root missing"))?;
                prop_assert_eq!(node.size(), size_before);
                prop_assert!(node.internal_distance() >= weight);
                let (survivor, joined) = (labels[a.index()], labels[b.index()]);
                merge_labels(&mut labels, survivor, joined);
            }
        }

        prop_assert_eq!(forest.find(a), forest.find(b));
    }

    check_partition(&mut forest, &labels)
}

fn check_partition(forest: &mut WeightedForest<u32>, labels: &[usize]) -> TestCaseResult {
    let mut label_to_root: HashMap<usize, PixelId> = HashMap::new();
    let mut sizes: HashMap<PixelId, usize> = HashMap::new();

    for (index, &label) in labels.iter().enumerate() {
        let pixel = PixelId::new(index);
        let root = forest
            .find(pixel)
            .ok_or_else(|| TestCaseError::fail("registered pixel missed"))?;
        prop_assert_eq!(forest.find(root), Some(root), "find must be idempotent");
        let expected = *label_to_root.entry(label).or_insert(root);
        prop_assert_eq!(root, expected, "forest partition must match labels");
        *sizes.entry(root).or_default() += 1;
    }

    prop_assert_eq!(forest.component_count(), sizes.len());
    for (root, members) in sizes {
        let node = forest
            .node(root)
            .ok_or_else(|| TestCaseError::fail("root missing"))?;
        prop_assert!(node.is_root());
        prop_assert_eq!(node.size(), members);
    }
    Ok(())
}

/// Records a root's internal distance each time it survives a union and
/// checks the sequence never decreases.
fn check_monotonic_internal_distance(plan: &UnionPlan) -> TestCaseResult {
    let mut forest = WeightedForest::<u32>::new(plan.rows, plan.cols)
        .map_err(|err| TestCaseError::fail(format!("forest construction failed: {err}")))?;
    let mut last_seen: HashMap<PixelId, f64> = HashMap::new();

    for &(a, b, weight) in &plan.unions {
        let outcome = forest
            .union(PixelId::new(a), PixelId::new(b), weight)
            .map_err(|err| TestCaseError::fail(format!("union failed: {err}")))?;
        if let UnionOutcome::Merged { root, absorbed } = outcome {
            let current = forest
                .node(root)
                .map(|node| node.internal_distance())
                .ok_or_else(|| TestCaseError::fail("root missing"))?;
            if let Some(previous) = last_seen.insert(root, current) {
                prop_assert!(current >= previous);
            }
            last_seen.remove(&absorbed);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn union_sequences_preserve_partition_invariants(plan in union_plan_strategy()) {
        check_plan(&plan)?;
    }

    #[test]
    fn surviving_roots_never_lose_internal_distance(plan in union_plan_strategy()) {
        check_monotonic_internal_distance(&plan)?;
    }
}
