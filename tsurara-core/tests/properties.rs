//! Property suites for layout and selection over seeded random trees.

mod common;

use std::collections::BTreeSet;

use common::{TreeSpec, suite_proptest_config};
use proptest::{prelude::*, test_runner::TestCaseResult};
use tsurara_core::{
    ClusterId, ClusterShape, CondensedTree, ExcessOfMass, LayoutConfig, StabilityProvider,
    compute_layout, select_clusters,
};

fn layout_properties(tree: &CondensedTree) -> TestCaseResult {
    let linear = compute_layout(tree, &LayoutConfig::new())
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(linear.cluster_bounds().len(), tree.cluster_count());
    prop_assert_eq!(linear.lines().len(), tree.cluster_edges().count());

    for cluster in tree.clusters() {
        let x = linear.cluster_x()[&cluster];
        match tree.shape(cluster) {
            Some(ClusterShape::TwoChildren(left, right)) => {
                let (lo, hi) = ordered(linear.cluster_x()[&left], linear.cluster_x()[&right]);
                prop_assert!(lo <= x && x <= hi, "cluster {cluster} not between children");
            }
            Some(ClusterShape::OneChild(child)) => {
                prop_assert_eq!(x, linear.cluster_x()[&child]);
            }
            _ => {}
        }
        let Some(bounds) = linear.bounds(cluster) else {
            return Err(TestCaseError::fail(format!("cluster {cluster} has no bounds")));
        };
        prop_assert!(bounds.top >= bounds.bottom);
    }
    for bar in linear.bars() {
        prop_assert!(bar.height > 0.0);
        prop_assert!(bar.width >= 1.0);
    }

    let logged = compute_layout(tree, &LayoutConfig::new().with_log_size(true))
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(linear.bars().len(), logged.bars().len());
    for (lin, log) in linear.bars().iter().zip(logged.bars()) {
        prop_assert!((log.width - lin.width.ln()).abs() < 1e-9);
    }
    Ok(())
}

fn selection_properties(tree: &CondensedTree) -> TestCaseResult {
    let stability = ExcessOfMass
        .stability(tree)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let selection =
        select_clusters(tree, &stability).map_err(|err| TestCaseError::fail(err.to_string()))?;
    let again =
        select_clusters(tree, &stability).map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(&selection, &again);

    let Some(root) = tree.root() else {
        prop_assert!(selection.is_empty());
        return Ok(());
    };
    prop_assert!(!selection.contains(root));

    // Every leaf below the root is covered by exactly one selected cluster.
    for leaf in tree.leaves().into_iter().filter(|&leaf| leaf != root) {
        let covering = ancestors_or_self(tree, leaf)
            .filter(|&cluster| selection.contains(cluster))
            .count();
        prop_assert_eq!(covering, 1, "leaf {} covered {} times", leaf, covering);
    }

    let baseline: f64 = tree
        .cluster_children(root)
        .iter()
        .map(|child| stability[child])
        .sum();
    let tolerance = 1e-9 * baseline.abs().max(1.0);
    prop_assert!(selection.total_stability() + tolerance >= baseline);
    Ok(())
}

fn ancestors_or_self(
    tree: &CondensedTree,
    cluster: ClusterId,
) -> impl Iterator<Item = ClusterId> + '_ {
    std::iter::successors(Some(cluster), |&current| tree.parent(current))
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

macro_rules! seeded_property_test {
    ($test_name:ident, $runner:path) => {
        #[rstest::rstest]
        #[case::single_cluster(1, 1, 50)]
        #[case::small_42(42, 8, 120)]
        #[case::small_999(999, 8, 40)]
        #[case::wide_42(42, 64, 500)]
        #[case::wide_7777(7777, 95, 599)]
        fn $test_name(#[case] seed: u64, #[case] max_clusters: usize, #[case] max_points: u64) {
            let tree = TreeSpec {
                seed,
                max_clusters,
                max_points,
            }
            .build();
            $runner(&tree).expect("property must hold");
        }
    };
}

seeded_property_test!(layout_properties_hold_for_seeded_trees, layout_properties);
seeded_property_test!(selection_properties_hold_for_seeded_trees, selection_properties);

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn layout_properties_hold(spec in any::<TreeSpec>()) {
        layout_properties(&spec.build())?;
    }

    #[test]
    fn selection_properties_hold(spec in any::<TreeSpec>()) {
        selection_properties(&spec.build())?;
    }

    #[test]
    fn selection_ignores_scores_of_absorbed_clusters(
        spec in any::<TreeSpec>(),
        bump in 0.0f64..1_000.0,
    ) {
        let tree = spec.build();
        let stability = ExcessOfMass
            .stability(&tree)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let selection = select_clusters(&tree, &stability)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        // Raising the score of a selected cluster keeps it selected.
        let selected: BTreeSet<ClusterId> = selection.selected().clone();
        for cluster in selected {
            let mut raised = stability.clone();
            if let Some(score) = raised.get_mut(&cluster) {
                *score += bump;
            }
            let rerun = select_clusters(&tree, &raised)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert!(rerun.contains(cluster));
        }
    }
}
