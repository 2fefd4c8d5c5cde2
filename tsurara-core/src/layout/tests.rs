//! Unit tests for the icicle layout.

use rstest::{fixture, rstest};
use tsurara_test_support::fixtures::two_level_rows;

use super::*;
use crate::{
    error::LayoutErrorCode,
    tree::{ClusterId, CondensedTreeRecord},
};

fn id(raw: u64) -> ClusterId {
    ClusterId::new(raw)
}

fn build(rows: &[(u64, u64, f64, u64)]) -> CondensedTree {
    CondensedTree::from_records(rows.iter().copied().map(CondensedTreeRecord::from).collect())
        .expect("tree must be valid")
}

#[fixture]
fn two_level() -> CondensedTree {
    build(&two_level_rows())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn invalid_leaf_separation_is_rejected(#[case] leaf_separation: f64) {
    let config = LayoutConfig::new().with_leaf_separation(leaf_separation);
    let err = compute_layout(&build(&two_level_rows()), &config)
        .expect_err("config must be rejected");
    assert_eq!(err.code(), LayoutErrorCode::InvalidLeafSeparation);
}

#[rstest]
fn empty_tree_yields_empty_layout() {
    let layout = compute_layout(&build(&[]), &LayoutConfig::new()).expect("layout");
    assert!(layout.is_empty());
    assert_eq!(layout, LayoutResult::default());
}

#[rstest]
#[case(1.0)]
#[case(2.5)]
fn cluster_coordinates_follow_leaves(two_level: CondensedTree, #[case] separation: f64) {
    let config = LayoutConfig::new().with_leaf_separation(separation);
    let layout = compute_layout(&two_level, &config).expect("layout");
    let x = layout.cluster_x();

    assert_close(x[&id(102)], 0.0);
    assert_close(x[&id(103)], separation);
    assert_close(x[&id(104)], 2.0 * separation);
    assert_close(x[&id(101)], 1.5 * separation);
    assert_close(x[&id(100)], 0.75 * separation);

    let y = layout.cluster_y();
    assert_eq!(y[&id(100)], 0.0);
    assert_eq!(y[&id(101)], 0.5);
    assert_eq!(y[&id(102)], 0.5);
    assert_eq!(y[&id(103)], 1.0);
}

#[rstest]
fn parents_centre_over_children_whatever_their_ids() {
    // `9` splits into `2` and `3`, and `2` splits into `5` and `6`.
    let tree = build(&[
        (0, 9, 0.5, 6),
        (0, 4, 0.5, 2),
        (9, 2, 1.0, 4),
        (9, 3, 1.0, 2),
        (2, 5, 1.5, 2),
        (2, 6, 1.5, 2),
        (3, 100, 2.0, 1),
        (3, 101, 2.0, 1),
        (4, 102, 1.0, 1),
        (4, 103, 1.0, 1),
        (5, 104, 2.0, 1),
        (5, 105, 2.0, 1),
        (6, 106, 2.0, 1),
        (6, 107, 2.0, 1),
    ]);
    let layout = compute_layout(&tree, &LayoutConfig::new()).expect("layout");
    let x = layout.cluster_x();

    assert_close(x[&id(3)], 0.0);
    assert_close(x[&id(4)], 1.0);
    assert_close(x[&id(5)], 2.0);
    assert_close(x[&id(6)], 3.0);
    assert_close(x[&id(2)], 2.5);
    assert_close(x[&id(9)], 1.25);
    assert_close(x[&id(0)], 1.125);

    let y = layout.cluster_y();
    assert_eq!(y[&id(9)], 0.5);
    assert_eq!(y[&id(2)], 1.0);
    assert_eq!(y[&id(5)], 1.5);

    let clusters: Vec<u64> = layout.bars().iter().map(|bar| bar.cluster.get()).collect();
    assert_eq!(clusters, vec![9, 6, 5, 4, 3, 2, 0]);
}

#[rstest]
fn bars_run_in_descending_cluster_order(two_level: CondensedTree) {
    let layout = compute_layout(&two_level, &LayoutConfig::new()).expect("layout");
    let clusters: Vec<u64> = layout.bars().iter().map(|bar| bar.cluster.get()).collect();
    assert_eq!(clusters, vec![104, 103, 102, 102, 101, 100]);

    assert_eq!(layout.scaling(), 100.0);
    assert_eq!(layout.bar_widths(), vec![25.0, 15.0, 60.0, 30.0, 40.0, 100.0]);
    assert_eq!(layout.bar_bottoms(), vec![1.0, 1.0, 0.5, 0.8, 0.5, 0.0]);
    assert_eq!(layout.bar_centres(), vec![200.0, 100.0, 0.0, 0.0, 150.0, 75.0]);
    let expected_heights = [1.0, 0.5, 0.3, 0.4, 0.5, 0.5];
    for (height, expected) in layout.bar_tops().into_iter().zip(expected_heights) {
        assert_close(height, expected);
    }
}

#[rstest]
fn simultaneous_detachments_produce_one_bar() {
    let tree = build(&[(0, 1, 0.5, 1), (0, 2, 0.5, 1), (0, 3, 0.5, 1)]);
    let layout = compute_layout(&tree, &LayoutConfig::new()).expect("layout");
    assert_eq!(layout.bars().len(), 1);
    assert_eq!(layout.bars()[0].width, 3.0);
    assert_eq!(layout.bars()[0].height, 0.5);
}

#[rstest]
fn connectors_reach_the_near_edge_of_each_child(two_level: CondensedTree) {
    let layout = compute_layout(&two_level, &LayoutConfig::new()).expect("layout");
    assert_eq!(
        layout.line_xs(),
        vec![[75.0, 170.0], [75.0, -30.0], [150.0, 92.5], [150.0, 212.5]]
    );
    assert_eq!(
        layout.line_ys(),
        vec![[0.5, 0.5], [0.5, 0.5], [1.0, 1.0], [1.0, 1.0]]
    );
    let pairs: Vec<(u64, u64)> = layout
        .lines()
        .iter()
        .map(|line| (line.parent.get(), line.child.get()))
        .collect();
    assert_eq!(pairs, vec![(100, 101), (100, 102), (101, 103), (101, 104)]);
}

#[rstest]
fn single_child_connector_is_vertical_stub() {
    let tree = build(&[(0, 1, 0.2, 2), (0, 5, 0.1, 1), (1, 6, 0.4, 1), (1, 7, 0.4, 1)]);
    let layout = compute_layout(&tree, &LayoutConfig::new()).expect("layout");
    assert_eq!(layout.cluster_x()[&id(0)], layout.cluster_x()[&id(1)]);
    assert_eq!(layout.line_xs(), vec![[0.0, 0.0]]);
}

#[rstest]
fn bounds_cover_every_cluster(two_level: CondensedTree) {
    let layout = compute_layout(&two_level, &LayoutConfig::new()).expect("layout");
    assert_eq!(layout.cluster_bounds().len(), two_level.cluster_count());

    let bounds = layout.bounds(id(102)).expect("leaf bounds");
    assert_eq!(
        *bounds,
        ClusterBounds {
            left: -30.0,
            right: 30.0,
            bottom: 0.5,
            top: 1.2,
        }
    );
    let root = layout.bounds(id(100)).expect("root bounds");
    assert_eq!((root.left, root.right), (25.0, 125.0));
    assert_eq!((root.bottom, root.top), (0.0, 0.5));
}

#[rstest]
fn log_size_takes_natural_log_of_counts(two_level: CondensedTree) {
    let linear = compute_layout(&two_level, &LayoutConfig::new()).expect("linear layout");
    let logged = compute_layout(&two_level, &LayoutConfig::new().with_log_size(true))
        .expect("log layout");

    assert_close(logged.scaling(), 100_f64.ln());
    assert_eq!(linear.bars().len(), logged.bars().len());
    for (lin, log) in linear.bars().iter().zip(logged.bars()) {
        assert_close(log.width, lin.width.ln());
        assert_eq!(lin.bottom, log.bottom);
    }
    let bounds = logged.bounds(id(103)).expect("bounds");
    assert_close(bounds.width(), 15_f64.ln());
}

#[rstest]
fn root_only_tree_sits_at_origin() {
    let tree = build(&[(0, 1, 0.5, 1), (0, 2, 0.9, 1)]);
    let layout = compute_layout(&tree, &LayoutConfig::new()).expect("layout");
    assert_eq!(layout.cluster_x()[&id(0)], 0.0);
    assert!(layout.lines().is_empty());
    assert_eq!(layout.bar_widths(), vec![2.0, 1.0]);
}

#[rstest]
fn layout_serialises_to_json(two_level: CondensedTree) {
    let layout = compute_layout(&two_level, &LayoutConfig::new()).expect("layout");
    let json = serde_json::to_value(&layout).expect("serialise layout");
    assert_eq!(json["scaling"], 100.0);
    assert_eq!(json["bars"].as_array().map(Vec::len), Some(6));
}
