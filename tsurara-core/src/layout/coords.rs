//! Cluster coordinate assignment.

use std::collections::BTreeMap;

use crate::tree::{ClusterId, ClusterShape, CondensedTree};

pub(super) struct Coordinates {
    pub(super) x: BTreeMap<ClusterId, f64>,
    pub(super) y: BTreeMap<ClusterId, f64>,
}

impl Coordinates {
    pub(super) fn x(&self, cluster: ClusterId) -> f64 {
        self.x.get(&cluster).copied().unwrap_or_default()
    }

    pub(super) fn y(&self, cluster: ClusterId) -> f64 {
        self.y.get(&cluster).copied().unwrap_or_default()
    }
}

/// Places leaves `leaf_separation` apart and centres every split above its
/// two children. A cluster that merely continues into a single child sits
/// directly above it.
pub(super) fn place_clusters(tree: &CondensedTree, leaf_separation: f64) -> Coordinates {
    let mut x = BTreeMap::new();
    for (index, leaf) in tree.leaves().into_iter().enumerate() {
        #[expect(
            clippy::cast_precision_loss,
            reason = "leaf counts stay far below 2^52"
        )]
        let slot = index as f64;
        x.insert(leaf, leaf_separation * slot);
    }

    let mut coords = Coordinates {
        x,
        y: BTreeMap::new(),
    };
    for &cluster in tree.post_order() {
        let Some(node) = tree.node(cluster) else {
            continue;
        };
        coords.y.insert(cluster, node.birth_lambda);
        match node.shape() {
            ClusterShape::Leaf => {}
            ClusterShape::OneChild(child) => {
                let child_x = coords.x(child);
                coords.x.insert(cluster, child_x);
            }
            ClusterShape::TwoChildren(left, right) => {
                let mean = (coords.x(left) + coords.x(right)) / 2.0;
                coords.x.insert(cluster, mean);
            }
        }
    }
    coords
}
