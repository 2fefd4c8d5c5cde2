//! Bar, bounding box, and connector geometry for the icicle plot.

use std::collections::BTreeMap;

use super::{
    LayoutConfig,
    coords::Coordinates,
    result::{Bar, ClusterBounds, ConnectorLine},
};
use crate::tree::{ClusterId, CondensedTree, CondensedTreeRecord};

pub(super) struct IciclePainter<'a> {
    tree: &'a CondensedTree,
    config: &'a LayoutConfig,
    coords: &'a Coordinates,
    scaling: f64,
}

impl<'a> IciclePainter<'a> {
    pub(super) fn new(
        tree: &'a CondensedTree,
        config: &'a LayoutConfig,
        coords: &'a Coordinates,
        scaling: f64,
    ) -> Self {
        Self {
            tree,
            config,
            coords,
            scaling,
        }
    }

    fn centre(&self, cluster: ClusterId) -> f64 {
        self.coords.x(cluster) * self.scaling
    }

    /// Emits bars cluster by cluster in descending id order.
    pub(super) fn bars(&self) -> Vec<Bar> {
        let mut bars = Vec::new();
        for cluster in self.tree.clusters().rev() {
            self.cluster_bars(cluster, &mut bars);
        }
        bars
    }

    /// Walks the detachment events of `cluster` by ascending lambda, emitting
    /// one bar per non-empty interval. The running size is kept as an integer
    /// count so log mode never accumulates `ln(exp(x) - n)` rounding.
    #[expect(
        clippy::float_cmp,
        reason = "zero-height intervals are detected by exact lambda equality"
    )]
    fn cluster_bars(&self, cluster: ClusterId, bars: &mut Vec<Bar>) {
        let centre = self.centre(cluster);
        let mut remaining = self.tree.total_size(cluster).unwrap_or_default();
        let mut current_lambda = self.coords.y(cluster);

        let mut events: Vec<&CondensedTreeRecord> = self.tree.children(cluster).collect();
        events.sort_by(|left, right| left.lambda.total_cmp(&right.lambda));

        for event in events {
            if event.lambda != current_lambda {
                bars.push(Bar {
                    cluster,
                    centre,
                    bottom: current_lambda,
                    height: event.lambda - current_lambda,
                    width: self.config.mass(remaining),
                });
            }
            remaining = remaining.saturating_sub(event.child_size);
            current_lambda = event.lambda;
        }
    }

    pub(super) fn bounds(&self) -> BTreeMap<ClusterId, ClusterBounds> {
        self.tree
            .clusters()
            .map(|cluster| {
                let centre = self.centre(cluster);
                let mass = self
                    .config
                    .mass(self.tree.total_size(cluster).unwrap_or_default());
                let half_mass = mass / 2.0;
                let bounds = ClusterBounds {
                    left: centre - half_mass,
                    right: centre + half_mass,
                    bottom: self.coords.y(cluster),
                    top: self.tree.death_lambda(cluster).unwrap_or_default(),
                };
                (cluster, bounds)
            })
            .collect()
    }

    /// Emits one horizontal stub per cluster edge, running from the parent's
    /// centre to the near edge of the child's bar.
    pub(super) fn connectors(&self) -> Vec<ConnectorLine> {
        self.tree
            .cluster_edges()
            .filter_map(|record| {
                let child = record.child_cluster()?;
                let parent = record.parent_cluster();
                let parent_x = self.coords.x(parent);
                let child_x = self.coords.x(child);
                let y = self.coords.y(child);
                let half_mass = self.config.mass(record.child_size) / 2.0;
                Some(ConnectorLine {
                    parent,
                    child,
                    xs: [
                        parent_x * self.scaling,
                        child_x * self.scaling + direction(parent_x, child_x) * half_mass,
                    ],
                    ys: [y, y],
                })
            })
            .collect()
    }
}

/// Sign of the child's displacement from its parent, zero when coincident.
fn direction(parent_x: f64, child_x: f64) -> f64 {
    match child_x.partial_cmp(&parent_x) {
        Some(std::cmp::Ordering::Greater) => 1.0,
        Some(std::cmp::Ordering::Less) => -1.0,
        _ => 0.0,
    }
}
