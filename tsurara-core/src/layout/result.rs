//! Geometry produced by the layout stage.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::ClusterId;

/// One icicle segment: a cluster's width over a lambda interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bar {
    /// Cluster the bar belongs to.
    pub cluster: ClusterId,
    /// Horizontal centre in layout space.
    pub centre: f64,
    /// Lambda at which the interval starts.
    pub bottom: f64,
    /// Extent of the interval above `bottom`.
    pub height: f64,
    /// Point mass of the cluster during the interval.
    pub width: f64,
}

/// Horizontal stub joining a child cluster to its parent at the split lambda.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConnectorLine {
    /// Parent end of the connector.
    pub parent: ClusterId,
    /// Child end of the connector.
    pub child: ClusterId,
    /// Start and end x coordinates.
    pub xs: [f64; 2],
    /// Start and end y coordinates (always equal).
    pub ys: [f64; 2],
}

/// Axis-aligned bounding box of a cluster in layout space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClusterBounds {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Birth lambda.
    pub bottom: f64,
    /// Largest lambda among the cluster's direct children.
    pub top: f64,
}

impl ClusterBounds {
    /// Horizontal extent of the box.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent of the box.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Midpoint of the box as `(x, y)`.
    #[must_use]
    pub fn centre(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }
}

/// Output of [`crate::compute_layout`].
///
/// Bars and lines keep their emission order; the parallel accessors
/// (`bar_centres`, `bar_tops`, ...) expose the same data column-wise for
/// plotting front ends that expect one array per attribute.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    pub(crate) bars: Vec<Bar>,
    pub(crate) lines: Vec<ConnectorLine>,
    pub(crate) cluster_bounds: BTreeMap<ClusterId, ClusterBounds>,
    pub(crate) cluster_x: BTreeMap<ClusterId, f64>,
    pub(crate) cluster_y: BTreeMap<ClusterId, f64>,
    pub(crate) scaling: f64,
}

impl LayoutResult {
    /// Returns the icicle bars in emission order.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Returns the bar centres.
    #[must_use]
    pub fn bar_centres(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.centre).collect()
    }

    /// Returns the bar extents above their bottoms.
    ///
    /// Named after the plotting convention where a bar's `top` argument is
    /// its height relative to `bottom`.
    #[must_use]
    pub fn bar_tops(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.height).collect()
    }

    /// Returns the bar bottoms.
    #[must_use]
    pub fn bar_bottoms(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.bottom).collect()
    }

    /// Returns the bar widths.
    #[must_use]
    pub fn bar_widths(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.width).collect()
    }

    /// Returns the connector lines in record order.
    #[must_use]
    pub fn lines(&self) -> &[ConnectorLine] {
        &self.lines
    }

    /// Returns the connector x endpoint pairs.
    #[must_use]
    pub fn line_xs(&self) -> Vec<[f64; 2]> {
        self.lines.iter().map(|line| line.xs).collect()
    }

    /// Returns the connector y endpoint pairs.
    #[must_use]
    pub fn line_ys(&self) -> Vec<[f64; 2]> {
        self.lines.iter().map(|line| line.ys).collect()
    }

    /// Returns the bounding box of every cluster.
    #[must_use]
    pub fn cluster_bounds(&self) -> &BTreeMap<ClusterId, ClusterBounds> {
        &self.cluster_bounds
    }

    /// Returns the bounding box of `cluster`.
    #[must_use]
    pub fn bounds(&self, cluster: ClusterId) -> Option<&ClusterBounds> {
        self.cluster_bounds.get(&cluster)
    }

    /// Returns the unscaled x coordinate of every cluster.
    #[must_use]
    pub fn cluster_x(&self) -> &BTreeMap<ClusterId, f64> {
        &self.cluster_x
    }

    /// Returns the y coordinate (birth lambda) of every cluster.
    #[must_use]
    pub fn cluster_y(&self) -> &BTreeMap<ClusterId, f64> {
        &self.cluster_y
    }

    /// Returns the factor applied to x coordinates: the root's point mass.
    #[must_use]
    pub fn scaling(&self) -> f64 {
        self.scaling
    }

    /// Whether the layout holds no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.lines.is_empty() && self.cluster_bounds.is_empty()
    }
}
