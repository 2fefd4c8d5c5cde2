//! Icicle layout of the cluster tree.
//!
//! Each cluster receives a horizontal position derived from the leaves below
//! it and a vertical position equal to the lambda at which it is born. From
//! those coordinates the stage derives:
//!
//! - one bar per interval between successive child detachments, narrowing as
//!   points fall out of the cluster;
//! - a bounding box per cluster, used by selection overlays;
//! - a horizontal connector per cluster edge, joining the child to its parent
//!   at the split lambda.
//!
//! Leaves are spaced `leaf_separation` apart in ascending id order, and
//! internal clusters are placed bottom-up in post-order so no identifier
//! ordering is assumed.

mod coords;
mod geometry;
mod result;

use tracing::{info, instrument};

use crate::{error::LayoutError, tree::CondensedTree};

pub use self::result::{Bar, ClusterBounds, ConnectorLine, LayoutResult};

const DEFAULT_LEAF_SEPARATION: f64 = 1.0;

/// Configuration for [`compute_layout`].
///
/// # Examples
/// ```
/// use tsurara_core::LayoutConfig;
///
/// let config = LayoutConfig::new().with_leaf_separation(2.0).with_log_size(true);
/// assert_eq!(config.leaf_separation(), 2.0);
/// assert!(config.log_size());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    leaf_separation: f64,
    log_size: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            leaf_separation: DEFAULT_LEAF_SEPARATION,
            log_size: false,
        }
    }
}

impl LayoutConfig {
    /// Creates a configuration with unit leaf separation and linear sizes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the horizontal spacing between adjacent leaves.
    #[must_use]
    pub fn with_leaf_separation(mut self, leaf_separation: f64) -> Self {
        self.leaf_separation = leaf_separation;
        self
    }

    /// Switches size-derived quantities to the natural log of the point count.
    #[must_use]
    pub fn with_log_size(mut self, log_size: bool) -> Self {
        self.log_size = log_size;
        self
    }

    /// Returns the configured leaf separation.
    #[must_use]
    pub fn leaf_separation(&self) -> f64 {
        self.leaf_separation
    }

    /// Returns whether sizes are log-transformed.
    #[must_use]
    pub fn log_size(&self) -> bool {
        self.log_size
    }

    /// Checks the configuration before use.
    ///
    /// # Errors
    /// Returns [`LayoutError::InvalidLeafSeparation`] when the separation is
    /// not a positive finite number.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.leaf_separation.is_finite() && self.leaf_separation > 0.0 {
            Ok(())
        } else {
            Err(LayoutError::InvalidLeafSeparation {
                got: self.leaf_separation,
            })
        }
    }

    pub(crate) fn mass(&self, points: u64) -> f64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "point counts stay far below 2^52 for visualisation workloads"
        )]
        let count = points as f64;
        if self.log_size { count.ln() } else { count }
    }
}

/// Computes the icicle layout of `tree`.
///
/// An empty tree yields an empty [`LayoutResult`].
///
/// # Errors
/// Returns [`LayoutError`] when `config` is invalid.
///
/// # Examples
/// Root `0` splits into `1` and `2`, and `1` splits into `3` and `4`. The
/// leaves `2`, `3` and `4` sit at `0`, `1` and `2` times the separation.
/// ```
/// use tsurara_core::{ClusterId, CondensedTree, CondensedTreeRecord, LayoutConfig, compute_layout};
///
/// let tree = CondensedTree::from_records(vec![
///     CondensedTreeRecord::new(0, 1, 0.5, 4),
///     CondensedTreeRecord::new(0, 2, 0.5, 2),
///     CondensedTreeRecord::new(1, 3, 1.0, 2),
///     CondensedTreeRecord::new(1, 4, 1.0, 2),
///     CondensedTreeRecord::new(2, 10, 1.0, 1),
///     CondensedTreeRecord::new(2, 11, 1.0, 1),
///     CondensedTreeRecord::new(3, 12, 1.5, 1),
///     CondensedTreeRecord::new(3, 13, 1.5, 1),
///     CondensedTreeRecord::new(4, 14, 1.5, 1),
///     CondensedTreeRecord::new(4, 15, 1.5, 1),
/// ])?;
/// let layout = compute_layout(&tree, &LayoutConfig::new().with_leaf_separation(2.0))?;
/// let x = layout.cluster_x();
///
/// assert_eq!(x[&ClusterId::new(2)], 0.0);
/// assert_eq!(x[&ClusterId::new(3)], 2.0);
/// assert_eq!(x[&ClusterId::new(4)], 4.0);
/// assert_eq!(x[&ClusterId::new(1)], 3.0);
/// assert_eq!(x[&ClusterId::new(0)], 1.5);
/// assert_eq!(layout.lines().len(), 4);
/// assert_eq!(layout.cluster_bounds().len(), 5);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.layout",
    err,
    skip(tree, config),
    fields(
        clusters = tree.cluster_count(),
        leaf_separation = config.leaf_separation(),
        log_size = config.log_size(),
    ),
)]
pub fn compute_layout(
    tree: &CondensedTree,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    config.validate()?;
    let Some(root) = tree.root() else {
        info!("empty condensed tree; nothing to lay out");
        return Ok(LayoutResult::default());
    };

    let coords = coords::place_clusters(tree, config.leaf_separation());
    let scaling = config.mass(tree.total_size(root).unwrap_or_default());
    let painter = geometry::IciclePainter::new(tree, config, &coords, scaling);
    let bars = painter.bars();
    let lines = painter.connectors();
    let cluster_bounds = painter.bounds();

    let result = LayoutResult {
        bars,
        lines,
        cluster_bounds,
        cluster_x: coords.x,
        cluster_y: coords.y,
        scaling,
    };

    info!(
        bars = result.bars.len(),
        lines = result.lines.len(),
        scaling,
        "layout computed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests;
