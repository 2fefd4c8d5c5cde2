//! Errors raised while preparing benchmark inputs.

use thiserror::Error;
use tsurara_core::TreeError;

/// Failure to synthesise a benchmark tree.
#[derive(Debug, Error)]
pub enum BenchSetupError {
    /// The requested tree would not fit in memory or in `u64` ids.
    #[error("tree of depth {depth} with {points_per_leaf} points per leaf is too large")]
    TooLarge {
        /// Requested depth.
        depth: u32,
        /// Requested points per leaf.
        points_per_leaf: u64,
    },
    /// Leaves need at least two points to count as clusters.
    #[error("points_per_leaf must be at least 2 (got {got})")]
    TooFewPoints {
        /// Requested points per leaf.
        got: u64,
    },
    /// The generated records failed validation.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
