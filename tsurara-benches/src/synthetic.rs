//! Synthetic condensed trees.
//!
//! Balanced trees number their clusters in heap order after the point ids,
//! so the root is `total_points` and cluster `i` splits into `2i + 1` and
//! `2i + 2`. Every split at depth `d` happens at lambda `d + 1`, and leaves
//! shed their points at random lambdas just above the deepest split.
//!
//! Chains are the degenerate opposite: every cluster sheds one point and
//! continues into a single child, so the tree is as deep as it is large.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tsurara_core::{CondensedTree, CondensedTreeRecord};

use crate::{error::BenchSetupError, params::TreeBenchParams};

/// Deepest supported tree; depth 20 already yields about two million clusters.
pub const MAX_DEPTH: u32 = 20;

/// Upper bound on generated points across all leaves.
pub const MAX_POINTS: u64 = 1 << 26;

/// Longest supported chain.
pub const MAX_CHAIN_DEPTH: u32 = 1 << 20;

/// A generated tree together with the parameters that produced it.
#[derive(Clone, Debug)]
pub struct SyntheticTree {
    params: TreeBenchParams,
    tree: CondensedTree,
}

impl SyntheticTree {
    /// Generates a balanced binary tree described by `params`.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::TooFewPoints`] when leaves would own fewer
    /// than two points, [`BenchSetupError::TooLarge`] when the tree exceeds
    /// [`MAX_DEPTH`] or [`MAX_POINTS`], and [`BenchSetupError::Tree`] when the
    /// generated records fail validation.
    pub fn generate(params: TreeBenchParams, seed: u64) -> Result<Self, BenchSetupError> {
        let records = balanced_records(params, seed)?;
        let tree = CondensedTree::from_records(records)?;
        Ok(Self { params, tree })
    }

    /// Generates a chain of `params.depth` single-child splits whose last
    /// cluster drops `params.points_per_leaf` points.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::TooFewPoints`] when the last cluster would
    /// own fewer than two points, [`BenchSetupError::TooLarge`] when the chain
    /// exceeds [`MAX_CHAIN_DEPTH`] or [`MAX_POINTS`], and
    /// [`BenchSetupError::Tree`] when the records fail validation.
    pub fn chain(params: TreeBenchParams) -> Result<Self, BenchSetupError> {
        let records = chain_records(params)?;
        let tree = CondensedTree::from_records(records)?;
        Ok(Self { params, tree })
    }

    /// Returns the generation parameters.
    #[must_use]
    pub const fn params(&self) -> TreeBenchParams {
        self.params
    }

    /// Returns the generated tree.
    #[must_use]
    pub const fn tree(&self) -> &CondensedTree {
        &self.tree
    }
}

fn balanced_records(
    params: TreeBenchParams,
    seed: u64,
) -> Result<Vec<CondensedTreeRecord>, BenchSetupError> {
    let TreeBenchParams {
        depth,
        points_per_leaf,
    } = params;
    if points_per_leaf < 2 {
        return Err(BenchSetupError::TooFewPoints {
            got: points_per_leaf,
        });
    }
    let too_large = BenchSetupError::TooLarge {
        depth,
        points_per_leaf,
    };
    if depth > MAX_DEPTH {
        return Err(too_large);
    }
    let leaf_count = 1_u64 << depth;
    let total_points = match points_per_leaf.checked_mul(leaf_count) {
        Some(total) if total <= MAX_POINTS => total,
        _ => return Err(too_large),
    };
    let internal_count = leaf_count.saturating_sub(1);
    let cluster_count = internal_count.saturating_add(leaf_count);

    let mut records = Vec::new();
    for index in 0..internal_count {
        let level = index.saturating_add(1).ilog2();
        let child_level = level.saturating_add(1);
        let parent = total_points.saturating_add(index);
        let child_size = total_points >> child_level;
        let lambda = f64::from(child_level);
        for offset in 1..=2_u64 {
            let child = parent
                .saturating_add(index)
                .saturating_add(offset);
            records.push(CondensedTreeRecord::new(parent, child, lambda, child_size));
        }
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let low = f64::from(depth.saturating_add(1));
    let high = f64::from(depth.saturating_add(2));
    let mut point = 0_u64;
    for index in internal_count..cluster_count {
        let leaf = total_points.saturating_add(index);
        for _ in 0..points_per_leaf {
            records.push(CondensedTreeRecord::new(
                leaf,
                point,
                rng.gen_range(low..=high),
                1,
            ));
            point = point.saturating_add(1);
        }
    }
    Ok(records)
}

fn chain_records(params: TreeBenchParams) -> Result<Vec<CondensedTreeRecord>, BenchSetupError> {
    let TreeBenchParams {
        depth,
        points_per_leaf,
    } = params;
    if points_per_leaf < 2 {
        return Err(BenchSetupError::TooFewPoints {
            got: points_per_leaf,
        });
    }
    let steps = u64::from(depth);
    let total_points = match points_per_leaf.checked_add(steps) {
        Some(total) if depth <= MAX_CHAIN_DEPTH && total <= MAX_POINTS => total,
        _ => {
            return Err(BenchSetupError::TooLarge {
                depth,
                points_per_leaf,
            });
        }
    };

    let mut records = Vec::new();
    for level in 0..depth {
        let step = u64::from(level);
        let cluster = total_points.saturating_add(step);
        let lambda = f64::from(level.saturating_add(1));
        records.push(CondensedTreeRecord::new(cluster, step, lambda, 1));
        records.push(CondensedTreeRecord::new(
            cluster,
            cluster.saturating_add(1),
            lambda,
            total_points.saturating_sub(step).saturating_sub(1),
        ));
    }
    let last = total_points.saturating_add(steps);
    let lambda = f64::from(depth.saturating_add(1));
    for point in steps..total_points {
        records.push(CondensedTreeRecord::new(last, point, lambda, 1));
    }
    Ok(records)
}
