//! Flat cluster selection by excess of mass.
//!
//! Clusters are visited bottom-up in post-order so every child is resolved
//! before its parent. For each non-root cluster the selector compares the
//! cluster's own stability with the summed stability of its direct cluster
//! children:
//!
//! - When the children win (strictly greater), the cluster is dropped and its
//!   score is replaced by the children's sum so ancestors compare against the
//!   best achievable descendant stability.
//! - Otherwise the cluster is kept and absorbs its whole subtree: every
//!   descendant is deselected. Ties therefore favour the coarser cluster.
//!   Deselection stops at descendants that won their own comparison; their
//!   subtrees are already clear.
//!
//! The caller's stability map is never modified; the selector works on a
//! private copy and returns it alongside the chosen ids.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument};

use crate::{
    error::SelectionError,
    stability::{StabilityMap, StabilityProvider},
    tree::{ClusterId, CondensedTree},
};

/// Outcome of [`select_clusters`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterSelection {
    selected: BTreeSet<ClusterId>,
    stability: StabilityMap,
}

impl ClusterSelection {
    /// Returns the selected clusters in ascending id order.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<ClusterId> {
        &self.selected
    }

    /// Returns whether `cluster` was selected.
    #[must_use]
    pub fn contains(&self, cluster: ClusterId) -> bool {
        self.selected.contains(&cluster)
    }

    /// Returns the number of selected clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns whether no cluster was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns the working stability map after propagation.
    ///
    /// Dropped clusters carry the aggregated stability of their best
    /// descendant selection.
    #[must_use]
    pub fn stability(&self) -> &StabilityMap {
        &self.stability
    }

    /// Sums the working stability of the selected clusters.
    #[must_use]
    pub fn total_stability(&self) -> f64 {
        self.selected
            .iter()
            .filter_map(|cluster| self.stability.get(cluster))
            .sum()
    }
}

/// Selects the flat clustering that maximises total stability.
///
/// The root never takes part in the selection, so a tree without cluster
/// edges yields an empty selection.
///
/// # Errors
/// Returns [`SelectionError::IncompleteStabilityMap`] when a non-root cluster
/// has no score and [`SelectionError::InvalidStability`] when a score is
/// negative or NaN.
///
/// # Examples
/// Root `0` splits into `1` and `2`, and `1` splits into `3` and `4`. With
/// scores `{1: 5, 2: 5, 3: 2, 4: 2}` the coarse clusters win.
/// ```
/// use tsurara_core::{ClusterId, CondensedTree, StabilityMap, select_clusters};
///
/// let tree = CondensedTree::from_records(vec![
///     (0, 1, 0.5, 4).into(),
///     (0, 2, 0.5, 2).into(),
///     (1, 3, 1.0, 2).into(),
///     (1, 4, 1.0, 2).into(),
///     (2, 10, 1.0, 1).into(),
///     (2, 11, 1.0, 1).into(),
///     (3, 12, 1.5, 1).into(),
///     (3, 13, 1.5, 1).into(),
///     (4, 14, 1.5, 1).into(),
///     (4, 15, 1.5, 1).into(),
/// ])?;
/// let stability: StabilityMap = [(1, 5.0), (2, 5.0), (3, 2.0), (4, 2.0)]
///     .into_iter()
///     .map(|(id, score)| (ClusterId::new(id), score))
///     .collect();
///
/// let selection = select_clusters(&tree, &stability)?;
/// let selected: Vec<u64> = selection.selected().iter().map(|id| id.get()).collect();
/// assert_eq!(selected, vec![1, 2]);
/// assert_eq!(selection.total_stability(), 10.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.select",
    err,
    skip(tree, stability),
    fields(clusters = tree.cluster_count(), scores = stability.len()),
)]
pub fn select_clusters(
    tree: &CondensedTree,
    stability: &StabilityMap,
) -> Result<ClusterSelection, SelectionError> {
    let Some(root) = tree.root() else {
        return Ok(ClusterSelection::default());
    };

    let mut working = candidate_scores(tree, root, stability)?;
    let mut is_cluster: BTreeMap<ClusterId, bool> =
        working.keys().map(|&cluster| (cluster, true)).collect();

    for &node in tree.post_order() {
        if node == root {
            continue;
        }
        let subtree_stability: f64 = tree
            .cluster_children(node)
            .iter()
            .filter_map(|child| working.get(child))
            .sum();
        let own = working.get(&node).copied().unwrap_or_default();

        if subtree_stability > own {
            is_cluster.insert(node, false);
            working.insert(node, subtree_stability);
        } else {
            let visited = deselect_below(tree, node, &mut is_cluster);
            debug!(cluster = %node, visited, "cluster absorbs subtree");
        }
    }

    let selected: BTreeSet<ClusterId> = is_cluster
        .into_iter()
        .filter_map(|(cluster, keep)| keep.then_some(cluster))
        .collect();
    info!(selected = selected.len(), "clusters selected");
    Ok(ClusterSelection {
        selected,
        stability: working,
    })
}

/// Scores `tree` with `provider` and selects clusters from the result.
///
/// # Errors
/// Returns [`SelectionError::Tree`] when the provider fails, and any error
/// raised by [`select_clusters`].
pub fn select_with<P>(
    tree: &CondensedTree,
    provider: &P,
) -> Result<ClusterSelection, SelectionError>
where
    P: StabilityProvider + ?Sized,
{
    let stability = provider.stability(tree)?;
    select_clusters(tree, &stability)
}

/// Clears the selection flag of every cluster below `node`.
///
/// The walk stops at clusters that are still flagged: each of them won its
/// own comparison earlier in the post-order and already cleared its subtree.
/// Only clusters that lost are descended through, so a cluster is visited by
/// its nearest absorbing ancestor alone. Returns the number of visits.
fn deselect_below(
    tree: &CondensedTree,
    node: ClusterId,
    is_cluster: &mut BTreeMap<ClusterId, bool>,
) -> usize {
    let mut visited = 0_usize;
    let mut stack: Vec<ClusterId> = tree.cluster_children(node).to_vec();
    while let Some(current) = stack.pop() {
        visited += 1;
        match is_cluster.get_mut(&current) {
            Some(flag) if *flag => *flag = false,
            _ => stack.extend_from_slice(tree.cluster_children(current)),
        }
    }
    visited
}

fn candidate_scores(
    tree: &CondensedTree,
    root: ClusterId,
    stability: &StabilityMap,
) -> Result<StabilityMap, SelectionError> {
    tree.clusters()
        .filter(|&cluster| cluster != root)
        .map(|cluster| {
            let value = stability
                .get(&cluster)
                .copied()
                .ok_or(SelectionError::IncompleteStabilityMap { cluster })?;
            if value.is_nan() || value < 0.0 {
                return Err(SelectionError::InvalidStability { cluster, value });
            }
            Ok((cluster, value))
        })
        .collect()
}
