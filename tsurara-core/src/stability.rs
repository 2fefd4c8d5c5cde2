//! Per-cluster persistence scores consumed by cluster selection.
//!
//! Selection treats stability as a black box behind [`StabilityProvider`].
//! [`ExcessOfMass`] supplies the usual HDBSCAN score: every child contributes
//! `(lambda - birth_lambda(parent)) * child_size` to its parent, so a cluster
//! scores higher the longer its points persist after it forms.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    error::TreeError,
    tree::{ClusterId, CondensedTree},
};

/// Mapping from cluster id to its persistence score.
pub type StabilityMap = BTreeMap<ClusterId, f64>;

/// Computes a stability score for every cluster of a condensed tree.
///
/// Closures taking a tree and returning a map implement the trait, which keeps
/// ad hoc scoring rules cheap to plug in.
///
/// # Examples
/// ```
/// use tsurara_core::{ClusterId, CondensedTree, StabilityMap, StabilityProvider, TreeError};
///
/// let constant = |tree: &CondensedTree| -> Result<StabilityMap, TreeError> {
///     Ok(tree.clusters().map(|id| (id, 1.0)).collect())
/// };
/// let tree = CondensedTree::from_records(vec![
///     (0, 1, 0.5, 1).into(),
///     (0, 2, 0.5, 1).into(),
/// ])?;
/// let map = constant.stability(&tree)?;
/// assert_eq!(map.get(&ClusterId::new(0)), Some(&1.0));
/// # Ok::<(), TreeError>(())
/// ```
pub trait StabilityProvider {
    /// Scores every cluster in `tree`.
    ///
    /// # Errors
    /// Returns [`TreeError`] when the provider cannot score the tree.
    fn stability(&self, tree: &CondensedTree) -> Result<StabilityMap, TreeError>;
}

impl<F> StabilityProvider for F
where
    F: Fn(&CondensedTree) -> Result<StabilityMap, TreeError>,
{
    fn stability(&self, tree: &CondensedTree) -> Result<StabilityMap, TreeError> {
        self(tree)
    }
}

/// Excess-of-mass stability.
///
/// # Examples
/// ```
/// use tsurara_core::{ClusterId, CondensedTree, ExcessOfMass, StabilityProvider};
///
/// let tree = CondensedTree::from_records(vec![
///     (0, 1, 0.5, 2).into(),
///     (0, 2, 0.5, 2).into(),
///     (1, 10, 1.5, 1).into(),
///     (1, 11, 1.5, 1).into(),
///     (2, 12, 0.75, 1).into(),
///     (2, 13, 0.75, 1).into(),
/// ])?;
/// let stability = ExcessOfMass.stability(&tree)?;
/// assert_eq!(stability[&ClusterId::new(1)], 2.0);
/// assert_eq!(stability[&ClusterId::new(2)], 0.5);
/// # Ok::<(), tsurara_core::TreeError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExcessOfMass;

impl StabilityProvider for ExcessOfMass {
    #[instrument(
        name = "core.stability",
        skip(self, tree),
        fields(clusters = tree.cluster_count()),
    )]
    fn stability(&self, tree: &CondensedTree) -> Result<StabilityMap, TreeError> {
        let mut scores: StabilityMap = tree.clusters().map(|id| (id, 0.0)).collect();
        for record in tree.records() {
            let parent = record.parent_cluster();
            let Some(birth) = tree.birth_lambda(parent) else {
                return Err(TreeError::UnknownParent {
                    parent: record.parent,
                });
            };
            #[expect(
                clippy::cast_precision_loss,
                reason = "point counts stay far below 2^52"
            )]
            let size = record.child_size as f64;
            if let Some(score) = scores.get_mut(&parent) {
                *score += (record.lambda - birth) * size;
            }
        }
        debug!(clusters = scores.len(), "stability computed");
        Ok(scores)
    }
}
