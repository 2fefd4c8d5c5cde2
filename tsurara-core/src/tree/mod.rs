//! Immutable condensed tree snapshot.
//!
//! A condensed tree arrives as a flat list of `(parent, child, lambda,
//! child_size)` rows. Rows whose child subsumes more than one point form the
//! *cluster tree*; the remaining rows record individual points dropping out of
//! a cluster as lambda increases.
//!
//! [`CondensedTree::from_records`] validates the rows once and indexes them so
//! the layout and selection stages can walk the cluster tree without relying
//! on identifier magnitude. Traversal order is derived from the parent/child
//! adjacency: [`CondensedTree::post_order`] always yields children before
//! their parents.

mod build;
mod record;
mod table;

use std::collections::{BTreeMap, VecDeque};

pub use self::record::{ClusterId, CondensedTreeRecord};

use crate::error::TreeError;

/// Branching of a cluster within the cluster tree.
///
/// Point children never affect the shape; only child clusters do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClusterShape {
    /// The cluster has no cluster children.
    Leaf,
    /// The cluster continues into a single cluster child.
    OneChild(ClusterId),
    /// The cluster splits into two cluster children, in record order.
    TwoChildren(ClusterId, ClusterId),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClusterNode {
    pub(crate) parent: Option<ClusterId>,
    pub(crate) birth_lambda: f64,
    pub(crate) records: Vec<usize>,
    pub(crate) cluster_children: Vec<ClusterId>,
    pub(crate) total_size: u64,
    pub(crate) death_lambda: f64,
}

impl ClusterNode {
    fn new(parent: Option<ClusterId>, birth_lambda: f64) -> Self {
        Self {
            parent,
            birth_lambda,
            records: Vec::new(),
            cluster_children: Vec::new(),
            total_size: 0,
            death_lambda: 0.0,
        }
    }

    pub(crate) fn shape(&self) -> ClusterShape {
        match *self.cluster_children.as_slice() {
            [only] => ClusterShape::OneChild(only),
            [left, right] => ClusterShape::TwoChildren(left, right),
            _ => ClusterShape::Leaf,
        }
    }
}

/// Validated, indexed condensed tree.
///
/// # Examples
/// ```
/// use tsurara_core::{ClusterId, ClusterShape, CondensedTree, CondensedTreeRecord};
///
/// let tree = CondensedTree::from_records(vec![
///     CondensedTreeRecord::new(0, 1, 0.5, 3),
///     CondensedTreeRecord::new(0, 2, 0.5, 3),
///     CondensedTreeRecord::new(1, 10, 1.0, 1),
///     CondensedTreeRecord::new(1, 11, 1.0, 1),
///     CondensedTreeRecord::new(1, 12, 1.0, 1),
///     CondensedTreeRecord::new(2, 13, 2.0, 1),
///     CondensedTreeRecord::new(2, 14, 2.0, 1),
///     CondensedTreeRecord::new(2, 15, 2.0, 1),
/// ])?;
///
/// assert_eq!(tree.root(), Some(ClusterId::new(0)));
/// assert_eq!(
///     tree.shape(ClusterId::new(0)),
///     Some(ClusterShape::TwoChildren(ClusterId::new(1), ClusterId::new(2))),
/// );
/// assert_eq!(tree.total_size(ClusterId::new(0)), Some(6));
/// # Ok::<(), tsurara_core::TreeError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CondensedTree {
    records: Vec<CondensedTreeRecord>,
    root: Option<ClusterId>,
    nodes: BTreeMap<ClusterId, ClusterNode>,
    post_order: Vec<ClusterId>,
}

impl CondensedTree {
    /// Validates `records` and builds the cluster tree index.
    ///
    /// An empty record list produces an empty tree without a root.
    ///
    /// # Errors
    /// Returns [`TreeError`] when a record carries an invalid lambda or size,
    /// when a parent is dangling, when a cluster is attached twice or has more
    /// than two cluster children, when a cluster owns no records, or when a
    /// cluster cannot be reached from the root.
    pub fn from_records(records: Vec<CondensedTreeRecord>) -> Result<Self, TreeError> {
        let index = build::TreeIndexer::new(&records).index()?;
        Ok(index.into_tree(records))
    }

    /// Returns the records in input order.
    #[must_use]
    pub fn records(&self) -> &[CondensedTreeRecord] {
        &self.records
    }

    /// Returns the root cluster, the smallest parent id in the input.
    #[must_use]
    pub fn root(&self) -> Option<ClusterId> {
        self.root
    }

    /// Returns the largest cluster id present in the tree.
    #[must_use]
    pub fn last_cluster(&self) -> Option<ClusterId> {
        self.nodes.keys().next_back().copied()
    }

    /// Returns whether the tree holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of clusters, including the root.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over cluster ids in ascending order.
    pub fn clusters(&self) -> impl DoubleEndedIterator<Item = ClusterId> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns whether `cluster` is part of the cluster tree.
    #[must_use]
    pub fn contains(&self, cluster: ClusterId) -> bool {
        self.nodes.contains_key(&cluster)
    }

    /// Returns the branching shape of `cluster`.
    #[must_use]
    pub fn shape(&self, cluster: ClusterId) -> Option<ClusterShape> {
        self.nodes.get(&cluster).map(ClusterNode::shape)
    }

    /// Returns the parent cluster of `cluster`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, cluster: ClusterId) -> Option<ClusterId> {
        self.nodes.get(&cluster).and_then(|node| node.parent)
    }

    /// Returns the direct cluster children of `cluster` in record order.
    #[must_use]
    pub fn cluster_children(&self, cluster: ClusterId) -> &[ClusterId] {
        self.nodes
            .get(&cluster)
            .map(|node| node.cluster_children.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over every record whose parent is `cluster`, in input order.
    pub fn children(
        &self,
        cluster: ClusterId,
    ) -> impl Iterator<Item = &CondensedTreeRecord> + '_ {
        self.nodes
            .get(&cluster)
            .map(|node| node.records.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&index| self.records.get(index))
    }

    /// Returns the lambda at which `cluster` separates from its parent.
    ///
    /// The root is born at lambda `0.0`.
    #[must_use]
    pub fn birth_lambda(&self, cluster: ClusterId) -> Option<f64> {
        self.nodes.get(&cluster).map(|node| node.birth_lambda)
    }

    /// Returns the largest lambda among the direct children of `cluster`.
    #[must_use]
    pub fn death_lambda(&self, cluster: ClusterId) -> Option<f64> {
        self.nodes.get(&cluster).map(|node| node.death_lambda)
    }

    /// Returns the number of points held by `cluster` when it is born.
    #[must_use]
    pub fn total_size(&self, cluster: ClusterId) -> Option<u64> {
        self.nodes.get(&cluster).map(|node| node.total_size)
    }

    /// Returns the leaves of the cluster tree in ascending id order.
    ///
    /// The root only counts as a leaf when it has no cluster children.
    #[must_use]
    pub fn leaves(&self) -> Vec<ClusterId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.cluster_children.is_empty())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Returns every cluster with children strictly before their parents.
    #[must_use]
    pub fn post_order(&self) -> &[ClusterId] {
        &self.post_order
    }

    /// Returns the clusters below `cluster`, breadth first, excluding itself.
    #[must_use]
    pub fn descendants(&self, cluster: ClusterId) -> Vec<ClusterId> {
        let mut out = Vec::new();
        let mut queue: VecDeque<ClusterId> =
            self.cluster_children(cluster).iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            out.push(current);
            queue.extend(self.cluster_children(current).iter().copied());
        }
        out
    }

    /// Iterates over the records that belong to the cluster tree, in input order.
    pub fn cluster_edges(&self) -> impl Iterator<Item = &CondensedTreeRecord> + '_ {
        self.records.iter().filter(|record| record.is_cluster_edge())
    }

    pub(crate) fn node(&self, cluster: ClusterId) -> Option<&ClusterNode> {
        self.nodes.get(&cluster)
    }
}
