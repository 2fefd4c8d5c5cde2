//! Validation and indexing of raw condensed tree records.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use super::{ClusterId, ClusterNode, CondensedTree, CondensedTreeRecord};
use crate::error::TreeError;

const MAX_CLUSTER_CHILDREN: usize = 2;

pub(super) struct TreeIndexer<'a> {
    records: &'a [CondensedTreeRecord],
}

pub(super) struct TreeIndex {
    root: Option<ClusterId>,
    nodes: BTreeMap<ClusterId, ClusterNode>,
    post_order: Vec<ClusterId>,
}

impl TreeIndex {
    pub(super) fn into_tree(self, records: Vec<CondensedTreeRecord>) -> CondensedTree {
        CondensedTree {
            records,
            root: self.root,
            nodes: self.nodes,
            post_order: self.post_order,
        }
    }
}

impl<'a> TreeIndexer<'a> {
    pub(super) fn new(records: &'a [CondensedTreeRecord]) -> Self {
        Self { records }
    }

    #[instrument(
        name = "core.tree.index",
        err,
        skip(self),
        fields(records = self.records.len()),
    )]
    pub(super) fn index(&self) -> Result<TreeIndex, TreeError> {
        self.validate_records()?;
        let root = self
            .records
            .iter()
            .map(CondensedTreeRecord::parent_cluster)
            .min();
        let Some(root) = root else {
            return Ok(TreeIndex {
                root: None,
                nodes: BTreeMap::new(),
                post_order: Vec::new(),
            });
        };

        let mut nodes = self.collect_clusters(root)?;
        self.attach_records(&mut nodes)?;
        check_shapes(&nodes)?;
        let post_order = post_order_from(root, &nodes)?;

        debug!(
            root = %root,
            clusters = nodes.len(),
            "indexed condensed tree"
        );
        Ok(TreeIndex {
            root: Some(root),
            nodes,
            post_order,
        })
    }

    fn validate_records(&self) -> Result<(), TreeError> {
        for record in self.records {
            if !record.lambda.is_finite() || record.lambda < 0.0 {
                return Err(TreeError::InvalidLambda {
                    parent: record.parent,
                    child: record.child,
                    lambda: record.lambda,
                });
            }
            if record.child_size == 0 {
                return Err(TreeError::ZeroChildSize {
                    parent: record.parent,
                    child: record.child,
                });
            }
        }
        Ok(())
    }

    fn collect_clusters(
        &self,
        root: ClusterId,
    ) -> Result<BTreeMap<ClusterId, ClusterNode>, TreeError> {
        let mut nodes = BTreeMap::new();
        nodes.insert(root, ClusterNode::new(None, 0.0));
        for record in self.records {
            let Some(cluster) = record.child_cluster() else {
                continue;
            };
            if cluster == root {
                return Err(TreeError::RootHasParent { root });
            }
            let node = ClusterNode::new(Some(record.parent_cluster()), record.lambda);
            if nodes.insert(cluster, node).is_some() {
                return Err(TreeError::DuplicateCluster { cluster });
            }
        }
        Ok(nodes)
    }

    fn attach_records(
        &self,
        nodes: &mut BTreeMap<ClusterId, ClusterNode>,
    ) -> Result<(), TreeError> {
        for (index, record) in self.records.iter().enumerate() {
            let node = nodes
                .get_mut(&record.parent_cluster())
                .ok_or(TreeError::UnknownParent {
                    parent: record.parent,
                })?;
            node.records.push(index);
            node.total_size = node.total_size.saturating_add(record.child_size);
            node.death_lambda = node.death_lambda.max(record.lambda);
            if let Some(cluster) = record.child_cluster() {
                node.cluster_children.push(cluster);
            }
        }
        Ok(())
    }
}

fn check_shapes(nodes: &BTreeMap<ClusterId, ClusterNode>) -> Result<(), TreeError> {
    for (&cluster, node) in nodes {
        if node.records.is_empty() {
            return Err(TreeError::ChildlessCluster { cluster });
        }
        let count = node.cluster_children.len();
        if count > MAX_CLUSTER_CHILDREN {
            return Err(TreeError::TooManyChildren { cluster, count });
        }
    }
    Ok(())
}

/// Iterative post-order walk from `root`; any cluster left unvisited sits on
/// a cycle detached from the root.
fn post_order_from(
    root: ClusterId,
    nodes: &BTreeMap<ClusterId, ClusterNode>,
) -> Result<Vec<ClusterId>, TreeError> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![(root, false)];
    while let Some((cluster, expanded)) = stack.pop() {
        if expanded {
            order.push(cluster);
            continue;
        }
        stack.push((cluster, true));
        if let Some(node) = nodes.get(&cluster) {
            for &child in node.cluster_children.iter().rev() {
                stack.push((child, false));
            }
        }
    }

    if order.len() != nodes.len() {
        let visited: BTreeSet<ClusterId> = order.iter().copied().collect();
        if let Some(&cluster) = nodes.keys().find(|id| !visited.contains(id)) {
            return Err(TreeError::UnreachableCluster { cluster });
        }
    }
    Ok(order)
}
