//! Directed graph view of the condensed tree.
//!
//! Every record becomes an edge `parent -> child` weighted by the lambda at
//! which the child leaves its parent; every child carries its point count as
//! a `size` attribute. Point children are included, so the graph covers the
//! full condensed tree rather than only the cluster tree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::CondensedTree;

/// One `parent -> child` edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
    /// Source node.
    pub parent: u64,
    /// Target node.
    pub child: u64,
    /// Lambda at which `child` separates from `parent`.
    pub weight: f64,
}

/// Node attributes keyed by node id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Number of points subsumed by the node.
    pub size: u64,
}

/// Serialisable directed graph built from a condensed tree.
///
/// # Examples
/// ```
/// use tsurara_core::{ClusterGraph, CondensedTree};
///
/// let tree = CondensedTree::from_records(vec![
///     (0, 1, 0.5, 2).into(),
///     (0, 2, 0.25, 1).into(),
///     (1, 3, 1.0, 1).into(),
///     (1, 4, 1.0, 1).into(),
/// ])?;
/// let graph = ClusterGraph::from_tree(&tree);
/// assert_eq!(graph.edges().len(), 4);
/// assert_eq!(graph.size(1), Some(2));
/// assert_eq!(graph.size(0), None);
/// # Ok::<(), tsurara_core::TreeError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClusterGraph {
    edges: Vec<GraphEdge>,
    nodes: BTreeMap<u64, GraphNode>,
}

impl ClusterGraph {
    /// Converts every record of `tree` into an edge, in record order.
    #[must_use]
    pub fn from_tree(tree: &CondensedTree) -> Self {
        let mut graph = Self::default();
        for record in tree.records() {
            graph.edges.push(GraphEdge {
                parent: record.parent,
                child: record.child,
                weight: record.lambda,
            });
            graph.nodes.insert(
                record.child,
                GraphNode {
                    size: record.child_size,
                },
            );
        }
        graph
    }

    /// Returns the edges in record order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Returns node attributes keyed by node id.
    #[must_use]
    pub fn nodes(&self) -> &BTreeMap<u64, GraphNode> {
        &self.nodes
    }

    /// Returns the size attribute of `node`; the root carries none.
    #[must_use]
    pub fn size(&self, node: u64) -> Option<u64> {
        self.nodes.get(&node).map(|attrs| attrs.size)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::tree::CondensedTreeRecord;

    #[rstest]
    fn empty_tree_exports_empty_graph() {
        let tree = CondensedTree::from_records(Vec::new()).expect("empty tree is valid");
        let graph = ClusterGraph::from_tree(&tree);
        assert!(graph.edges().is_empty());
        assert!(graph.nodes().is_empty());
    }

    #[rstest]
    fn edges_follow_record_order() {
        let tree = CondensedTree::from_records(vec![
            CondensedTreeRecord::new(0, 2, 0.5, 3),
            CondensedTreeRecord::new(0, 1, 0.25, 1),
            CondensedTreeRecord::new(2, 3, 0.75, 1),
            CondensedTreeRecord::new(2, 4, 0.75, 1),
        ])
        .expect("tree must be valid");
        let graph = ClusterGraph::from_tree(&tree);

        let children: Vec<u64> = graph.edges().iter().map(|edge| edge.child).collect();
        assert_eq!(children, vec![2, 1, 3, 4]);
        assert_eq!(graph.edges()[0].weight, 0.5);
        assert_eq!(graph.size(2), Some(3));
    }

    #[rstest]
    fn serialises_edges_and_nodes() {
        let tree = CondensedTree::from_records(vec![CondensedTreeRecord::new(0, 1, 0.5, 1)])
            .expect("tree must be valid");
        let json = serde_json::to_value(ClusterGraph::from_tree(&tree)).expect("serialise graph");
        assert_eq!(json["edges"][0]["weight"], 0.5);
        assert_eq!(json["nodes"]["1"]["size"], 1);
    }
}
