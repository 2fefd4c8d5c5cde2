//! Raw condensed tree rows and the cluster identifier newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a cluster in the condensed tree.
///
/// # Examples
/// ```
/// use tsurara_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    ///
    /// # Examples
    /// ```
    /// use tsurara_core::ClusterId;
    ///
    /// let id = ClusterId::new(2);
    /// assert_eq!(id.get(), 2);
    /// ```
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ClusterId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One row of a condensed tree: `child` detaches from `parent` at `lambda`.
///
/// When `child_size > 1` the child is itself a cluster; otherwise it is a
/// single data point falling out of its parent.
///
/// # Examples
/// ```
/// use tsurara_core::{ClusterId, CondensedTreeRecord};
///
/// let split = CondensedTreeRecord::new(0, 1, 0.5, 40);
/// assert_eq!(split.child_cluster(), Some(ClusterId::new(1)));
///
/// let point = CondensedTreeRecord::new(1, 17, 2.0, 1);
/// assert_eq!(point.child_cluster(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondensedTreeRecord {
    /// Cluster the child separates from.
    pub parent: u64,
    /// Cluster or data point that separates.
    pub child: u64,
    /// Density threshold at which the separation happens.
    pub lambda: f64,
    /// Number of data points subsumed by `child`.
    pub child_size: u64,
}

impl CondensedTreeRecord {
    /// Creates a record from its four columns.
    #[must_use]
    pub const fn new(parent: u64, child: u64, lambda: f64, child_size: u64) -> Self {
        Self {
            parent,
            child,
            lambda,
            child_size,
        }
    }

    /// Returns the parent as a cluster identifier.
    #[must_use]
    pub const fn parent_cluster(&self) -> ClusterId {
        ClusterId::new(self.parent)
    }

    /// Returns the child when it is a cluster rather than a single point.
    #[must_use]
    pub const fn child_cluster(&self) -> Option<ClusterId> {
        if self.is_cluster_edge() {
            Some(ClusterId::new(self.child))
        } else {
            None
        }
    }

    /// Whether this record belongs to the cluster tree.
    #[must_use]
    pub const fn is_cluster_edge(&self) -> bool {
        self.child_size > 1
    }
}

impl From<(u64, u64, f64, u64)> for CondensedTreeRecord {
    fn from((parent, child, lambda, child_size): (u64, u64, f64, u64)) -> Self {
        Self::new(parent, child, lambda, child_size)
    }
}
