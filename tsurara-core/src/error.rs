//! Error types for the Tsurara core library.
//!
//! Each stage owns an error enum and a matching stable code enum so the CLI
//! and log pipelines can report failures without matching on display text.

use std::fmt;

use thiserror::Error;

use crate::tree::ClusterId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// A condensed tree violated one of its structural invariants.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TreeError {
    /// A record carried a negative or non-finite lambda.
    #[error("record {parent} -> {child} has invalid lambda {lambda}")]
    InvalidLambda {
        /// Parent cluster of the offending record.
        parent: u64,
        /// Child node of the offending record.
        child: u64,
        /// Lambda value observed on the record.
        lambda: f64,
    },
    /// A record declared a child subsuming no points.
    #[error("record {parent} -> {child} has child_size 0")]
    ZeroChildSize {
        /// Parent cluster of the offending record.
        parent: u64,
        /// Child node of the offending record.
        child: u64,
    },
    /// A record referenced a parent that is neither the root nor a cluster.
    #[error("parent {parent} is not the root and never appears as a cluster child")]
    UnknownParent {
        /// Dangling parent id.
        parent: u64,
    },
    /// A cluster was attached to more than one parent.
    #[error("cluster {cluster} appears as a child more than once")]
    DuplicateCluster {
        /// Cluster that was attached twice.
        cluster: ClusterId,
    },
    /// The root cluster appeared as the child of another record.
    #[error("root cluster {root} appears as a child")]
    RootHasParent {
        /// Identifier of the root cluster.
        root: ClusterId,
    },
    /// A cluster split into more than two cluster children.
    #[error("cluster {cluster} has {count} cluster children; at most 2 are allowed")]
    TooManyChildren {
        /// Cluster with excess children.
        cluster: ClusterId,
        /// Number of cluster children observed.
        count: usize,
    },
    /// A cluster never appears as a parent, so it owns no points.
    #[error("cluster {cluster} has no child records")]
    ChildlessCluster {
        /// Cluster without outgoing records.
        cluster: ClusterId,
    },
    /// A cluster cannot be reached from the root.
    #[error("cluster {cluster} is not reachable from the root")]
    UnreachableCluster {
        /// Cluster outside the root's subtree.
        cluster: ClusterId,
    },
    /// Reading or writing the tabular form failed.
    #[error("condensed tree table I/O failed: {message}")]
    Table {
        /// Rendered `csv` error.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`TreeError`] variants.
    enum TreeErrorCode for TreeError {
        /// A record carried a negative or non-finite lambda.
        InvalidLambda => InvalidLambda { .. } => "TREE_INVALID_LAMBDA",
        /// A record declared a child subsuming no points.
        ZeroChildSize => ZeroChildSize { .. } => "TREE_ZERO_CHILD_SIZE",
        /// A record referenced an unknown parent.
        UnknownParent => UnknownParent { .. } => "TREE_UNKNOWN_PARENT",
        /// A cluster was attached to more than one parent.
        DuplicateCluster => DuplicateCluster { .. } => "TREE_DUPLICATE_CLUSTER",
        /// The root cluster appeared as a child.
        RootHasParent => RootHasParent { .. } => "TREE_ROOT_HAS_PARENT",
        /// A cluster split into more than two cluster children.
        TooManyChildren => TooManyChildren { .. } => "TREE_TOO_MANY_CHILDREN",
        /// A cluster owns no child records.
        ChildlessCluster => ChildlessCluster { .. } => "TREE_CHILDLESS_CLUSTER",
        /// A cluster cannot be reached from the root.
        UnreachableCluster => UnreachableCluster { .. } => "TREE_UNREACHABLE_CLUSTER",
        /// Reading or writing the tabular form failed.
        Table => Table { .. } => "TREE_TABLE_IO",
    }
}

impl From<csv::Error> for TreeError {
    fn from(error: csv::Error) -> Self {
        Self::Table {
            message: error.to_string(),
        }
    }
}

/// Errors raised while configuring or computing a layout.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    /// Leaf separation must be positive and finite.
    #[error("leaf_separation must be positive and finite (got {got})")]
    InvalidLeafSeparation {
        /// Value supplied by the caller.
        got: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`LayoutError`] variants.
    enum LayoutErrorCode for LayoutError {
        /// Leaf separation must be positive and finite.
        InvalidLeafSeparation => InvalidLeafSeparation { .. } => "LAYOUT_INVALID_LEAF_SEPARATION",
    }
}

/// Errors raised while selecting a flat clustering.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SelectionError {
    /// The stability map lacks a score for a candidate cluster.
    #[error("stability map has no score for cluster {cluster}")]
    IncompleteStabilityMap {
        /// Cluster without a score.
        cluster: ClusterId,
    },
    /// A stability score was negative or NaN.
    #[error("stability for cluster {cluster} is invalid ({value})")]
    InvalidStability {
        /// Cluster carrying the invalid score.
        cluster: ClusterId,
        /// Observed score.
        value: f64,
    },
    /// The stability provider rejected the tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

define_error_codes! {
    /// Stable codes describing [`SelectionError`] variants.
    enum SelectionErrorCode for SelectionError {
        /// The stability map lacks a score for a candidate cluster.
        IncompleteStabilityMap => IncompleteStabilityMap { .. } => "SELECTION_INCOMPLETE_STABILITY_MAP",
        /// A stability score was negative or NaN.
        InvalidStability => InvalidStability { .. } => "SELECTION_INVALID_STABILITY",
        /// The stability provider rejected the tree.
        Tree => Tree(..) => "SELECTION_TREE",
    }
}

/// Errors raised while driving a plot backend.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlotError {
    /// No drawing backend is available to render the plot.
    #[error(
        "no plot backend is available to draw the condensed tree; use `compute_layout` to \
         calculate the plot data without drawing"
    )]
    MissingBackend,
    /// Layout computation failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// Cluster selection for the overlay failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The backend reported a drawing failure.
    #[error("plot backend failed: {message}")]
    Backend {
        /// Message supplied by the backend.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`PlotError`] variants.
    enum PlotErrorCode for PlotError {
        /// No drawing backend is available.
        MissingBackend => MissingBackend => "PLOT_MISSING_BACKEND",
        /// Layout computation failed.
        Layout => Layout(..) => "PLOT_LAYOUT",
        /// Cluster selection for the overlay failed.
        Selection => Selection(..) => "PLOT_SELECTION",
        /// The backend reported a drawing failure.
        Backend => Backend { .. } => "PLOT_BACKEND",
    }
}
