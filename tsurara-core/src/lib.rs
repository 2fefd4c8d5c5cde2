//! Tsurara core library.
//!
//! Lays out HDBSCAN condensed trees as icicle plots and selects flat
//! clusterings from them by excess of mass.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod export;
mod layout;
mod plot;
mod selection;
mod stability;
mod tree;

pub use crate::{
    error::{
        LayoutError, LayoutErrorCode, PlotError, PlotErrorCode, SelectionError,
        SelectionErrorCode, TreeError, TreeErrorCode,
    },
    export::{ClusterGraph, GraphEdge, GraphNode},
    layout::{Bar, ClusterBounds, ConnectorLine, LayoutConfig, LayoutResult, compute_layout},
    plot::{
        AxesStyle, BarFill, ColourBar, ColourMap, PlotBackend, PlotOptions, PlotSummary,
        SelectionEllipse, WidthNormaliser, plot,
    },
    selection::{ClusterSelection, select_clusters, select_with},
    stability::{ExcessOfMass, StabilityMap, StabilityProvider},
    tree::{ClusterId, ClusterShape, CondensedTree, CondensedTreeRecord},
};
