//! Graph module: what a graph instance renders and how it stays current.
//!
//! # Module Organization
//!
//! - [`data`]: Rendered snapshots ([`GraphData`]) and deltas ([`GraphDelta`])
//! - [`hierarchy`]: Level assignment for the hierarchical layout
//! - [`reconciler`]: The per-instance [`Graph`] and its [`Reconcile`] implementation

pub mod data;
pub mod hierarchy;
pub mod reconciler;


pub use data::{edge_key, GraphData, GraphDelta};
pub use hierarchy::{compute_levels, set_hierarchy, ROOT_LEVEL};
pub use reconciler::{
    Graph, GraphId, GraphOptions, RebuildDecision, RebuildReason, Reconcile, QUICK_CONNECT_VIEW,
};
