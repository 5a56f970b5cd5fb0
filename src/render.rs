//! The rendering side of a graph.
//!
//! The reconciler never talks to a visualization engine directly. It hands deltas to a
//! [`GraphRenderer`] the host implements.

use crate::{
    error::TmapError,
    properties::{Edge, Node},
};

/// Layout the renderer should switch to on a context reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Free,
    Hierarchical,
}

pub trait GraphRenderer {
    fn on_nodes_added(&mut self, nodes: &[Node]);
    fn on_nodes_updated(&mut self, nodes: &[Node]);
    fn on_nodes_removed(&mut self, ids: &[String]);
    fn on_edges_added(&mut self, edges: &[Edge]);
    fn on_edges_updated(&mut self, edges: &[Edge]);
    fn on_edges_removed(&mut self, ids: &[String]);

    /// Called before the delta of a rebuild caused by a view switch or view modification.
    fn on_context_reset(&mut self, _layout: Layout) {}

    /// Whether the rendering surface still exists. Detached renderers are swept.
    fn is_attached(&self) -> bool {
        true
    }

    fn dispose(&mut self) -> Result<(), TmapError> {
        Ok(())
    }
}

/// Renderer that drops everything. Useful for headless graphs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl GraphRenderer for NullRenderer {
    fn on_nodes_added(&mut self, _nodes: &[Node]) {}
    fn on_nodes_updated(&mut self, _nodes: &[Node]) {}
    fn on_nodes_removed(&mut self, _ids: &[String]) {}
    fn on_edges_added(&mut self, _edges: &[Edge]) {}
    fn on_edges_updated(&mut self, _edges: &[Edge]) {}
    fn on_edges_removed(&mut self, _ids: &[String]) {}
}
