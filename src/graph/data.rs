//! Rendered graph snapshots and the deltas between them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    properties::{Edge, Node, NodeId},
    render::GraphRenderer,
};

/// Key of an edge within a snapshot. Stored edges always carry an id; the fallback only
/// keeps unsaved edges apart.
pub fn edge_key(edge: &Edge) -> String {
    match &edge.id {
        Some(id) => id.to_string(),
        None => format!("{}|{}|{}", edge.from, edge.label, edge.to),
    }
}

/// What a graph currently renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<String, Edge>,
    /// Source document title to node id.
    nodes_by_ref: BTreeMap<String, NodeId>,
}

impl GraphData {
    pub fn new<N, E>(nodes: N, edges: E) -> GraphData
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let nodes = nodes
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect::<BTreeMap<_, _>>();
        let nodes_by_ref = nodes
            .values()
            .map(|n| (n.tref.clone(), n.id.clone()))
            .collect();
        let edges = edges.into_iter().map(|e| (edge_key(&e), e)).collect();
        GraphData {
            nodes,
            edges,
            nodes_by_ref,
        }
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<String, Edge> {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_by_ref(&self, tref: &str) -> Option<&Node> {
        self.nodes_by_ref.get(tref).and_then(|id| self.nodes.get(id))
    }

    pub fn contains_ref(&self, tref: &str) -> bool {
        self.nodes_by_ref.contains_key(tref)
    }

    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Changes that turn `self` into `next`.
    pub fn diff(&self, next: &GraphData) -> GraphDelta {
        let mut delta = GraphDelta::default();
        for (id, node) in next.nodes.iter() {
            match self.nodes.get(id) {
                None => delta.nodes_added.push(node.clone()),
                Some(old) if old != node => delta.nodes_updated.push(node.clone()),
                Some(_) => {}
            }
        }
        delta.nodes_removed = self
            .nodes
            .keys()
            .filter(|id| !next.nodes.contains_key(*id))
            .cloned()
            .collect();

        for (key, edge) in next.edges.iter() {
            match self.edges.get(key) {
                None => delta.edges_added.push(edge.clone()),
                Some(old) if old != edge => delta.edges_updated.push(edge.clone()),
                Some(_) => {}
            }
        }
        delta.edges_removed = self
            .edges
            .keys()
            .filter(|key| !next.edges.contains_key(*key))
            .cloned()
            .collect();
        delta
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDelta {
    pub nodes_added: Vec<Node>,
    pub nodes_updated: Vec<Node>,
    pub nodes_removed: Vec<NodeId>,
    pub edges_added: Vec<Edge>,
    pub edges_updated: Vec<Edge>,
    pub edges_removed: Vec<String>,
}

impl GraphDelta {
    pub fn is_empty(&self) -> bool {
        self.nodes_added.is_empty()
            && self.nodes_updated.is_empty()
            && self.nodes_removed.is_empty()
            && self.edges_added.is_empty()
            && self.edges_updated.is_empty()
            && self.edges_removed.is_empty()
    }

    /// Hand the delta to `renderer`. Removals go first so ids freed by a removal can be
    /// reused by an addition. Empty parts are not reported.
    pub fn emit(&self, renderer: &mut dyn GraphRenderer) {
        if !self.edges_removed.is_empty() {
            renderer.on_edges_removed(&self.edges_removed);
        }
        if !self.nodes_removed.is_empty() {
            renderer.on_nodes_removed(&self.nodes_removed);
        }
        if !self.nodes_added.is_empty() {
            renderer.on_nodes_added(&self.nodes_added);
        }
        if !self.nodes_updated.is_empty() {
            renderer.on_nodes_updated(&self.nodes_updated);
        }
        if !self.edges_added.is_empty() {
            renderer.on_edges_added(&self.edges_added);
        }
        if !self.edges_updated.is_empty() {
            renderer.on_edges_updated(&self.edges_updated);
        }
    }
}
