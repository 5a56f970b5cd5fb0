//! Edge store operations and node selection against the document store.
//!
//! Edges are persisted one document per edge below an edge namespace (see
//! [`crate::properties::edge_title`]). Every mutation is appended to the
//! [`crate::event::EdgeChangeLog`] so graphs learn which edges changed without diffing
//! namespaces themselves.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{
    context::Context,
    error::TmapError,
    event::{EdgeChange, EdgeOp},
    filter::Filter,
    properties::{edge_title, Edge, EdgeId, Node, NodeGroup, NodeId, Position, PositionMap},
    wiki::Tiddler,
    view::View,
};

/// How many endpoints of an edge must lie in the node set for the edge to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointPolicy {
    /// `=2`: both endpoints.
    Both,
    /// `>=1`: at least one endpoint.
    AtLeastOne,
}

impl EndpointPolicy {
    fn admits(&self, edge: &Edge, nodes: &BTreeSet<NodeId>) -> bool {
        let from = nodes.contains(&edge.from);
        let to = nodes.contains(&edge.to);
        match self {
            EndpointPolicy::Both => from && to,
            EndpointPolicy::AtLeastOne => from || to,
        }
    }
}

impl FromStr for EndpointPolicy {
    type Err = TmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=2" => Ok(EndpointPolicy::Both),
            ">=1" => Ok(EndpointPolicy::AtLeastOne),
            other => Err(TmapError::Custom(format!(
                "unknown endpoint policy '{other}', expected '=2' or '>=1'"
            ))),
        }
    }
}

impl Display for EndpointPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointPolicy::Both => write!(f, "=2"),
            EndpointPolicy::AtLeastOne => write!(f, ">=1"),
        }
    }
}

/// A persisted edge together with where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEdge {
    pub edge: Edge,
    pub namespace: String,
    pub title: String,
}

impl Context {
    fn stored_edges_in(&self, namespace: &str) -> Vec<StoredEdge> {
        let prefix = format!("{namespace}/");
        self.wiki
            .titles_with_prefix(&prefix)
            .filter_map(|title| self.wiki.get(title))
            .filter_map(|tiddler| match Edge::from_tiddler(tiddler) {
                Ok(edge) => Some(StoredEdge {
                    edge,
                    namespace: namespace.to_string(),
                    title: tiddler.title.clone(),
                }),
                Err(e) => {
                    tracing::warn!("[EdgeStore] Skipping {}: {e}", tiddler.title);
                    None
                }
            })
            .collect()
    }

    /// Every edge visible to `view`: the shared namespace plus the view's own.
    pub fn stored_edges(&self, view: &View) -> Vec<StoredEdge> {
        view.edge_namespaces()
            .iter()
            .flat_map(|ns| self.stored_edges_in(ns))
            .collect()
    }

    /// Edges of every namespace: shared and each view's local one.
    fn all_stored_edges(&self) -> Vec<StoredEdge> {
        let views_prefix = format!("{}/", self.options.paths.views);
        let local_namespaces = self
            .wiki
            .titles_with_prefix(&views_prefix)
            .filter_map(|title| {
                let label = title[views_prefix.len()..].split('/').next()?;
                Some(format!("{views_prefix}{label}/edges"))
            })
            .collect::<BTreeSet<_>>();
        std::iter::once(self.options.paths.edges.clone())
            .chain(local_namespaces)
            .flat_map(|ns| self.stored_edges_in(&ns))
            .collect()
    }

    pub fn edge_by_id(&self, id: &EdgeId, view: &View) -> Option<StoredEdge> {
        self.stored_edges(view)
            .into_iter()
            .find(|stored| stored.edge.id.as_ref() == Some(id))
    }

    /// Persist `edge` for `view`.
    ///
    /// Both endpoints must resolve to a document, though not necessarily one shown by `view`.
    /// An edge without id gets a fresh one; an edge whose id is already stored replaces that
    /// document in place. Empty labels become the configured unknown label.
    pub fn insert_edge(&mut self, mut edge: Edge, view: &View) -> Result<Edge, TmapError> {
        for endpoint in [&edge.from, &edge.to] {
            if endpoint.is_empty() {
                return Err(TmapError::InvalidEdge(format!("{edge} has an empty endpoint")));
            }
            if self.resolve_node(endpoint).is_none() {
                return Err(TmapError::InvalidEdge(format!(
                    "{edge}: no document for node '{endpoint}'"
                )));
            }
        }
        if edge.label.is_empty() {
            edge.label = self.options.user.unknown_edge_label.clone();
        }
        let id = *edge.id.get_or_insert_with(EdgeId::generate);

        let (op, namespace) = match self.edge_by_id(&id, view) {
            Some(previous) => {
                self.wiki.delete(&previous.title);
                (EdgeOp::Update, previous.namespace)
            }
            None => (EdgeOp::Insert, view.edge_store_location(&self.wiki)),
        };
        self.wiki.put(edge.to_tiddler(&namespace)?);
        tracing::debug!("[EdgeStore] {op} {edge} as {}", edge_title(&namespace, &edge.label, &id));
        self.edge_log.push(EdgeChange {
            op,
            edge: edge.clone(),
            namespace,
        });
        Ok(edge)
    }

    /// Delete the documents of `edges` visible to `view`. Returns how many were removed;
    /// edges without an id or without a stored document are skipped.
    pub fn delete_edges_from_store(&mut self, edges: &[Edge], view: &View) -> usize {
        let by_id = self
            .stored_edges(view)
            .into_iter()
            .filter_map(|s| s.edge.id.map(|id| (id, s)))
            .collect::<BTreeMap<_, _>>();
        let mut removed = 0;
        for edge in edges {
            let Some(stored) = edge.id.and_then(|id| by_id.get(&id)) else {
                tracing::debug!("[EdgeStore] Nothing stored for {edge}, skipping");
                continue;
            };
            self.remove_stored_edge(stored.clone());
            removed += 1;
        }
        removed
    }

    fn remove_stored_edge(&mut self, stored: StoredEdge) {
        self.wiki.delete(&stored.title);
        tracing::debug!("[EdgeStore] delete {} from {}", stored.edge, stored.namespace);
        self.edge_log.push(EdgeChange {
            op: EdgeOp::Delete,
            edge: stored.edge,
            namespace: stored.namespace,
        });
    }

    /// Edges of `view` with one or both endpoints in `nodes`, according to `policy`. Edges
    /// with an endpoint that resolves to no document are left out.
    pub fn select_edges_by_endpoints(
        &self,
        nodes: &BTreeSet<NodeId>,
        view: &View,
        policy: EndpointPolicy,
    ) -> Vec<Edge> {
        let known = self.node_index();
        self.stored_edges(view)
            .into_iter()
            .map(|s| s.edge)
            .filter(|edge| policy.admits(edge, nodes))
            .filter(|edge| known.contains_key(&edge.from) && known.contains_key(&edge.to))
            .collect()
    }

    /// Nodes one edge away from `nodes` that are not in `nodes` themselves, with the edges
    /// connecting them. Edge ends without a document are dropped.
    pub fn select_neighbours(&self, nodes: &BTreeSet<NodeId>, view: &View) -> (Vec<Node>, Vec<Edge>) {
        let mut neighbours = BTreeMap::new();
        let mut edges = Vec::new();
        for edge in self.select_edges_by_endpoints(nodes, view, EndpointPolicy::AtLeastOne) {
            let outer = if nodes.contains(&edge.from) {
                &edge.to
            } else {
                &edge.from
            };
            if nodes.contains(outer) {
                continue;
            }
            let Some(tiddler) = self.resolve_node(outer) else {
                continue;
            };
            neighbours
                .entry(outer.clone())
                .or_insert_with(|| Node::from_tiddler(tiddler, &self.options.user, NodeGroup::Neighbours));
            edges.push(edge);
        }
        (neighbours.into_values().collect(), edges)
    }

    /// Nodes for every existing document matched by `filter`, placed where `view` last
    /// stored them.
    pub fn select_nodes_by_filter(&self, filter: &Filter, view: &View, group: NodeGroup) -> Vec<Node> {
        let positions = view.positions(&self.wiki);
        self.select_nodes_by_reference(filter.select(&self.wiki).iter().map(|t| t.as_str()), group)
            .into_iter()
            .map(|node| {
                let position = positions.get(&node.id);
                node.with_position(position)
            })
            .collect()
    }

    /// Nodes for the given titles. Titles without a document are skipped.
    pub fn select_nodes_by_reference<'a, I: IntoIterator<Item = &'a str>>(
        &self,
        titles: I,
        group: NodeGroup,
    ) -> Vec<Node> {
        titles
            .into_iter()
            .filter_map(|title| self.wiki.get(title))
            .map(|tiddler| Node::from_tiddler(tiddler, &self.options.user, group))
            .collect()
    }

    /// Create a document for a new node. A taken title gets a numeric suffix. With a view the
    /// node is added to its node filter and `position` is stored in its position map.
    pub fn create_node(
        &mut self,
        title: &str,
        position: Option<Position>,
        view: Option<&View>,
    ) -> Result<Node, TmapError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TmapError::Custom("node title must not be empty".to_string()));
        }
        let title = self.unused_title(title);
        let tiddler = Tiddler::new(title.as_str());
        let node = Node::from_tiddler(&tiddler, &self.options.user, NodeGroup::Matches)
            .with_position(position.as_ref());
        self.wiki.put(tiddler);
        tracing::debug!("[EdgeStore] Created node {title}");
        if let Some(view) = view {
            view.add_node_to_view(&mut self.wiki, &node)?;
            if let Some(position) = position {
                view.store_positions(&mut self.wiki, &PositionMap::from([(node.id.clone(), position)]))?;
            }
        }
        Ok(node)
    }

    fn unused_title(&self, base: &str) -> String {
        if !self.wiki.exists(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base} {n}"))
            .find(|candidate| !self.wiki.exists(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Delete the documents of `nodes` together with every stored edge touching them, in any
    /// namespace. Returns the number of deleted edges.
    pub fn delete_nodes_from_store(&mut self, nodes: &[Node]) -> usize {
        let ids = nodes.iter().map(|n| n.id.clone()).collect::<BTreeSet<_>>();
        let touching = self
            .all_stored_edges()
            .into_iter()
            .filter(|s| EndpointPolicy::AtLeastOne.admits(&s.edge, &ids))
            .collect::<Vec<_>>();
        let removed = touching.len();
        for stored in touching {
            self.remove_stored_edge(stored);
        }
        for node in nodes {
            if self.wiki.delete(&node.tref).is_some() {
                tracing::debug!("[EdgeStore] Deleted node {}", node.tref);
            }
        }
        removed
    }
}
