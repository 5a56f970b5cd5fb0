//! Per-instance reconciliation of a rendered graph against store changes.
//!
//! On every change set a [`Graph`] decides, in this order:
//!
//! 1. fire registered callbacks for changed titles
//! 2. view switch: the holder of an unbound graph was rewritten
//! 3. view modification: [`View::refresh`] reported changed keys
//! 4. either of the above: full rebuild with a context reset
//! 5. otherwise the incremental checks of [`Graph::incremental_reason`], which rebuild
//!    without a reset or leave the graph alone

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::{
    adapter::EndpointPolicy,
    callback::CallbackRegistry,
    context::Context,
    error::TmapError,
    event::{Cursor, EdgeChange},
    graph::{data::GraphData, data::GraphDelta, hierarchy::set_hierarchy},
    properties::{Node, NodeGroup, NodeId},
    render::{GraphRenderer, Layout},
    view::{View, CONFIG_DISPLAY_NEIGHBOURS, MOD_VIEW_REMOVED},
    wiki::ChangeSet,
};

/// Label of the view that shows a focused document with everything it connects to.
pub const QUICK_CONNECT_VIEW: &str = "quick_connect";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphId(pub u64);

impl Display for GraphId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}

/// How a graph instance is set up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Label of a view to bind to. Unbound graphs follow the global holder.
    pub view: Option<String>,
    /// Document injected as the special node of the quick-connect view.
    pub focus: Option<String>,
    /// Title whose change always forces a rebuild.
    pub refresh_trigger: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    ViewSwitched,
    ViewModified(Vec<String>),
    NodeFilterMatched(String),
    NodeChanged(String),
    EdgeChanged(String),
    EdgeLogLagged(u64),
    RefreshTrigger(String),
}

impl Display for RebuildReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RebuildReason::ViewSwitched => write!(f, "view switched"),
            RebuildReason::ViewModified(keys) => write!(f, "view modified ({})", keys.join(", ")),
            RebuildReason::NodeFilterMatched(title) => write!(f, "node filter matches '{title}'"),
            RebuildReason::NodeChanged(title) => write!(f, "rendered node '{title}' changed"),
            RebuildReason::EdgeChanged(what) => write!(f, "edge changed: {what}"),
            RebuildReason::EdgeLogLagged(n) => write!(f, "edge log lagged by {n}"),
            RebuildReason::RefreshTrigger(title) => write!(f, "refresh trigger '{title}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildDecision {
    Skip,
    Rebuild {
        reason: RebuildReason,
        reset_context: bool,
    },
}

impl RebuildDecision {
    pub fn is_rebuild(&self) -> bool {
        matches!(self, RebuildDecision::Rebuild { .. })
    }
}

/// Something that can bring itself up to date with a change set.
pub trait Reconcile {
    fn refresh(&mut self, ctx: &Context, changes: &ChangeSet) -> Result<RebuildDecision, TmapError>;
}

pub struct Graph {
    id: GraphId,
    holder: String,
    bound: bool,
    view: View,
    data: GraphData,
    callbacks: CallbackRegistry,
    renderer: Box<dyn GraphRenderer>,
    edge_cursor: Cursor,
    focus: Option<String>,
    refresh_trigger: Option<String>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("holder", &self.holder)
            .field("view", &self.view.label())
            .field("nodes", &self.data.nodes().len())
            .field("edges", &self.data.edges().len())
            .finish()
    }
}

impl Graph {
    /// Create the graph shown by `holder` and render it for the first time.
    pub fn new(
        ctx: &Context,
        id: GraphId,
        holder: String,
        options: &GraphOptions,
        renderer: Box<dyn GraphRenderer>,
    ) -> Result<Graph, TmapError> {
        let local = format!("{}/", ctx.options.paths.local_holders);
        let bound = holder.starts_with(&local);
        let view = resolve_view(ctx, &holder);
        let mut graph = Graph {
            id,
            holder,
            bound,
            view,
            data: GraphData::default(),
            callbacks: CallbackRegistry::new(),
            renderer,
            edge_cursor: ctx.edge_log.head(),
            focus: options.focus.clone(),
            refresh_trigger: options.refresh_trigger.clone(),
        };
        tracing::info!("[Graph] {} created on view \"{}\"", graph.id, graph.view.label());
        graph.rebuild(ctx, true)?;
        Ok(graph)
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Bound graphs keep their view; only unbound ones follow the global holder.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn data(&self) -> &GraphData {
        &self.data
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.callbacks
    }

    pub fn set_focus(&mut self, focus: Option<String>) {
        self.focus = focus;
    }

    pub fn is_attached(&self) -> bool {
        self.renderer.is_attached()
    }

    pub fn dispose(&mut self) -> Result<(), TmapError> {
        tracing::debug!("[Graph] Disposing {}", self.id);
        self.renderer.dispose()
    }

    pub fn is_view_switched(&self, changes: &ChangeSet) -> bool {
        !self.bound && changes.contains(&self.holder)
    }

    fn layout(&self, ctx: &Context) -> Layout {
        if self.view.is_hierarchical(&ctx.wiki) {
            Layout::Hierarchical
        } else {
            Layout::Free
        }
    }

    /// Recompute what the graph shows, hand the difference to the renderer and keep the new
    /// snapshot. Nothing changes if the node filter does not compile.
    pub fn rebuild(&mut self, ctx: &Context, reset_context: bool) -> Result<GraphDelta, TmapError> {
        let next = self.build_data(ctx)?;
        let delta = self.data.diff(&next);
        if reset_context {
            self.renderer.on_context_reset(self.layout(ctx));
        }
        delta.emit(self.renderer.as_mut());
        tracing::debug!(
            "[Graph] {} rebuilt: {} nodes, {} edges",
            self.id,
            next.nodes().len(),
            next.edges().len()
        );
        self.data = next;
        self.edge_cursor = ctx.edge_log.head();
        Ok(delta)
    }

    fn build_data(&self, ctx: &Context) -> Result<GraphData, TmapError> {
        let wiki = &ctx.wiki;
        let filter = self.view.node_filter(wiki)?;
        let mut nodes = ctx
            .select_nodes_by_filter(&filter, &self.view, NodeGroup::Matches)
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect::<BTreeMap<NodeId, Node>>();

        if self.view.label() == QUICK_CONNECT_VIEW {
            if let Some(focus) = self.focus.as_deref() {
                for node in ctx.select_nodes_by_reference([focus], NodeGroup::Special) {
                    nodes.insert(node.id.clone(), node);
                }
            }
        }

        let matched = nodes.keys().cloned().collect::<BTreeSet<_>>();
        let mut edges = ctx.select_edges_by_endpoints(&matched, &self.view, EndpointPolicy::AtLeastOne);

        if self.view.is_conf_enabled(wiki, CONFIG_DISPLAY_NEIGHBOURS) {
            let positions = self.view.positions(wiki);
            let (neighbours, _) = ctx.select_neighbours(&matched, &self.view);
            for node in neighbours {
                let position = positions.get(&node.id);
                nodes
                    .entry(node.id.clone())
                    .or_insert_with(|| node.with_position(position));
            }
        }
        edges.retain(|e| nodes.contains_key(&e.from) && nodes.contains_key(&e.to));

        if self.view.is_hierarchical(wiki) {
            set_hierarchy(&mut nodes, &edges, &self.view.hierarchy_edge_types(wiki));
        }
        Ok(GraphData::new(nodes.into_values(), edges))
    }

    /// Why `changes` affect the rendered graph without touching its view, if they do.
    fn incremental_reason(
        &self,
        ctx: &Context,
        changes: &ChangeSet,
        edge_changes: Result<Vec<EdgeChange>, TmapError>,
    ) -> Result<Option<RebuildReason>, TmapError> {
        let filter = self.view.node_filter(&ctx.wiki)?;
        if let Some(title) = filter.apply(&ctx.wiki, changes.titles()).into_iter().next() {
            return Ok(Some(RebuildReason::NodeFilterMatched(title)));
        }
        if let Some(title) = changes.titles().find(|t| self.data.contains_ref(t)) {
            return Ok(Some(RebuildReason::NodeChanged(title.to_string())));
        }
        let namespaces = self.view.edge_namespaces();
        match edge_changes {
            Err(TmapError::Lagged(n)) => return Ok(Some(RebuildReason::EdgeLogLagged(n))),
            Err(e) => return Err(e),
            Ok(list) => {
                if let Some(change) = list.iter().find(|c| namespaces.contains(&c.namespace)) {
                    return Ok(Some(RebuildReason::EdgeChanged(change.to_string())));
                }
            }
        }
        let edge_filter = self.view.edge_filter()?;
        if let Some(title) = edge_filter.apply(&ctx.wiki, changes.titles()).into_iter().next() {
            return Ok(Some(RebuildReason::EdgeChanged(title)));
        }
        if let Some(trigger) = self.refresh_trigger.as_deref() {
            if changes.contains(trigger) {
                return Ok(Some(RebuildReason::RefreshTrigger(trigger.to_string())));
            }
        }
        Ok(None)
    }
}

impl Reconcile for Graph {
    fn refresh(&mut self, ctx: &Context, changes: &ChangeSet) -> Result<RebuildDecision, TmapError> {
        self.callbacks.handle_changes(ctx, changes);
        let edge_changes = ctx.edge_log.read(&mut self.edge_cursor);

        let reset_reason = if self.is_view_switched(changes) {
            self.view = resolve_view(ctx, &self.holder);
            Some(RebuildReason::ViewSwitched)
        } else {
            let modified = self.view.refresh(&ctx.wiki, changes);
            if modified.iter().any(|m| m == MOD_VIEW_REMOVED) {
                self.view = resolve_view(ctx, &self.holder);
            }
            (!modified.is_empty()).then_some(RebuildReason::ViewModified(modified))
        };

        let (reason, reset_context) = match reset_reason {
            Some(reason) => (reason, true),
            None => match self.incremental_reason(ctx, changes, edge_changes)? {
                Some(reason) => (reason, false),
                None => return Ok(RebuildDecision::Skip),
            },
        };
        tracing::debug!("[Graph] {} rebuilding: {reason}", self.id);
        self.rebuild(ctx, reset_context)?;
        Ok(RebuildDecision::Rebuild {
            reason,
            reset_context,
        })
    }
}

/// View named by the text of `holder`, or the default view when that is missing.
fn resolve_view(ctx: &Context, holder: &str) -> View {
    let root = ctx.wiki.text(holder).unwrap_or_default();
    match View::open_root(&ctx.wiki, &ctx.options, root) {
        Some(view) if view.exists(&ctx.wiki) => view,
        _ => {
            if !root.is_empty() {
                tracing::warn!("[Graph] View '{root}' does not exist, showing the default view");
            }
            View::open(&ctx.wiki, &ctx.options, &ctx.options.user.default_view)
        }
    }
}
