//! The process-wide owner of the [`Context`] and every live [`Graph`].
//!
//! The caretaker closes store transactions, reloads options when their document changed,
//! hands each change set to every graph and evicts graphs whose renderer went away.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use crate::{
    config::Options,
    context::Context,
    error::TmapError,
    graph::{Graph, GraphId, GraphOptions, RebuildDecision, Reconcile},
    properties::Uuid,
    render::GraphRenderer,
    view::View,
    wiki::Wiki,
};

/// Minimum time between two liveness sweeps driven by [`Caretaker::tick`].
pub const LIVENESS_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of one [`Caretaker::dispatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Number of titles in the dispatched change set.
    pub changes: usize,
    pub options_reloaded: bool,
    pub options_error: Option<TmapError>,
    pub decisions: BTreeMap<GraphId, RebuildDecision>,
    /// Graphs whose refresh failed. Their snapshot is unchanged.
    pub errors: BTreeMap<GraphId, TmapError>,
    /// Messages for the host to show the user. Empty unless `notifications` is enabled.
    pub notices: Vec<String>,
}

impl DispatchReport {
    pub fn rebuilt(&self) -> impl Iterator<Item = &GraphId> {
        self.decisions
            .iter()
            .filter(|(_, d)| d.is_rebuild())
            .map(|(id, _)| id)
    }
}

#[derive(Debug)]
pub struct Caretaker {
    ctx: Context,
    graphs: BTreeMap<GraphId, Graph>,
    next_id: u64,
    last_sweep: Option<Instant>,
}

impl Caretaker {
    pub fn new(options: Options) -> Result<Caretaker, TmapError> {
        Caretaker::with_wiki(options, Wiki::new())
    }

    /// Take over `wiki`, making sure the default view and the global holder exist. Changes
    /// pending in `wiki` are discarded.
    pub fn with_wiki(options: Options, wiki: Wiki) -> Result<Caretaker, TmapError> {
        let mut ctx = Context::new(options, wiki);
        let default_label = ctx.options.user.default_view.clone();
        if !ctx.wiki.exists(&ctx.options.view_root(&default_label)) {
            View::create(&mut ctx.wiki, &ctx.options, &default_label, None)?;
        }
        let holder = ctx.options.paths.default_view_holder.clone();
        if ctx.wiki.text(&holder).unwrap_or_default().is_empty() {
            let root = ctx.options.default_view_root();
            ctx.wiki.put_text(holder, root);
        }
        let discarded = ctx.wiki.take_changes();
        tracing::debug!("[Caretaker] Ready, discarded {} pending changes", discarded.len());
        Ok(Caretaker {
            ctx,
            graphs: BTreeMap::new(),
            next_id: 1,
            last_sweep: None,
        })
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Mutable access for store writes. Changes take effect on the next [`Caretaker::dispatch`].
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn wiki_mut(&mut self) -> &mut Wiki {
        &mut self.ctx.wiki
    }

    pub fn options(&self) -> &Options {
        &self.ctx.options
    }

    pub fn create_view(&mut self, label: &str, node_filter: Option<&str>) -> Result<View, TmapError> {
        View::create(&mut self.ctx.wiki, &self.ctx.options, label, node_filter)
    }

    pub fn open_view(&self, label: &str) -> Result<View, TmapError> {
        let view = View::open(&self.ctx.wiki, &self.ctx.options, label);
        if !view.exists(&self.ctx.wiki) {
            return Err(TmapError::NotFound(format!("view '{label}'")));
        }
        Ok(view)
    }

    /// Register a graph and render it. A graph naming an existing view is bound to it through
    /// a fresh holder; any other graph follows the global holder.
    pub fn create_graph(
        &mut self,
        options: GraphOptions,
        renderer: Box<dyn GraphRenderer>,
    ) -> Result<GraphId, TmapError> {
        let holder = match options.view.as_deref() {
            Some(label) if self.ctx.wiki.exists(&self.ctx.options.view_root(label)) => {
                let holder = format!("{}/{}", self.ctx.options.paths.local_holders, Uuid::new_v4());
                let root = self.ctx.options.view_root(label);
                self.ctx.wiki.put_text(holder.as_str(), root);
                holder
            }
            Some(label) => {
                tracing::warn!("[Caretaker] No view \"{label}\", graph follows the global holder");
                self.ctx.options.paths.default_view_holder.clone()
            }
            None => self.ctx.options.paths.default_view_holder.clone(),
        };
        let id = GraphId(self.next_id);
        let graph = Graph::new(&self.ctx, id, holder, &options, renderer)?;
        self.next_id += 1;
        self.graphs.insert(id, graph);
        Ok(id)
    }

    pub fn graph(&self, id: GraphId) -> Option<&Graph> {
        self.graphs.get(&id)
    }

    pub fn graph_mut(&mut self, id: GraphId) -> Option<&mut Graph> {
        self.graphs.get_mut(&id)
    }

    pub fn graph_ids(&self) -> Vec<GraphId> {
        self.graphs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Unregister a graph, dispose its renderer and drop its bound holder.
    pub fn remove_graph(&mut self, id: GraphId) -> Result<(), TmapError> {
        let mut graph = self
            .graphs
            .remove(&id)
            .ok_or_else(|| TmapError::NotFound(format!("{id}")))?;
        if graph.is_bound() {
            self.ctx.wiki.delete(graph.holder());
        }
        graph.dispose()
    }

    /// Show the view called `label` in an unbound graph by rewriting the global holder.
    pub fn set_view(&mut self, id: GraphId, label: &str) -> Result<(), TmapError> {
        let root = self.open_view(label)?.root().to_string();
        let graph = self
            .graphs
            .get(&id)
            .ok_or_else(|| TmapError::NotFound(format!("{id}")))?;
        if graph.is_bound() {
            return Err(TmapError::Custom(format!(
                "{id} is bound to view \"{}\"",
                graph.view().label()
            )));
        }
        let holder = graph.holder().to_string();
        tracing::debug!("[Caretaker] {holder} now shows {root}");
        self.ctx.wiki.put_text(holder, root);
        Ok(())
    }

    /// Rename the view shown by graph `id`.
    pub fn rename_view(&mut self, id: GraphId, new_label: &str) -> Result<(), TmapError> {
        let graph = self
            .graphs
            .get_mut(&id)
            .ok_or_else(|| TmapError::NotFound(format!("{id}")))?;
        graph
            .view_mut()
            .rename(&mut self.ctx.wiki, &self.ctx.options, new_label)
    }

    pub fn destroy_view(&mut self, label: &str) -> Result<(), TmapError> {
        let view = self.open_view(label)?;
        view.destroy(&mut self.ctx.wiki, &self.ctx.options)
    }

    /// Reload the user options from the options document. A deleted document restores the
    /// defaults.
    fn reload_options(&mut self, report: &mut DispatchReport) {
        let content = self
            .ctx
            .wiki
            .text(&self.ctx.options.paths.options)
            .unwrap_or_default()
            .to_string();
        match self.ctx.options.reload_user(&content) {
            Ok(changed) => {
                if changed {
                    tracing::info!("[Caretaker] User options reloaded");
                    let capacity = self.ctx.options.user.edge_log_capacity;
                    self.ctx.edge_log.set_capacity(capacity);
                }
                report.options_reloaded = changed;
            }
            Err(e) => {
                tracing::warn!("[Caretaker] Keeping previous options: {e}");
                report.options_error = Some(e);
            }
        }
    }

    /// Close the current store transaction and let every graph react to it.
    pub fn dispatch(&mut self) -> DispatchReport {
        let changes = self.ctx.wiki.take_changes();
        let mut report = DispatchReport {
            changes: changes.len(),
            ..Default::default()
        };
        if changes.is_empty() {
            return report;
        }
        if self.ctx.options.user.debug {
            tracing::debug!("[Caretaker] Dispatching {changes}");
        }
        if changes.contains(&self.ctx.options.paths.options) {
            self.reload_options(&mut report);
        }
        for (id, graph) in self.graphs.iter_mut() {
            match graph.refresh(&self.ctx, &changes) {
                Ok(decision) => {
                    report.decisions.insert(*id, decision);
                }
                Err(e) => {
                    tracing::warn!("[Caretaker] {id} failed to refresh: {e}");
                    if self.ctx.options.user.notifications && e.is_user_facing() {
                        report.notices.push(e.to_string());
                    }
                    report.errors.insert(*id, e);
                }
            }
        }
        report
    }

    /// Evict every graph whose renderer is detached. Returns the evicted ids.
    pub fn sweep(&mut self) -> Vec<GraphId> {
        let detached = self
            .graphs
            .iter()
            .filter(|(_, g)| !g.is_attached())
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        for id in detached.iter() {
            tracing::debug!("[Caretaker] {id} is detached, removing it");
            if let Err(e) = self.remove_graph(*id) {
                tracing::debug!("[Caretaker] Ignoring disposal error of {id}: {e}");
            }
        }
        detached
    }

    /// Run [`Caretaker::sweep`] if [`LIVENESS_SWEEP_INTERVAL`] passed since the last sweep.
    pub fn tick(&mut self, now: Instant) -> Vec<GraphId> {
        let due = self
            .last_sweep
            .map_or(true, |last| now.saturating_duration_since(last) >= LIVENESS_SWEEP_INTERVAL);
        if !due {
            return Vec::new();
        }
        self.last_sweep = Some(now);
        self.sweep()
    }
}
