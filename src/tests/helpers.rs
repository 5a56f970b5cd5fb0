//! Shared test utilities for graph and caretaker tests

use crate::{
    config::Options,
    context::Context,
    error::TmapError,
    graph::edge_key,
    properties::{Edge, Node},
    render::{GraphRenderer, Layout},
    view::View,
    wiki::{Tiddler, Wiki},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Everything a [`RecordingRenderer`] was told, replayed into a current picture.
#[derive(Debug, Default)]
pub struct RenderLog {
    pub nodes: BTreeMap<String, Node>,
    pub edges: BTreeMap<String, Edge>,
    pub resets: Vec<Layout>,
    pub calls: usize,
    pub disposed: bool,
}

/// Renderer whose state stays inspectable after it was boxed into a graph.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub log: Rc<RefCell<RenderLog>>,
    pub detached: Rc<Cell<bool>>,
    pub fail_dispose: bool,
}

impl RecordingRenderer {
    pub fn boxed(&self) -> Box<dyn GraphRenderer> {
        Box::new(self.clone())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.log.borrow().nodes.keys().cloned().collect()
    }

    pub fn edge_count(&self) -> usize {
        self.log.borrow().edges.len()
    }

    pub fn calls(&self) -> usize {
        self.log.borrow().calls
    }
}

impl GraphRenderer for RecordingRenderer {
    fn on_nodes_added(&mut self, nodes: &[Node]) {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        for node in nodes {
            log.nodes.insert(node.id.clone(), node.clone());
        }
    }

    fn on_nodes_updated(&mut self, nodes: &[Node]) {
        self.on_nodes_added(nodes);
    }

    fn on_nodes_removed(&mut self, ids: &[String]) {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        for id in ids {
            log.nodes.remove(id);
        }
    }

    fn on_edges_added(&mut self, edges: &[Edge]) {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        for edge in edges {
            log.edges.insert(edge_key(edge), edge.clone());
        }
    }

    fn on_edges_updated(&mut self, edges: &[Edge]) {
        self.on_edges_added(edges);
    }

    fn on_edges_removed(&mut self, ids: &[String]) {
        let mut log = self.log.borrow_mut();
        log.calls += 1;
        for id in ids {
            log.edges.remove(id);
        }
    }

    fn on_context_reset(&mut self, layout: Layout) {
        self.log.borrow_mut().resets.push(layout);
    }

    fn is_attached(&self) -> bool {
        !self.detached.get()
    }

    fn dispose(&mut self) -> Result<(), TmapError> {
        self.log.borrow_mut().disposed = true;
        if self.fail_dispose {
            return Err(TmapError::Custom("renderer already gone".to_string()));
        }
        Ok(())
    }
}

/// Store with two `project` documents and one plain note.
pub fn project_wiki() -> Wiki {
    let mut wiki = Wiki::new();
    wiki.put(Tiddler::new("P1").with_tags(&["project"]));
    wiki.put(Tiddler::new("P2").with_tags(&["project"]));
    wiki.put(Tiddler::new("N1").with_text("a note"));
    wiki
}

/// Context over [`project_wiki`] with the default view and a `projects` view filtering on the
/// `project` tag. Pending changes are cleared.
pub fn project_context() -> (Context, View) {
    init_logging();
    let options = Options::default();
    let mut wiki = project_wiki();
    View::create(&mut wiki, &options, &options.user.default_view, None).ok();
    let view = View::create(&mut wiki, &options, "projects", Some("[tag[project]]"))
        .expect("fresh store");
    wiki.take_changes();
    (Context::new(options, wiki), view)
}

/// Point the global holder at `view` without recording the change.
pub fn show_globally(ctx: &mut Context, view: &View) {
    let holder = ctx.options.paths.default_view_holder.clone();
    ctx.wiki.put_text(holder, view.root());
    ctx.wiki.take_changes();
}
