//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
    rc::Rc,
};
use tempfile::TempDir;
use tmap_core::{
    caretaker::Caretaker,
    config::Options,
    graph::edge_key,
    properties::{Edge, Node},
    render::GraphRenderer,
    wiki::{Tiddler, Wiki},
};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// What the host would currently display.
#[derive(Debug, Default)]
pub struct Screen {
    pub nodes: BTreeMap<String, Node>,
    pub edges: BTreeMap<String, Edge>,
    pub resets: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenRenderer(pub Rc<RefCell<Screen>>);

#[allow(dead_code)]
impl ScreenRenderer {
    pub fn boxed(&self) -> Box<dyn GraphRenderer> {
        Box::new(self.clone())
    }

    pub fn node_ids(&self) -> BTreeSet<String> {
        self.0.borrow().nodes.keys().cloned().collect()
    }

    pub fn edge_labels(&self) -> BTreeSet<String> {
        self.0.borrow().edges.values().map(|e| e.label.clone()).collect()
    }

    pub fn resets(&self) -> usize {
        self.0.borrow().resets
    }
}

impl GraphRenderer for ScreenRenderer {
    fn on_nodes_added(&mut self, nodes: &[Node]) {
        let mut screen = self.0.borrow_mut();
        for node in nodes {
            screen.nodes.insert(node.id.clone(), node.clone());
        }
    }

    fn on_nodes_updated(&mut self, nodes: &[Node]) {
        self.on_nodes_added(nodes);
    }

    fn on_nodes_removed(&mut self, ids: &[String]) {
        let mut screen = self.0.borrow_mut();
        for id in ids {
            screen.nodes.remove(id);
        }
    }

    fn on_edges_added(&mut self, edges: &[Edge]) {
        let mut screen = self.0.borrow_mut();
        for edge in edges {
            screen.edges.insert(edge_key(edge), edge.clone());
        }
    }

    fn on_edges_updated(&mut self, edges: &[Edge]) {
        self.on_edges_added(edges);
    }

    fn on_edges_removed(&mut self, ids: &[String]) {
        let mut screen = self.0.borrow_mut();
        for id in ids {
            screen.edges.remove(id);
        }
    }

    fn on_context_reset(&mut self, _layout: tmap_core::render::Layout) {
        self.0.borrow_mut().resets += 1;
    }
}

/// Two `project` documents and a plain note.
#[allow(dead_code)]
pub fn project_wiki() -> Wiki {
    let mut wiki = Wiki::new();
    wiki.put(Tiddler::new("P1").with_tags(&["project"]));
    wiki.put(Tiddler::new("P2").with_tags(&["project"]));
    wiki.put(Tiddler::new("N1").with_field("caption", "Note one"));
    wiki
}

/// Caretaker over [`project_wiki`] with a `projects` view on `[tag[project]]`.
#[allow(dead_code)]
pub fn project_caretaker() -> Caretaker {
    init_logging();
    let mut caretaker = Caretaker::with_wiki(Options::default(), project_wiki()).unwrap();
    caretaker
        .create_view("projects", Some("[tag[project]]"))
        .unwrap();
    caretaker.dispatch();
    caretaker
}

/// Write an options file into `temp_dir` and return its path.
#[allow(dead_code)]
pub fn create_options_file(temp_dir: &TempDir, content: &str) -> PathBuf {
    let path = temp_dir.path().join("tmap.toml");
    std::fs::write(&path, content).unwrap();
    path
}
