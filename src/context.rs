//! Shared state handed to every component that touches the store.
//!
//! A [`Context`] bundles the options, the document store and the edge change log. It is
//! created once at startup (see [`crate::caretaker::Caretaker`]) and passed by reference, so
//! there is exactly one of each per process without any global state.

use std::collections::BTreeMap;

use crate::{
    config::Options,
    event::EdgeChangeLog,
    properties::{node_id_of, NodeId},
    wiki::{Tiddler, Wiki},
};

#[derive(Debug, Clone, Default)]
pub struct Context {
    pub options: Options,
    pub wiki: Wiki,
    pub edge_log: EdgeChangeLog,
}

impl Context {
    pub fn new(options: Options, wiki: Wiki) -> Context {
        let edge_log = EdgeChangeLog::with_capacity(options.user.edge_log_capacity);
        Context {
            options,
            wiki,
            edge_log,
        }
    }

    /// Map of node id to document title for every document in the store.
    pub fn node_index(&self) -> BTreeMap<NodeId, String> {
        self.wiki
            .tiddlers()
            .map(|t| (node_id_of(t, &self.options.user), t.title.clone()))
            .collect()
    }

    /// Document a node id refers to, if any.
    pub fn resolve_node(&self, id: &str) -> Option<&Tiddler> {
        if let Some(tiddler) = self.wiki.get(id) {
            if node_id_of(tiddler, &self.options.user) == id {
                return Some(tiddler);
            }
        }
        self.wiki
            .tiddlers()
            .find(|t| node_id_of(t, &self.options.user) == id)
    }
}
