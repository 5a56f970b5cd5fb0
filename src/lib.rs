//! # tmap-core
//!
//! View management and incremental graph reconciliation for wiki graph maps.
//!
//! ## Overview
//!
//! A graph map shows documents of a wiki ("tiddlers") as nodes and typed relationships between
//! them as edges. Which documents and edges a map shows is decided by a *view*: a named,
//! persisted bundle of a node filter, an edge namespace and display settings. tmap-core keeps
//! every rendered graph consistent with the document store: for each store transaction it
//! decides whether a graph must be rebuilt and hands the minimal delta to a renderer.
//!
//! ## Architecture
//!
//! - **[`wiki`]**: In-memory document store recording a [`wiki::ChangeSet`] per transaction
//! - **[`filter`]**: Filter expressions selecting documents (`[tag[project]] [[Title]]`)
//! - **[`properties`]**: [`properties::Node`], [`properties::Edge`] and their identifiers
//! - **[`event`]**: Bounded edge change log with per-consumer cursors
//! - **[`view`]**: View lifecycle, filters, config and refresh diffing
//! - **[`adapter`]**: Edge store and node selection on [`context::Context`]
//! - **[`graph`]**: Snapshots, hierarchy levels and the per-instance reconciler
//! - **[`callback`]**: Title-keyed listeners fired on change
//! - **[`render`]**: The [`render::GraphRenderer`] trait a host implements
//! - **[`caretaker`]**: Owner of the context and all graphs; dispatch and liveness sweep
//!
//! ## Quick Start
//!
//! ```rust
//! use tmap_core::{
//!     caretaker::Caretaker, config::Options, graph::GraphOptions, properties::Edge,
//!     render::NullRenderer, wiki::Tiddler,
//! };
//!
//! # fn main() -> Result<(), tmap_core::TmapError> {
//! let mut caretaker = Caretaker::new(Options::default())?;
//! caretaker.wiki_mut().put(Tiddler::new("Alpha").with_tags(&["project"]));
//! caretaker.wiki_mut().put(Tiddler::new("Beta").with_tags(&["project"]));
//! let view = caretaker.create_view("projects", Some("[tag[project]]"))?;
//! caretaker.dispatch();
//!
//! let graph = caretaker.create_graph(
//!     GraphOptions { view: Some("projects".to_string()), ..Default::default() },
//!     Box::new(NullRenderer),
//! )?;
//! caretaker.context_mut().insert_edge(Edge::new("Alpha", "Beta", "blocks"), &view)?;
//! let report = caretaker.dispatch();
//! assert!(report.decisions[&graph].is_rebuild());
//! assert_eq!(caretaker.graph(graph).map(|g| g.data().edges().len()), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod callback;
pub mod caretaker;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod filter;
pub mod graph;
pub mod properties;
pub mod render;
pub mod view;
pub mod wiki;

#[cfg(test)]
mod tests;

pub use error::*;
