//! Views: named, persisted bundles of a node filter, an edge namespace and display config.
//!
//! A view rooted at `R` is spread over a handful of documents:
//!
//! - `R` itself, marked with the `isview` field
//! - `R/filter/nodes`, whose text is the node filter expression
//! - `R/config`, whose text is a JSON object of [`ConfigValue`]s
//! - `R/map`, whose text is a JSON object of stored node positions
//! - `R/edges/...`, the view-local edge namespace
//!
//! [`View`] is a handle over these documents. Reads always go to the store; the handle only
//! keeps the state it saw at the last [`View::refresh`] so it can report what changed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::Options,
    error::TmapError,
    filter::{Filter, FilterMode, FilterRepr, Run, RunPrefix},
    properties::{Node, PositionMap},
    wiki::{parse_string_array, ChangeSet, Tiddler, Wiki},
};

pub const VIEW_MARKER_FIELD: &str = "isview";

pub const CONFIG_LAYOUT_ACTIVE: &str = "layout.active";
pub const CONFIG_DISPLAY_NEIGHBOURS: &str = "display_neighbours";
pub const CONFIG_PHYSICS_MODE: &str = "physics_mode";
pub const CONFIG_LOCAL_EDGES: &str = "local_edges";
pub const CONFIG_HIERARCHY_EDGE_TYPES: &str = "hierarchy_edge_types";

pub const LAYOUT_HIERARCHICAL: &str = "hierarchical";

/// Reported by [`View::refresh`] when the node filter document changed.
pub const MOD_NODE_FILTER: &str = "filter.nodes";
/// Reported by [`View::refresh`] when the view's root document disappeared.
pub const MOD_VIEW_REMOVED: &str = "view.removed";

/// Value of a flag when the view's config does not mention it.
pub fn config_flag_default(flag: &str) -> bool {
    match flag {
        CONFIG_DISPLAY_NEIGHBOURS => true,
        CONFIG_PHYSICS_MODE => false,
        CONFIG_LOCAL_EDGES => false,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Number(n) => Some(*n != 0.0),
            ConfigValue::Text(t) => match t.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

pub type ViewConfig = BTreeMap<String, ConfigValue>;

#[derive(Debug, Clone, Default, PartialEq)]
struct Seen {
    exists: bool,
    node_filter: String,
    config: ViewConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    label: String,
    root: String,
    shared_edges: String,
    seen: Seen,
}

impl View {
    /// Handle for the view called `label`, snapshotting its current state.
    pub fn open(wiki: &Wiki, options: &Options, label: &str) -> View {
        let mut view = View {
            label: label.to_string(),
            root: options.view_root(label),
            shared_edges: options.paths.edges.clone(),
            seen: Seen::default(),
        };
        view.seen = view.snapshot(wiki);
        view
    }

    /// Handle for the view stored at `root`, or `None` if `root` is not below the views path.
    pub fn open_root(wiki: &Wiki, options: &Options, root: &str) -> Option<View> {
        let label = root
            .strip_prefix(options.paths.views.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|label| !label.is_empty())?;
        Some(View::open(wiki, options, label))
    }

    /// Persist a new, empty view. `node_filter` defaults to the configured default filter.
    pub fn create(
        wiki: &mut Wiki,
        options: &Options,
        label: &str,
        node_filter: Option<&str>,
    ) -> Result<View, TmapError> {
        validate_label(label)?;
        let root = options.view_root(label);
        if wiki.exists(&root) {
            return Err(TmapError::Conflict(format!("view '{label}' already exists")));
        }
        let node_filter = node_filter.unwrap_or(options.user.default_node_filter.as_str());
        Filter::compile(node_filter)?;

        tracing::info!("[View] Creating view \"{label}\" at {root}");
        wiki.put(Tiddler::new(root.as_str()).with_field(VIEW_MARKER_FIELD, "true"));
        wiki.put_text(format!("{root}/filter/nodes"), node_filter);
        wiki.put_text(format!("{root}/config"), "{}");
        Ok(View::open(wiki, options, label))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_default(&self, options: &Options) -> bool {
        self.label == options.user.default_view
    }

    pub fn exists(&self, wiki: &Wiki) -> bool {
        wiki.exists(&self.root)
    }

    pub fn node_filter_ref(&self) -> String {
        format!("{}/filter/nodes", self.root)
    }

    pub fn config_ref(&self) -> String {
        format!("{}/config", self.root)
    }

    pub fn map_ref(&self) -> String {
        format!("{}/map", self.root)
    }

    pub fn local_edges_ref(&self) -> String {
        format!("{}/edges", self.root)
    }

    // ---- filters ----

    pub fn node_filter_expr(&self, wiki: &Wiki) -> String {
        wiki.text(&self.node_filter_ref())
            .unwrap_or_default()
            .to_string()
    }

    pub fn node_filter(&self, wiki: &Wiki) -> Result<Filter, TmapError> {
        Filter::compile(&self.node_filter_expr(wiki))
    }

    pub fn node_filter_repr(&self, wiki: &Wiki, mode: FilterMode) -> Result<FilterRepr, TmapError> {
        FilterRepr::of(&self.node_filter_expr(wiki), mode)
    }

    /// Namespaces whose edges this view displays: the shared one and its own.
    pub fn edge_namespaces(&self) -> [String; 2] {
        [self.shared_edges.clone(), self.local_edges_ref()]
    }

    pub fn edge_filter_expr(&self) -> String {
        self.edge_namespaces()
            .iter()
            .map(|ns| format!("[prefix[{ns}/]]"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn edge_filter(&self) -> Result<Filter, TmapError> {
        Filter::compile(&self.edge_filter_expr())
    }

    pub fn edge_filter_repr(&self, mode: FilterMode) -> Result<FilterRepr, TmapError> {
        FilterRepr::of(&self.edge_filter_expr(), mode)
    }

    /// Namespace new edges of this view are written to.
    pub fn edge_store_location(&self, wiki: &Wiki) -> String {
        if self.is_conf_enabled(wiki, CONFIG_LOCAL_EDGES) {
            self.local_edges_ref()
        } else {
            self.shared_edges.clone()
        }
    }

    pub fn set_node_filter(&self, wiki: &mut Wiki, expr: &str) -> Result<(), TmapError> {
        Filter::compile(expr)?;
        tracing::debug!("[View] {}: node filter set to {expr}", self.label);
        wiki.put_text(self.node_filter_ref(), expr);
        Ok(())
    }

    /// Make sure `node` is matched by the node filter. Returns `false` if it already was.
    pub fn add_node_to_view(&self, wiki: &mut Wiki, node: &Node) -> Result<bool, TmapError> {
        let filter = self.node_filter(wiki)?;
        if filter.matches(wiki, &node.tref) {
            return Ok(false);
        }
        let mut runs = filter
            .runs()
            .iter()
            .filter(|run| !(run.prefix == RunPrefix::Exclude && run.is_literal(&node.tref)))
            .cloned()
            .collect::<Vec<_>>();
        if !Filter::from_runs(runs.clone()).matches(wiki, &node.tref) {
            runs.push(Run::literal(RunPrefix::Union, node.tref.as_str()));
        }
        let rewritten = Filter::from_runs(runs);
        wiki.put_text(self.node_filter_ref(), rewritten.expr());
        Ok(true)
    }

    /// Drop the literal run naming `node` from the node filter. Fails without writing anything
    /// when the node would still be matched by a structural run.
    pub fn remove_node_from_filter(&self, wiki: &mut Wiki, node: &Node) -> Result<(), TmapError> {
        let filter = self.node_filter(wiki)?;
        if !filter.matches(wiki, &node.tref) {
            return Ok(());
        }
        let runs = filter
            .runs()
            .iter()
            .filter(|run| !(run.prefix == RunPrefix::Union && run.is_literal(&node.tref)))
            .cloned()
            .collect::<Vec<_>>();
        let rewritten = Filter::from_runs(runs);
        if rewritten.matches(wiki, &node.tref) {
            return Err(TmapError::FilterRewrite(format!(
                "'{}' is matched by '{}' beyond a literal entry",
                node.tref,
                filter.expr()
            )));
        }
        wiki.put_text(self.node_filter_ref(), rewritten.expr());
        Ok(())
    }

    // ---- config ----

    pub fn config(&self, wiki: &Wiki) -> ViewConfig {
        let Some(text) = wiki.text(&self.config_ref()) else {
            return ViewConfig::new();
        };
        if text.trim().is_empty() {
            return ViewConfig::new();
        }
        serde_json::from_str(text).unwrap_or_else(|e| {
            tracing::warn!("[View] {}: unreadable config, using defaults: {e}", self.label);
            ViewConfig::new()
        })
    }

    pub fn config_value(&self, wiki: &Wiki, key: &str) -> Option<ConfigValue> {
        self.config(wiki).remove(key)
    }

    /// Merge `partial` into the stored config.
    pub fn set_config(&self, wiki: &mut Wiki, partial: ViewConfig) -> Result<(), TmapError> {
        let mut config = self.config(wiki);
        config.extend(partial);
        wiki.put_text(self.config_ref(), serde_json::to_string_pretty(&config)?);
        Ok(())
    }

    pub fn is_conf_enabled(&self, wiki: &Wiki, flag: &str) -> bool {
        self.config_value(wiki, flag)
            .and_then(|v| v.as_bool())
            .unwrap_or_else(|| config_flag_default(flag))
    }

    pub fn is_hierarchical(&self, wiki: &Wiki) -> bool {
        self.config_value(wiki, CONFIG_LAYOUT_ACTIVE)
            .and_then(|v| v.as_str().map(|s| s == LAYOUT_HIERARCHICAL))
            .unwrap_or(false)
    }

    /// Edge labels that define parent/child order in the hierarchical layout.
    pub fn hierarchy_edge_types(&self, wiki: &Wiki) -> BTreeSet<String> {
        self.config_value(wiki, CONFIG_HIERARCHY_EDGE_TYPES)
            .and_then(|v| v.as_str().map(parse_string_array))
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    // ---- positions ----

    pub fn positions(&self, wiki: &Wiki) -> PositionMap {
        wiki.text(&self.map_ref())
            .filter(|text| !text.trim().is_empty())
            .and_then(|text| {
                serde_json::from_str(text)
                    .map_err(|e| tracing::warn!("[View] {}: unreadable position map: {e}", self.label))
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn store_positions(&self, wiki: &mut Wiki, positions: &PositionMap) -> Result<(), TmapError> {
        let mut stored = self.positions(wiki);
        stored.extend(positions.iter().map(|(id, pos)| (id.clone(), *pos)));
        wiki.put_text(self.map_ref(), serde_json::to_string(&stored)?);
        Ok(())
    }

    // ---- change tracking ----

    fn snapshot(&self, wiki: &Wiki) -> Seen {
        Seen {
            exists: self.exists(wiki),
            node_filter: self.node_filter_expr(wiki),
            config: self.config(wiki),
        }
    }

    /// What changed about this view in `changes`: config keys whose value differs, plus
    /// [`MOD_NODE_FILTER`] and [`MOD_VIEW_REMOVED`]. Empty when nothing relevant changed.
    pub fn refresh(&mut self, wiki: &Wiki, changes: &ChangeSet) -> Vec<String> {
        let touched = [self.root.clone(), self.node_filter_ref(), self.config_ref()]
            .iter()
            .any(|t| changes.contains(t));
        if !touched {
            return Vec::new();
        }
        let current = self.snapshot(wiki);
        let mut modified = Vec::new();
        if self.seen.exists && !current.exists {
            modified.push(MOD_VIEW_REMOVED.to_string());
        }
        if self.seen.node_filter != current.node_filter {
            modified.push(MOD_NODE_FILTER.to_string());
        }
        let keys = self
            .seen
            .config
            .keys()
            .chain(current.config.keys())
            .collect::<BTreeSet<_>>();
        for key in keys {
            if self.seen.config.get(key) != current.config.get(key) {
                modified.push(key.clone());
            }
        }
        self.seen = current;
        modified
    }

    // ---- lifecycle ----

    fn owned_titles(&self, wiki: &Wiki) -> Vec<String> {
        let children = format!("{}/", self.root);
        let mut titles = wiki
            .titles_with_prefix(&children)
            .map(|t| t.to_string())
            .collect::<Vec<_>>();
        if wiki.exists(&self.root) {
            titles.push(self.root.clone());
        }
        titles
    }

    /// Move the view and everything below it to `new_label`. Holders showing the view follow.
    pub fn rename(&mut self, wiki: &mut Wiki, options: &Options, new_label: &str) -> Result<(), TmapError> {
        if self.is_default(options) {
            return Err(TmapError::ProtectedView(self.label.clone()));
        }
        validate_label(new_label)?;
        let new_root = options.view_root(new_label);
        if wiki.exists(&new_root) {
            return Err(TmapError::Conflict(format!("view '{new_label}' already exists")));
        }
        if !self.exists(wiki) {
            return Err(TmapError::NotFound(format!("view '{}'", self.label)));
        }
        tracing::info!("[View] Renaming \"{}\" to \"{new_label}\"", self.label);
        for title in self.owned_titles(wiki) {
            if let Some(mut tiddler) = wiki.delete(&title) {
                tiddler.title = format!("{new_root}{}", &title[self.root.len()..]);
                wiki.put(tiddler);
            }
        }
        repoint_holders(wiki, options, &self.root, &new_root);
        self.label = new_label.to_string();
        self.root = new_root;
        Ok(())
    }

    /// Remove every document of the view, its edges included. Holders showing the view are
    /// pointed at the default view.
    pub fn destroy(&self, wiki: &mut Wiki, options: &Options) -> Result<(), TmapError> {
        if self.is_default(options) {
            return Err(TmapError::ProtectedView(self.label.clone()));
        }
        tracing::info!("[View] Destroying \"{}\"", self.label);
        for title in self.owned_titles(wiki) {
            wiki.delete(&title);
        }
        repoint_holders(wiki, options, &self.root, &options.default_view_root());
        Ok(())
    }
}

fn validate_label(label: &str) -> Result<(), TmapError> {
    if label.trim().is_empty() || label.contains('/') {
        return Err(TmapError::Custom(format!("invalid view label '{label}'")));
    }
    Ok(())
}

/// Rewrite every holder (global and bound) whose text is `from` to `to`.
fn repoint_holders(wiki: &mut Wiki, options: &Options, from: &str, to: &str) {
    let local = format!("{}/", options.paths.local_holders);
    let holders = std::iter::once(options.paths.default_view_holder.as_str())
        .chain(wiki.titles_with_prefix(&local))
        .filter(|holder| wiki.text(holder) == Some(from))
        .map(|holder| holder.to_string())
        .collect::<Vec<_>>();
    for holder in holders {
        tracing::debug!("[View] Holder {holder} now shows {to}");
        wiki.put_text(holder, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{NodeGroup, Position};
    use crate::wiki::ChangeInfo;
    use test_log::test;

    fn setup() -> (Wiki, Options, View) {
        let options = Options::default();
        let mut wiki = Wiki::new();
        wiki.put(Tiddler::new("P1").with_tags(&["project"]));
        wiki.put(Tiddler::new("N1"));
        let view = View::create(&mut wiki, &options, "work", Some("[tag[project]]")).unwrap();
        wiki.take_changes();
        (wiki, options, view)
    }

    fn node(title: &str) -> Node {
        Node {
            id: title.to_string(),
            label: title.to_string(),
            group: NodeGroup::Matches,
            tref: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_rejects_duplicates_and_bad_filters() {
        let (mut wiki, options, _view) = setup();
        assert!(matches!(
            View::create(&mut wiki, &options, "work", None),
            Err(TmapError::Conflict(_))
        ));
        assert!(matches!(
            View::create(&mut wiki, &options, "other", Some("[tag[x]")),
            Err(TmapError::FilterCompile { .. })
        ));
        assert!(!wiki.exists(&options.view_root("other")));
        assert!(View::create(&mut wiki, &options, "a/b", None).is_err());
    }

    #[test]
    fn test_filter_representations() {
        let (wiki, _options, view) = setup();
        assert_eq!(
            view.node_filter_repr(&wiki, FilterMode::Expression).unwrap(),
            FilterRepr::Expression("[tag[project]]".to_string())
        );
        let FilterRepr::Compiled(filter) = view.node_filter_repr(&wiki, FilterMode::Compiled).unwrap()
        else {
            panic!("expected a compiled filter");
        };
        assert_eq!(filter.select(&wiki), vec!["P1"]);

        let edges = view.edge_filter().unwrap();
        assert!(edges.matches(&wiki, "$:/plugins/felixhayashi/tiddlymap/graph/edges/x/1"));
        assert!(edges.matches(&wiki, &format!("{}/edges/x/1", view.root())));
        assert!(!edges.matches(&wiki, "P1"));
    }

    #[test]
    fn test_config_defaults_and_merge() {
        let (mut wiki, _options, view) = setup();
        assert!(view.is_conf_enabled(&wiki, CONFIG_DISPLAY_NEIGHBOURS));
        assert!(!view.is_conf_enabled(&wiki, CONFIG_PHYSICS_MODE));
        assert!(!view.is_hierarchical(&wiki));

        view.set_config(
            &mut wiki,
            ViewConfig::from([
                (CONFIG_DISPLAY_NEIGHBOURS.to_string(), false.into()),
                (CONFIG_LAYOUT_ACTIVE.to_string(), LAYOUT_HIERARCHICAL.into()),
            ]),
        )
        .unwrap();
        view.set_config(
            &mut wiki,
            ViewConfig::from([(CONFIG_HIERARCHY_EDGE_TYPES.to_string(), "parent [[is part of]]".into())]),
        )
        .unwrap();

        assert!(!view.is_conf_enabled(&wiki, CONFIG_DISPLAY_NEIGHBOURS));
        assert!(view.is_hierarchical(&wiki));
        assert_eq!(view.config(&wiki).len(), 3);
        assert_eq!(
            view.hierarchy_edge_types(&wiki),
            BTreeSet::from(["parent".to_string(), "is part of".to_string()])
        );
    }

    #[test]
    fn test_refresh_reports_changed_keys_once() {
        let (mut wiki, _options, mut view) = setup();
        let unrelated = ChangeSet::from_iter([("P1", ChangeInfo::Modified)]);
        assert!(view.refresh(&wiki, &unrelated).is_empty());

        view.set_config(&mut wiki, ViewConfig::from([(CONFIG_PHYSICS_MODE.to_string(), true.into())]))
            .unwrap();
        view.set_node_filter(&mut wiki, "[tag[other]]").unwrap();
        let changes = wiki.take_changes();
        let modified = view.refresh(&wiki, &changes);
        assert_eq!(modified, vec![MOD_NODE_FILTER.to_string(), CONFIG_PHYSICS_MODE.to_string()]);
        assert!(view.refresh(&wiki, &changes).is_empty());

        // Rewriting the same value is not a modification.
        view.set_config(&mut wiki, ViewConfig::from([(CONFIG_PHYSICS_MODE.to_string(), true.into())]))
            .unwrap();
        let changes = wiki.take_changes();
        assert!(view.refresh(&wiki, &changes).is_empty());
    }

    #[test]
    fn test_add_and_remove_literal_nodes() {
        let (mut wiki, _options, view) = setup();
        assert!(view.add_node_to_view(&mut wiki, &node("N1")).unwrap());
        assert_eq!(view.node_filter_expr(&wiki), "[tag[project]] [[N1]]");
        assert!(!view.add_node_to_view(&mut wiki, &node("P1")).unwrap());

        view.remove_node_from_filter(&mut wiki, &node("N1")).unwrap();
        assert_eq!(view.node_filter_expr(&wiki), "[tag[project]]");

        let err = view.remove_node_from_filter(&mut wiki, &node("P1")).unwrap_err();
        assert!(matches!(err, TmapError::FilterRewrite(_)));
        assert_eq!(view.node_filter_expr(&wiki), "[tag[project]]");
    }

    #[test]
    fn test_add_drops_literal_exclusion() {
        let (mut wiki, _options, view) = setup();
        view.set_node_filter(&mut wiki, "[all[tiddlers]] -[[N1]]").unwrap();
        assert!(view.add_node_to_view(&mut wiki, &node("N1")).unwrap());
        assert_eq!(view.node_filter_expr(&wiki), "[all[tiddlers]]");
    }

    #[test]
    fn test_positions_merge() {
        let (mut wiki, _options, view) = setup();
        view.store_positions(&mut wiki, &PositionMap::from([("P1".to_string(), Position { x: 1.0, y: 2.0 })]))
            .unwrap();
        view.store_positions(&mut wiki, &PositionMap::from([("N1".to_string(), Position { x: 3.0, y: 4.0 })]))
            .unwrap();
        let positions = view.positions(&wiki);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions["P1"], Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn test_rename_moves_documents_and_holders() {
        let (mut wiki, options, mut view) = setup();
        view.set_config(&mut wiki, ViewConfig::from([(CONFIG_PHYSICS_MODE.to_string(), true.into())]))
            .unwrap();
        let local_edge = format!("{}/edges/x/1", view.root());
        wiki.put_text(local_edge.as_str(), "");
        let holder = format!("{}/abc", options.paths.local_holders);
        wiki.put_text(holder.as_str(), view.root());
        let old_root = view.root().to_string();
        let edge_filter_before = view.edge_filter_expr().replace(&old_root, "");

        view.rename(&mut wiki, &options, "renamed").unwrap();

        assert_eq!(view.label(), "renamed");
        assert!(!wiki.exists(&old_root));
        assert!(!wiki.exists(&local_edge));
        assert!(wiki.exists(&format!("{}/edges/x/1", view.root())));
        assert_eq!(view.node_filter_expr(&wiki), "[tag[project]]");
        assert!(view.is_conf_enabled(&wiki, CONFIG_PHYSICS_MODE));
        assert_eq!(view.edge_filter_expr().replace(view.root(), ""), edge_filter_before);
        assert_eq!(wiki.text(&holder), Some(view.root()));
    }

    #[test]
    fn test_default_view_is_protected() {
        let options = Options::default();
        let mut wiki = Wiki::new();
        let mut view = View::create(&mut wiki, &options, "default", None).unwrap();
        wiki.take_changes();

        assert_eq!(
            view.rename(&mut wiki, &options, "x"),
            Err(TmapError::ProtectedView("default".to_string()))
        );
        assert_eq!(
            view.destroy(&mut wiki, &options),
            Err(TmapError::ProtectedView("default".to_string()))
        );
        assert!(view.exists(&wiki));
        assert!(wiki.take_changes().is_empty());
    }

    #[test]
    fn test_destroy_removes_everything() {
        let (mut wiki, options, view) = setup();
        wiki.put_text(format!("{}/edges/x/1", view.root()), "");
        wiki.put_text(options.paths.default_view_holder.as_str(), view.root());
        view.destroy(&mut wiki, &options).unwrap();
        let prefix = format!("{}/", view.root());
        assert_eq!(wiki.titles_with_prefix(&prefix).count(), 0);
        assert!(!view.exists(&wiki));
        assert_eq!(
            wiki.text(&options.paths.default_view_holder),
            Some(options.default_view_root().as_str())
        );
    }
}
