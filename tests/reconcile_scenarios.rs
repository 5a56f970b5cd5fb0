//! End-to-end reconciliation scenarios driven through the caretaker.

mod common;

use common::{project_caretaker, ScreenRenderer};
use std::collections::BTreeSet;
use test_log::test;
use tmap_core::{
    adapter::EndpointPolicy,
    graph::{GraphOptions, RebuildDecision, RebuildReason, ROOT_LEVEL},
    properties::Edge,
    view::{ViewConfig, CONFIG_HIERARCHY_EDGE_TYPES, CONFIG_LAYOUT_ACTIVE, LAYOUT_HIERARCHICAL},
    wiki::Tiddler,
    TmapError,
};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn bound_options(label: &str) -> GraphOptions {
    GraphOptions {
        view: Some(label.to_string()),
        ..Default::default()
    }
}

#[test]
fn deleting_a_project_shrinks_the_map() {
    let mut caretaker = project_caretaker();
    let view = caretaker.open_view("projects").unwrap();
    caretaker
        .context_mut()
        .insert_edge(Edge::new("P1", "P2", "blocks"), &view)
        .unwrap();
    caretaker
        .context_mut()
        .insert_edge(Edge::new("P2", "N1", "mentions"), &view)
        .unwrap();
    caretaker.dispatch();

    let screen = ScreenRenderer::default();
    let graph = caretaker
        .create_graph(bound_options("projects"), screen.boxed())
        .unwrap();
    assert_eq!(screen.node_ids(), set(&["P1", "P2", "N1"]));
    assert_eq!(screen.edge_labels(), set(&["blocks", "mentions"]));
    assert_eq!(screen.0.borrow().nodes["N1"].label, "Note one");

    caretaker.wiki_mut().delete("P2");
    let report = caretaker.dispatch();
    assert_eq!(
        report.decisions[&graph],
        RebuildDecision::Rebuild {
            reason: RebuildReason::NodeChanged("P2".to_string()),
            reset_context: false,
        }
    );
    assert_eq!(screen.node_ids(), set(&["P1"]));
    assert!(screen.edge_labels().is_empty());
}

#[test]
fn irrelevant_changes_leave_every_graph_alone() {
    let mut caretaker = project_caretaker();
    let screen = ScreenRenderer::default();
    let graph = caretaker
        .create_graph(bound_options("projects"), screen.boxed())
        .unwrap();
    caretaker.dispatch();
    let before = caretaker.graph(graph).unwrap().data().clone();

    caretaker
        .wiki_mut()
        .put(Tiddler::new("Shopping list").with_tags(&["errand"]));
    let report = caretaker.dispatch();
    assert_eq!(report.decisions[&graph], RebuildDecision::Skip);
    assert_eq!(caretaker.graph(graph).unwrap().data(), &before);
    assert_eq!(screen.resets(), 1);
}

#[test]
fn at_least_one_endpoint_is_a_superset_of_both() {
    let mut caretaker = project_caretaker();
    let view = caretaker.open_view("projects").unwrap();
    for (from, to) in [("P1", "P2"), ("P2", "N1"), ("N1", "P1"), ("N1", "N1")] {
        caretaker
            .context_mut()
            .insert_edge(Edge::new(from, to, "rel"), &view)
            .unwrap();
    }
    let ctx = caretaker.context();
    for nodes in [set(&["P1"]), set(&["P1", "P2"]), set(&["N1"]), set(&[])] {
        let both = ctx.select_edges_by_endpoints(&nodes, &view, "=2".parse::<EndpointPolicy>().unwrap());
        let one = ctx.select_edges_by_endpoints(&nodes, &view, ">=1".parse::<EndpointPolicy>().unwrap());
        assert!(both.iter().all(|e| one.contains(e)), "{nodes:?}");
    }
}

#[test]
fn edges_to_out_of_view_documents_are_accepted() {
    let mut caretaker = project_caretaker();
    let view = caretaker.open_view("projects").unwrap();
    let edge = caretaker
        .context_mut()
        .insert_edge(Edge::new("P1", "N1", "mentions"), &view)
        .unwrap();
    assert!(edge.id.is_some());

    let ctx = caretaker.context();
    let shown = set(&["P1", "P2"]);
    assert!(ctx
        .select_edges_by_endpoints(&shown, &view, EndpointPolicy::Both)
        .is_empty());
    assert_eq!(
        ctx.select_edges_by_endpoints(&shown, &view, EndpointPolicy::AtLeastOne),
        vec![edge]
    );

    let err = caretaker
        .context_mut()
        .insert_edge(Edge::new("P1", "Ghost", "mentions"), &view)
        .unwrap_err();
    assert!(matches!(err, TmapError::InvalidEdge(_)));
}

#[test]
fn hierarchy_levels_follow_hierarchy_edges_only() {
    let mut caretaker = project_caretaker();
    for title in ["A", "B", "C"] {
        caretaker.wiki_mut().put(Tiddler::new(title));
    }
    let view = caretaker
        .create_view("tree", Some("[[A]] [[B]] [[C]]"))
        .unwrap();
    view.set_config(
        caretaker.wiki_mut(),
        ViewConfig::from([
            (CONFIG_LAYOUT_ACTIVE.to_string(), LAYOUT_HIERARCHICAL.into()),
            (CONFIG_HIERARCHY_EDGE_TYPES.to_string(), "[[is parent of]]".into()),
        ]),
    )
    .unwrap();
    caretaker
        .context_mut()
        .insert_edge(Edge::new("A", "B", "is parent of"), &view)
        .unwrap();
    caretaker
        .context_mut()
        .insert_edge(Edge::new("B", "C", "relates to"), &view)
        .unwrap();
    caretaker.dispatch();

    let screen = ScreenRenderer::default();
    caretaker
        .create_graph(bound_options("tree"), screen.boxed())
        .unwrap();
    let screen = screen.0.borrow();
    assert_eq!(screen.nodes["A"].level, Some(ROOT_LEVEL));
    assert_eq!(screen.nodes["B"].level, Some(ROOT_LEVEL + 1));
    assert_eq!(screen.nodes["C"].level, Some(ROOT_LEVEL + 1));
}

#[test]
fn graphs_created_on_one_view_see_each_others_edges() {
    let mut caretaker = project_caretaker();
    let first = ScreenRenderer::default();
    let second = ScreenRenderer::default();
    caretaker
        .create_graph(bound_options("projects"), first.boxed())
        .unwrap();
    caretaker
        .create_graph(GraphOptions::default(), second.boxed())
        .unwrap();
    caretaker.dispatch();

    let view = caretaker.open_view("projects").unwrap();
    caretaker
        .context_mut()
        .insert_edge(Edge::new("P1", "P2", "blocks"), &view)
        .unwrap();
    let report = caretaker.dispatch();
    assert_eq!(report.rebuilt().count(), 2);
    assert_eq!(first.edge_labels(), set(&["blocks"]));
    // The default view shows the shared namespace as well.
    assert_eq!(second.edge_labels(), set(&["blocks"]));
}
