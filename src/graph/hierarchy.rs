//! Level assignment for the hierarchical layout.
//!
//! Roots are nodes no edge points to. Starting from each root at [`ROOT_LEVEL`], a depth
//! first walk visits neighbours in edge order: following a hierarchy edge forwards goes one
//! level down, backwards one level up, and any other edge keeps the level. A node keeps the
//! first level it is given. Nodes only reachable through cycles keep no level.

use petgraph::{graphmap::DiGraphMap, Direction};
use std::collections::{BTreeMap, BTreeSet};

use crate::properties::{Edge, Node, NodeId};

pub const ROOT_LEVEL: i64 = 1000;

/// Levels for `nodes`, given `edges` between them. Edges with an endpoint outside `nodes`
/// are ignored.
pub fn compute_levels<'a, I>(
    nodes: I,
    edges: &'a [Edge],
    hierarchy_types: &BTreeSet<String>,
) -> BTreeMap<NodeId, i64>
where
    I: IntoIterator<Item = &'a str>,
{
    // Edge weights are indices into `edges`, so parallel edges survive and the walk can
    // restore the original edge order.
    let mut graph: DiGraphMap<&str, Vec<usize>> = DiGraphMap::new();
    for id in nodes {
        graph.add_node(id);
    }
    for (idx, edge) in edges.iter().enumerate() {
        let (from, to) = (edge.from.as_str(), edge.to.as_str());
        if !graph.contains_node(from) || !graph.contains_node(to) {
            continue;
        }
        match graph.edge_weight_mut(from, to) {
            Some(indices) => indices.push(idx),
            None => {
                graph.add_edge(from, to, vec![idx]);
            }
        }
    }

    let adjacent = |node: &'a str| -> Vec<usize> {
        let outgoing = graph
            .neighbors_directed(node, Direction::Outgoing)
            .filter_map(|other| graph.edge_weight(node, other));
        let incoming = graph
            .neighbors_directed(node, Direction::Incoming)
            .filter_map(|other| graph.edge_weight(other, node));
        let mut indices = outgoing.chain(incoming).flatten().copied().collect::<Vec<_>>();
        indices.sort_unstable();
        indices.dedup();
        indices
    };

    let roots = graph
        .nodes()
        .filter(|n| graph.neighbors_directed(*n, Direction::Incoming).next().is_none())
        .collect::<Vec<_>>();

    let mut levels: BTreeMap<&str, i64> = BTreeMap::new();
    for root in roots {
        if levels.contains_key(root) {
            continue;
        }
        levels.insert(root, ROOT_LEVEL);
        let mut stack = vec![(root, ROOT_LEVEL, adjacent(root), 0usize)];
        while let Some((node, level, indices, pos)) = stack.last_mut() {
            let Some(&idx) = indices.get(*pos) else {
                stack.pop();
                continue;
            };
            *pos += 1;
            let (node, level) = (*node, *level);
            let edge = &edges[idx];
            let (next, step) = if edge.from == node {
                (edge.to.as_str(), 1)
            } else {
                (edge.from.as_str(), -1)
            };
            if levels.contains_key(next) {
                continue;
            }
            let next_level = if hierarchy_types.contains(&edge.label) {
                level + step
            } else {
                level
            };
            levels.insert(next, next_level);
            stack.push((next, next_level, adjacent(next), 0));
        }
    }
    levels
        .into_iter()
        .map(|(id, level)| (id.to_string(), level))
        .collect()
}

/// Assign [`Node::level`] for every node reachable from a root.
pub fn set_hierarchy(
    nodes: &mut BTreeMap<NodeId, Node>,
    edges: &[Edge],
    hierarchy_types: &BTreeSet<String>,
) {
    let levels = compute_levels(nodes.keys().map(|k| k.as_str()), edges, hierarchy_types);
    tracing::debug!("[Hierarchy] Assigned {} of {} levels", levels.len(), nodes.len());
    for (id, node) in nodes.iter_mut() {
        node.level = levels.get(id).copied();
    }
}
