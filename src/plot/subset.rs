use indexmap::IndexSet;

use crate::model::{Context, EdgeId, ModelGraph, SelectionModel, VertexId};

/// Spots inside the context at its own timepoint, or every spot when there is
/// no context.
pub fn from_context(graph: &ModelGraph, context: Option<&dyn Context>) -> IndexSet<VertexId> {
    match context {
        Some(context) => context
            .inside_vertices(graph, context.timepoint())
            .into_iter()
            .filter(|&v| graph.contains_vertex(v))
            .collect(),
        None => graph.vertices().collect(),
    }
}

pub fn from_selection(selection: &SelectionModel) -> IndexSet<VertexId> {
    selection.selected_vertices().clone()
}

/// All spots connected, ignoring link direction, to a selected spot or to an
/// endpoint of a selected link.
pub fn track_of_selection(graph: &ModelGraph, selection: &SelectionModel) -> IndexSet<VertexId> {
    let mut seeds = selection.selected_vertices().clone();
    for &edge in selection.selected_edges() {
        let link = graph.link(edge);
        seeds.insert(link.source);
        seeds.insert(link.target);
    }
    connected_vertices(graph, seeds)
}

/// Undirected depth-first search from every seed not already reached. Each
/// spot is visited once, so the result is exactly the union of the connected
/// components that contain a seed, in discovery order.
pub fn connected_vertices(
    graph: &ModelGraph,
    seeds: impl IntoIterator<Item = VertexId>,
) -> IndexSet<VertexId> {
    let mut visited = IndexSet::new();
    let mut stack = Vec::new();

    for seed in seeds {
        if visited.contains(&seed) || !graph.contains_vertex(seed) {
            continue;
        }

        stack.push(seed);
        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex) {
                continue;
            }
            for edge in graph.edges_of(vertex) {
                let next = graph.opposite(edge, vertex);
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }
    }

    visited
}

/// Links with both endpoints in `vertices`, each listed once.
pub fn induced_edges(graph: &ModelGraph, vertices: &IndexSet<VertexId>) -> IndexSet<EdgeId> {
    let mut edges = IndexSet::new();
    for &vertex in vertices {
        for edge in graph.edges_of(vertex) {
            let link = graph.link(edge);
            if vertices.contains(&link.source) && vertices.contains(&link.target) {
                edges.insert(edge);
            }
        }
    }
    edges
}
