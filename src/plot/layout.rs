use indexmap::IndexSet;

use super::config::AxisProjection;
use crate::model::{EdgeId, ModelGraph, VertexId};

/// Finite extent of a point cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl LayoutBounds {
    fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut bounds = Self {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        };

        for xy in positions.chunks_exact(2) {
            let (x, y) = (xy[0], xy[1]);
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
        }

        (bounds.min_x <= bounds.max_x).then_some(bounds)
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        ]
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Point cloud of one subset, in subset order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotLayout {
    /// Interleaved X, Y per spot.
    pub positions: Vec<f32>,
    /// Source X, Y then target X, Y per link.
    pub edge_positions: Vec<f32>,
    /// Line-segment indices into `edge_positions`, one pair per link.
    pub edge_indices: Vec<u32>,
    pub bounds: Option<LayoutBounds>,
}

impl PlotLayout {
    pub fn point_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn edge_count(&self) -> usize {
        self.edge_indices.len() / 2
    }

    pub fn position(&self, slot: usize) -> Option<[f32; 2]> {
        let x = *self.positions.get(2 * slot)?;
        let y = *self.positions.get(2 * slot + 1)?;
        Some([x, y])
    }
}

/// Projects every spot of `vertices` on the two axes. A missing axis yields
/// NaN for every spot so the slots stay aligned with the subset.
pub fn compute_layout(
    graph: &ModelGraph,
    x_axis: Option<&AxisProjection>,
    y_axis: Option<&AxisProjection>,
    vertices: &IndexSet<VertexId>,
    edges: &IndexSet<EdgeId>,
) -> PlotLayout {
    if vertices.is_empty() {
        return PlotLayout::default();
    }

    let coordinate = |axis: Option<&AxisProjection>, vertex: VertexId| {
        axis.map_or(f32::NAN, |axis| axis.value(graph, vertex) as f32)
    };

    let mut positions = Vec::with_capacity(2 * vertices.len());
    for &vertex in vertices {
        positions.push(coordinate(x_axis, vertex));
        positions.push(coordinate(y_axis, vertex));
    }

    let mut edge_positions = Vec::with_capacity(4 * edges.len());
    let mut edge_indices = Vec::with_capacity(2 * edges.len());
    for &edge in edges {
        let link = graph.link(edge);
        let (Some(source), Some(target)) = (
            vertices.get_index_of(&link.source),
            vertices.get_index_of(&link.target),
        ) else {
            continue;
        };

        let first = (edge_positions.len() / 2) as u32;
        edge_positions.extend_from_slice(&positions[2 * source..2 * source + 2]);
        edge_positions.extend_from_slice(&positions[2 * target..2 * target + 2]);
        edge_indices.push(first);
        edge_indices.push(first + 1);
    }

    let bounds = LayoutBounds::from_positions(&positions);
    PlotLayout {
        positions,
        edge_positions,
        edge_indices,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Projection;
    use crate::plot::subset::induced_edges;

    fn frame_axis() -> AxisProjection {
        AxisProjection::Vertex(Projection::new("frame", "", |graph: &ModelGraph, v| {
            f64::from(graph.spot(v).timepoint)
        }))
    }

    fn x_axis() -> AxisProjection {
        AxisProjection::Vertex(Projection::new("x", "", |graph: &ModelGraph, v| {
            graph.spot(v).position[0]
        }))
    }

    fn sample() -> (ModelGraph, IndexSet<VertexId>) {
        let mut graph = ModelGraph::new();
        let a = graph.add_vertex(0, [5.0, 0.0, 0.0], 1.0);
        let b = graph.add_vertex(1, [7.0, 0.0, 0.0], 1.0);
        let c = graph.add_vertex(2, [4.0, 0.0, 0.0], 1.0);
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        let vertices = [c, a, b].into_iter().collect();
        (graph, vertices)
    }

    #[test]
    fn positions_follow_subset_order() {
        let (graph, vertices) = sample();
        let layout = compute_layout(
            &graph,
            Some(&frame_axis()),
            Some(&x_axis()),
            &vertices,
            &IndexSet::new(),
        );

        assert_eq!(layout.positions, vec![2.0, 4.0, 0.0, 5.0, 1.0, 7.0]);
        assert!(layout.edge_positions.is_empty());
        assert_eq!(
            layout.bounds,
            Some(LayoutBounds {
                min_x: 0.0,
                max_x: 2.0,
                min_y: 4.0,
                max_y: 7.0,
            })
        );
    }

    #[test]
    fn edges_embed_endpoint_positions() {
        let (graph, vertices) = sample();
        let edges = induced_edges(&graph, &vertices);
        let layout = compute_layout(&graph, Some(&frame_axis()), Some(&x_axis()), &vertices, &edges);

        assert_eq!(layout.edge_count(), 2);
        assert_eq!(layout.edge_indices, vec![0, 1, 2, 3]);
        // Edges are discovered from `c` first: b -> c, then a -> b.
        assert_eq!(
            layout.edge_positions,
            vec![1.0, 7.0, 2.0, 4.0, 0.0, 5.0, 1.0, 7.0]
        );
    }

    #[test]
    fn missing_axis_is_nan_but_keeps_slots() {
        let (graph, vertices) = sample();
        let layout = compute_layout(&graph, Some(&frame_axis()), None, &vertices, &IndexSet::new());

        assert_eq!(layout.point_count(), 3);
        assert!(layout.positions.iter().skip(1).step_by(2).all(|y| y.is_nan()));
        assert_eq!(layout.bounds, None);
    }

    #[test]
    fn empty_subset_gives_empty_layout() {
        let (graph, _) = sample();
        let layout = compute_layout(
            &graph,
            Some(&frame_axis()),
            Some(&x_axis()),
            &IndexSet::new(),
            &IndexSet::new(),
        );
        assert_eq!(layout, PlotLayout::default());
    }
}
