use indexmap::IndexSet;

use super::kdtree::{ConvexPolytope, KdTree, PointMap};
use crate::model::VertexId;

/// Spatial index over one projected point cloud.
///
/// Built from the spots of a subset and the layout positions in the same
/// order; the tree stores the spots themselves and reads their coordinates
/// through the subset's slot lookup.
#[derive(Clone, Debug, Default)]
pub struct VertexIndex {
    tree: KdTree<VertexId>,
}

impl VertexIndex {
    pub fn build(vertices: &IndexSet<VertexId>, positions: &[f32]) -> Self {
        let coordinate = |vertex: &VertexId, axis: usize| {
            vertices
                .get_index_of(vertex)
                .and_then(|slot| positions.get(2 * slot + axis))
                .map_or(f64::NAN, |&value| f64::from(value))
        };
        let map = PointMap::new()
            .with_axis(|vertex: &VertexId| coordinate(vertex, 0))
            .with_axis(|vertex: &VertexId| coordinate(vertex, 1));

        Self {
            tree: KdTree::build(vertices.iter().copied(), &map),
        }
    }

    /// Number of indexed spots, including the ones without a finite position.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Spots inside the closed rectangle spanned by two opposite corners, in
    /// either order.
    pub fn vertices_within(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> IndexSet<VertexId> {
        self.tree
            .clip(&ConvexPolytope::rectangle(x1, y1, x2, y2))
            .into_iter()
            .copied()
            .collect()
    }

    pub fn nearest(&self, x: f64, y: f64) -> Option<VertexId> {
        self.tree.nearest(&[x, y]).copied()
    }
}
