use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexSet;

use super::graph::{EdgeId, VertexId};

pub type SharedSelection = Arc<RwLock<SelectionModel>>;
pub type SharedHighlight = Arc<RwLock<HighlightModel>>;
pub type SharedFocus = Arc<RwLock<FocusModel>>;

/// Selected spots and links, in selection order.
///
/// `revision` is bumped on every effective change; consumers compare it
/// against the last revision they saw instead of registering listeners.
#[derive(Clone, Debug, Default)]
pub struct SelectionModel {
    vertices: IndexSet<VertexId>,
    edges: IndexSet<EdgeId>,
    revision: u64,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedSelection {
        Arc::new(RwLock::new(self))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected_vertices(&self) -> &IndexSet<VertexId> {
        &self.vertices
    }

    pub fn selected_edges(&self) -> &IndexSet<EdgeId> {
        &self.edges
    }

    pub fn is_vertex_selected(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    pub fn is_edge_selected(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    pub fn set_vertex_selected(&mut self, vertex: VertexId, selected: bool) -> bool {
        let changed = if selected {
            self.vertices.insert(vertex)
        } else {
            self.vertices.shift_remove(&vertex)
        };
        self.bump(changed)
    }

    pub fn set_edge_selected(&mut self, edge: EdgeId, selected: bool) -> bool {
        let changed = if selected {
            self.edges.insert(edge)
        } else {
            self.edges.shift_remove(&edge)
        };
        self.bump(changed)
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.vertices.clear();
        self.edges.clear();
        self.bump(changed)
    }

    fn bump(&mut self, changed: bool) -> bool {
        if changed {
            self.revision = self.revision.wrapping_add(1);
        }
        changed
    }
}

/// The single spot under the pointer, if any.
#[derive(Clone, Debug, Default)]
pub struct HighlightModel {
    vertex: Option<VertexId>,
    revision: u64,
}

impl HighlightModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedHighlight {
        Arc::new(RwLock::new(self))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn highlighted(&self) -> Option<VertexId> {
        self.vertex
    }

    pub fn highlight(&mut self, vertex: Option<VertexId>) -> bool {
        if self.vertex == vertex {
            return false;
        }
        self.vertex = vertex;
        self.revision = self.revision.wrapping_add(1);
        true
    }
}

/// The spot other views should center on.
#[derive(Clone, Debug, Default)]
pub struct FocusModel {
    vertex: Option<VertexId>,
}

impl FocusModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedFocus {
        Arc::new(RwLock::new(self))
    }

    pub fn focused(&self) -> Option<VertexId> {
        self.vertex
    }

    pub fn focus(&mut self, vertex: Option<VertexId>) {
        self.vertex = vertex;
    }
}

pub fn read_model<T>(model: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    model.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_model<T>(model: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    model.write().unwrap_or_else(PoisonError::into_inner)
}
