use std::sync::{Arc, RwLock};

use indexmap::IndexSet;

use super::color::{Highlight, PlotColors};
use super::index::VertexIndex;
use super::layout::PlotLayout;
use crate::model::{EdgeId, VertexId, read_model, write_model};

/// Everything one rebuild produced. Immutable once published; a later
/// trigger publishes a new snapshot instead of patching this one.
#[derive(Clone, Debug, Default)]
pub struct PlotSnapshot {
    pub revision: u64,
    pub vertices: Arc<IndexSet<VertexId>>,
    pub edges: Arc<IndexSet<EdgeId>>,
    pub layout: Arc<PlotLayout>,
    pub index: Arc<VertexIndex>,
    pub colors: Arc<PlotColors>,
    pub highlight: Option<Highlight>,
    pub x_label: String,
    pub y_label: String,
}

impl PlotSnapshot {
    pub fn point_count(&self) -> usize {
        self.vertices.len()
    }

    /// Spot plotted in `slot`.
    pub fn vertex_at(&self, slot: usize) -> Option<VertexId> {
        self.vertices.get_index(slot).copied()
    }

    pub fn slot_of(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.get_index_of(&vertex)
    }
}

/// Hand-off point between the plot actor and the renderer. The last
/// published snapshot wins.
#[derive(Clone, Debug, Default)]
pub struct SnapshotCell {
    latest: Arc<RwLock<Arc<PlotSnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: PlotSnapshot) -> Arc<PlotSnapshot> {
        let snapshot = Arc::new(snapshot);
        *write_model(&self.latest) = Arc::clone(&snapshot);
        snapshot
    }

    pub fn latest(&self) -> Arc<PlotSnapshot> {
        Arc::clone(&read_model(&self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_keep_the_snapshot_they_took() {
        let cell = SnapshotCell::new();
        let before = cell.latest();
        assert_eq!(before.revision, 0);

        let reader = cell.clone();
        cell.publish(PlotSnapshot {
            revision: 4,
            ..PlotSnapshot::default()
        });

        assert_eq!(before.revision, 0);
        assert_eq!(reader.latest().revision, 4);
    }
}
