use std::sync::Arc;

use indexmap::IndexSet;
use log::{debug, warn};

use super::color::{
    ColorGenerator, NoColorGenerator, PlotStyle, compute_colors, compute_highlight,
};
use super::config::{AxisProjection, FeatureSpecPair, GraphConfig, ItemSource, axis_label};
use super::index::VertexIndex;
use super::layout::compute_layout;
use super::snapshot::{PlotSnapshot, SnapshotCell};
use super::subset;
use crate::model::{
    Context, FeatureRegistry, SharedFocus, SharedGraph, SharedHighlight, SharedSelection, VertexId,
    read_model, write_model,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A new snapshot with this revision replaced the previous one.
    Published(u64),
    /// Nothing to plot; the previous snapshot is still current.
    Skipped,
}

/// The plot's layout and selection actor.
///
/// Every trigger (configuration, context, selection, highlight or style
/// change) runs one synchronous pass under the graph read lock and publishes
/// a complete [`PlotSnapshot`] through its [`SnapshotCell`].
pub struct PlotView {
    graph: SharedGraph,
    selection: SharedSelection,
    highlight: SharedHighlight,
    focus: SharedFocus,
    features: FeatureRegistry,
    context: Option<Arc<dyn Context>>,
    generator: Arc<dyn ColorGenerator>,
    style: PlotStyle,
    config: Option<GraphConfig>,
    snapshots: SnapshotCell,
    current: Arc<PlotSnapshot>,
    revision: u64,
}

impl PlotView {
    pub fn new(
        graph: SharedGraph,
        selection: SharedSelection,
        highlight: SharedHighlight,
        focus: SharedFocus,
        features: FeatureRegistry,
    ) -> Self {
        let snapshots = SnapshotCell::new();
        let current = snapshots.latest();
        Self {
            graph,
            selection,
            highlight,
            focus,
            features,
            context: None,
            generator: Arc::new(NoColorGenerator),
            style: PlotStyle::default(),
            config: None,
            snapshots,
            current,
            revision: 0,
        }
    }

    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color_generator(mut self, generator: Arc<dyn ColorGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_context(mut self, context: Arc<dyn Context>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Configuration of the last published layout.
    pub fn config(&self) -> Option<&GraphConfig> {
        self.config.as_ref()
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn selection(&self) -> &SharedSelection {
        &self.selection
    }

    pub fn highlight(&self) -> &SharedHighlight {
        &self.highlight
    }

    pub fn focus(&self) -> &SharedFocus {
        &self.focus
    }

    pub fn set_style(&mut self, style: PlotStyle) -> u64 {
        self.style = style;
        self.update_colors()
    }

    pub fn set_color_generator(&mut self, generator: Arc<dyn ColorGenerator>) -> u64 {
        self.generator = generator;
        self.update_colors()
    }

    /// Replaces the context and re-plots if the current subset follows it.
    pub fn set_context(&mut self, context: Option<Arc<dyn Context>>) -> RebuildOutcome {
        self.context = context;
        self.on_context_changed()
    }

    /// Runs the selector, the layout, the index and the colors for `config`.
    pub fn rebuild_layout(&mut self, config: &GraphConfig) -> RebuildOutcome {
        let x_axis = self.resolve_axis(config.x.as_ref());
        let y_axis = self.resolve_axis(config.y.as_ref());
        if x_axis.is_none() && y_axis.is_none() {
            debug!("no axis projection configured, keeping the current plot");
            return RebuildOutcome::Skipped;
        }

        let x_label = Self::label(config.x.as_ref(), x_axis.as_ref());
        let y_label = Self::label(config.y.as_ref(), y_axis.as_ref());

        let graph = read_model(&self.graph);
        let selection = read_model(&self.selection);

        let vertices = match config.item_source {
            ItemSource::Context => subset::from_context(&graph, self.context.as_deref()),
            ItemSource::Selection => subset::from_selection(&selection),
            ItemSource::TrackOfSelection => subset::track_of_selection(&graph, &selection),
            ItemSource::KeepCurrent => self
                .current
                .vertices
                .iter()
                .copied()
                .filter(|&vertex| graph.contains_vertex(vertex))
                .collect(),
        };
        let edges = if config.draw_connected {
            subset::induced_edges(&graph, &vertices)
        } else {
            IndexSet::new()
        };

        let layout = compute_layout(&graph, x_axis.as_ref(), y_axis.as_ref(), &vertices, &edges);
        let index = VertexIndex::build(&vertices, &layout.positions);
        let colors = compute_colors(
            &graph,
            &vertices,
            &edges,
            self.generator.as_ref(),
            &selection,
            &self.style,
        );
        let highlighted = read_model(&self.highlight).highlighted();
        let highlight = compute_highlight(highlighted, &vertices, &layout, &colors, &self.style);

        drop(selection);
        drop(graph);

        debug!(
            "plotted {} spots and {} links from {:?}",
            vertices.len(),
            edges.len(),
            config.item_source
        );

        self.config = Some(config.clone());

        let revision = self.publish(PlotSnapshot {
            revision: 0,
            vertices: Arc::new(vertices),
            edges: Arc::new(edges),
            layout: Arc::new(layout),
            index: Arc::new(index),
            colors: Arc::new(colors),
            highlight,
            x_label,
            y_label,
        });
        RebuildOutcome::Published(revision)
    }

    /// A context change re-plots from scratch, but only while the plotted
    /// subset was taken from the context.
    pub fn on_context_changed(&mut self) -> RebuildOutcome {
        match self.config.clone() {
            Some(config) if config.item_source == ItemSource::Context => {
                self.rebuild_layout(&config)
            }
            _ => RebuildOutcome::Skipped,
        }
    }

    /// Re-plots when the subset depends on the selection, otherwise only the
    /// colors change.
    pub fn on_selection_changed(&mut self) -> RebuildOutcome {
        match self.config.clone() {
            Some(config)
                if matches!(
                    config.item_source,
                    ItemSource::Selection | ItemSource::TrackOfSelection
                ) =>
            {
                self.rebuild_layout(&config)
            }
            _ => RebuildOutcome::Published(self.update_colors()),
        }
    }

    /// Recolors the current subset without touching its geometry.
    pub fn update_colors(&mut self) -> u64 {
        let current = Arc::clone(&self.current);

        let graph = read_model(&self.graph);
        let selection = read_model(&self.selection);
        let colors = compute_colors(
            &graph,
            &current.vertices,
            &current.edges,
            self.generator.as_ref(),
            &selection,
            &self.style,
        );
        let highlighted = read_model(&self.highlight).highlighted();
        drop(selection);
        drop(graph);

        let highlight = compute_highlight(
            highlighted,
            &current.vertices,
            &current.layout,
            &colors,
            &self.style,
        );

        self.publish(PlotSnapshot {
            colors: Arc::new(colors),
            highlight,
            ..PlotSnapshot::clone(&current)
        })
    }

    /// Recomputes the marker of the highlighted spot only.
    pub fn update_highlight(&mut self) -> u64 {
        let current = Arc::clone(&self.current);
        let highlighted = read_model(&self.highlight).highlighted();
        let highlight = compute_highlight(
            highlighted,
            &current.vertices,
            &current.layout,
            &current.colors,
            &self.style,
        );

        if highlight == current.highlight {
            return current.revision;
        }
        self.publish(PlotSnapshot {
            highlight,
            ..PlotSnapshot::clone(&current)
        })
    }

    /// Plotted spots inside the rectangle spanned by two opposite corners.
    pub fn vertices_within(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> IndexSet<VertexId> {
        debug_assert_eq!(
            self.current.index.len(),
            self.current.vertices.len(),
            "spatial index is stale"
        );
        self.current.index.vertices_within(x1, y1, x2, y2)
    }

    /// Selects the spots inside the rectangle together with the links
    /// between them, and focuses the first of them. Without `add` the
    /// previous selection is dropped first. Returns the number of spots.
    pub fn select_within(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, add: bool) -> usize {
        let inside = self.vertices_within(x1, y1, x2, y2);

        let changed = {
            let graph = read_model(&self.graph);
            let mut selection = write_model(&self.selection);
            let mut changed = !add && selection.clear();
            for &vertex in &inside {
                changed |= selection.set_vertex_selected(vertex, true);
                for &edge in graph.outgoing_edges(vertex) {
                    if inside.contains(&graph.target(edge)) {
                        changed |= selection.set_edge_selected(edge, true);
                    }
                }
            }
            changed
        };

        if let Some(&first) = inside.first() {
            write_model(&self.focus).focus(Some(first));
        }
        if changed {
            self.on_selection_changed();
        }
        inside.len()
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = write_model(&self.selection).clear();
        if changed {
            self.on_selection_changed();
        }
        changed
    }

    pub fn nearest_vertex(&self, x: f64, y: f64) -> Option<VertexId> {
        self.current.index.nearest(x, y)
    }

    pub fn snapshot(&self) -> Arc<PlotSnapshot> {
        Arc::clone(&self.current)
    }

    /// Renderer-side handle on the published snapshots.
    pub fn snapshots(&self) -> SnapshotCell {
        self.snapshots.clone()
    }

    pub fn x_label(&self) -> &str {
        &self.current.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.current.y_label
    }

    pub fn positions(&self) -> &[f32] {
        &self.current.layout.positions
    }

    pub fn edge_positions(&self) -> &[f32] {
        &self.current.layout.edge_positions
    }

    pub fn edge_indices(&self) -> &[u32] {
        &self.current.layout.edge_indices
    }

    pub fn vertex_colors(&self) -> &[f32] {
        &self.current.colors.vertices
    }

    pub fn edge_colors(&self) -> &[f32] {
        &self.current.colors.edges
    }

    fn resolve_axis(&self, spec: Option<&FeatureSpecPair>) -> Option<AxisProjection> {
        let spec = spec?;
        match self.features.resolve(spec) {
            Ok(axis) => Some(axis),
            Err(error) => {
                warn!("{error}; plotting the axis as undefined");
                None
            }
        }
    }

    fn label(spec: Option<&FeatureSpecPair>, axis: Option<&AxisProjection>) -> String {
        match (spec, axis) {
            (Some(spec), Some(axis)) => axis_label(spec, axis.units()),
            _ => String::new(),
        }
    }

    fn publish(&mut self, mut snapshot: PlotSnapshot) -> u64 {
        self.revision += 1;
        snapshot.revision = self.revision;
        self.current = self.snapshots.publish(snapshot);
        self.revision
    }
}
