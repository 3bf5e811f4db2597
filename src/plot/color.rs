use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::layout::PlotLayout;
use crate::model::{EdgeId, ModelGraph, Projection, SelectionModel, VertexId};

/// Straight (non-premultiplied) RGBA, each channel in `[0, 1]`.
pub type Rgba = [f32; 4];

/// Packed color a generator returns when it has no opinion.
pub const NO_COLOR: u32 = 0;

/// Source of per-item colors packed as `0xAARRGGBB`. Returning [`NO_COLOR`]
/// selects the style default.
pub trait ColorGenerator: Send + Sync {
    fn vertex_color(&self, graph: &ModelGraph, vertex: VertexId) -> u32;

    fn edge_color(&self, graph: &ModelGraph, edge: EdgeId, source: VertexId, target: VertexId)
    -> u32;
}

/// Leaves every item to the style colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoColorGenerator;

impl ColorGenerator for NoColorGenerator {
    fn vertex_color(&self, _graph: &ModelGraph, _vertex: VertexId) -> u32 {
        NO_COLOR
    }

    fn edge_color(
        &self,
        _graph: &ModelGraph,
        _edge: EdgeId,
        _source: VertexId,
        _target: VertexId,
    ) -> u32 {
        NO_COLOR
    }
}

/// Blue-to-red ramp over the range a spot projection takes on the graph.
/// Links take the color of their target spot.
#[derive(Clone, Debug)]
pub struct FeatureColorGenerator {
    projection: Projection<VertexId>,
    min: f64,
    max: f64,
}

impl FeatureColorGenerator {
    pub fn new(graph: &ModelGraph, projection: Projection<VertexId>) -> Self {
        let (min, max) = graph
            .vertices()
            .map(|vertex| projection.value(graph, vertex))
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            });
        Self {
            projection,
            min,
            max,
        }
    }

    pub fn projection(&self) -> &Projection<VertexId> {
        &self.projection
    }

    fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl ColorGenerator for FeatureColorGenerator {
    fn vertex_color(&self, graph: &ModelGraph, vertex: VertexId) -> u32 {
        let value = self.projection.value(graph, vertex);
        if !value.is_finite() {
            return NO_COLOR;
        }

        let t = self.normalize(value);
        let r = (55.0 + (190.0 * t)) as u8;
        let g = (150.0 - (70.0 * t)) as u8;
        let b = (215.0 - (155.0 * t)) as u8;
        pack_argb(255, r, g, b)
    }

    fn edge_color(
        &self,
        graph: &ModelGraph,
        _edge: EdgeId,
        _source: VertexId,
        target: VertexId,
    ) -> u32 {
        self.vertex_color(graph, target)
    }
}

pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

pub fn unpack_argb(packed: u32) -> Rgba {
    let channel = |shift: u32| ((packed >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), channel(24)]
}

fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    unpack_argb(pack_argb(255, r, g, b))
}

/// Default and override colors of the plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlotStyle {
    pub vertex: Rgba,
    pub selected_vertex: Rgba,
    pub edge: Rgba,
    pub selected_edge: Rgba,
    pub highlight_halo: Rgba,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            vertex: rgb(103, 170, 222),
            selected_vertex: rgb(245, 206, 93),
            edge: [72.0 / 255.0, 72.0 / 255.0, 72.0 / 255.0, 0.85],
            selected_edge: rgb(241, 146, 94),
            highlight_halo: [1.0, 1.0, 1.0, 0.55],
        }
    }
}

/// RGBA per spot and per link endpoint, aligned with [`PlotLayout`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotColors {
    pub vertices: Vec<f32>,
    pub edges: Vec<f32>,
}

impl PlotColors {
    pub fn vertex(&self, slot: usize) -> Option<Rgba> {
        let rgba = self.vertices.get(4 * slot..4 * slot + 4)?;
        Some([rgba[0], rgba[1], rgba[2], rgba[3]])
    }
}

/// The highlighted spot drawn on top of the cloud: a halo under a marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    pub vertex: VertexId,
    pub position: [f32; 2],
    pub color: Rgba,
    pub halo: Rgba,
}

pub fn vertex_color(
    graph: &ModelGraph,
    vertex: VertexId,
    generator: &dyn ColorGenerator,
    selection: &SelectionModel,
    style: &PlotStyle,
) -> Rgba {
    if selection.is_vertex_selected(vertex) {
        return style.selected_vertex;
    }
    match generator.vertex_color(graph, vertex) {
        NO_COLOR => style.vertex,
        packed => unpack_argb(packed),
    }
}

pub fn edge_color(
    graph: &ModelGraph,
    edge: EdgeId,
    generator: &dyn ColorGenerator,
    selection: &SelectionModel,
    style: &PlotStyle,
) -> Rgba {
    if selection.is_edge_selected(edge) {
        return style.selected_edge;
    }
    let link = graph.link(edge);
    match generator.edge_color(graph, edge, link.source, link.target) {
        NO_COLOR => style.edge,
        packed => unpack_argb(packed),
    }
}

pub fn compute_colors(
    graph: &ModelGraph,
    vertices: &IndexSet<VertexId>,
    edges: &IndexSet<EdgeId>,
    generator: &dyn ColorGenerator,
    selection: &SelectionModel,
    style: &PlotStyle,
) -> PlotColors {
    let mut colors = PlotColors {
        vertices: Vec::with_capacity(4 * vertices.len()),
        edges: Vec::with_capacity(8 * edges.len()),
    };

    for &vertex in vertices {
        colors
            .vertices
            .extend_from_slice(&vertex_color(graph, vertex, generator, selection, style));
    }

    for &edge in edges {
        let link = graph.link(edge);
        if !vertices.contains(&link.source) || !vertices.contains(&link.target) {
            continue;
        }
        let rgba = edge_color(graph, edge, generator, selection, style);
        colors.edges.extend_from_slice(&rgba);
        colors.edges.extend_from_slice(&rgba);
    }

    colors
}

/// Marker for `highlighted` if it is plotted at a finite position.
pub fn compute_highlight(
    highlighted: Option<VertexId>,
    vertices: &IndexSet<VertexId>,
    layout: &PlotLayout,
    colors: &PlotColors,
    style: &PlotStyle,
) -> Option<Highlight> {
    let vertex = highlighted?;
    let slot = vertices.get_index_of(&vertex)?;
    let position = layout.position(slot)?;
    if !position.iter().all(|c| c.is_finite()) {
        return None;
    }

    Some(Highlight {
        vertex,
        position,
        color: colors.vertex(slot).unwrap_or(style.vertex),
        halo: style.highlight_halo,
    })
}
