use super::graph::{ModelGraph, VertexId};

/// A timepoint-scoped neighborhood of the graph, typically what another view
/// currently shows.
pub trait Context: Send + Sync {
    fn timepoint(&self) -> i32;

    fn inside_vertices(&self, graph: &ModelGraph, timepoint: i32) -> Vec<VertexId>;
}

/// Spots within `window` frames of the context timepoint, optionally
/// restricted to an XY region.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewContext {
    pub timepoint: i32,
    pub window: i32,
    pub region: Option<Region>,
}

/// Axis-aligned XY box, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Region {
    pub fn contains(&self, position: &[f64; 3]) -> bool {
        (0..2).all(|d| position[d] >= self.min[d] && position[d] <= self.max[d])
    }
}

impl ViewContext {
    pub fn at(timepoint: i32) -> Self {
        Self {
            timepoint,
            window: 0,
            region: None,
        }
    }

    pub fn with_window(mut self, window: i32) -> Self {
        self.window = window.max(0);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }
}

impl Context for ViewContext {
    fn timepoint(&self) -> i32 {
        self.timepoint
    }

    fn inside_vertices(&self, graph: &ModelGraph, timepoint: i32) -> Vec<VertexId> {
        graph
            .vertices()
            .filter(|&v| {
                let spot = graph.spot(v);
                spot.timepoint.abs_diff(timepoint) <= self.window.unsigned_abs()
                    && self
                        .region
                        .as_ref()
                        .is_none_or(|region| region.contains(&spot.position))
            })
            .collect()
    }
}
