use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{EdgeId, ModelGraph, Projection, VertexId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureTarget {
    #[default]
    Vertex,
    Edge,
}

impl fmt::Display for FeatureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("spot"),
            Self::Edge => f.write_str("link"),
        }
    }
}

/// Names one projection of one feature. For link features, `incoming` picks
/// which of a spot's links supplies the value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSpecPair {
    #[serde(default)]
    pub target: FeatureTarget,
    pub feature: String,
    pub projection: String,
    #[serde(default)]
    pub incoming: bool,
}

impl FeatureSpecPair {
    pub fn vertex(feature: &str, projection: &str) -> Self {
        Self {
            target: FeatureTarget::Vertex,
            feature: feature.to_owned(),
            projection: projection.to_owned(),
            incoming: false,
        }
    }

    pub fn edge(feature: &str, projection: &str, incoming: bool) -> Self {
        Self {
            target: FeatureTarget::Edge,
            feature: feature.to_owned(),
            projection: projection.to_owned(),
            incoming,
        }
    }

    pub fn is_edge_feature(&self) -> bool {
        self.target == FeatureTarget::Edge
    }
}

impl fmt::Display for FeatureSpecPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.feature == self.projection {
            f.write_str(&self.projection)
        } else {
            write!(f, "{} {}", self.feature, self.projection)
        }
    }
}

/// Which spots take part in the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemSource {
    #[default]
    Context,
    Selection,
    TrackOfSelection,
    KeepCurrent,
}

impl ItemSource {
    pub const ALL: [Self; 4] = [
        Self::Context,
        Self::Selection,
        Self::TrackOfSelection,
        Self::KeepCurrent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Context => "Context",
            Self::Selection => "Selection",
            Self::TrackOfSelection => "Track of selection",
            Self::KeepCurrent => "Keep current",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    #[serde(default)]
    pub x: Option<FeatureSpecPair>,
    #[serde(default)]
    pub y: Option<FeatureSpecPair>,
    #[serde(default)]
    pub item_source: ItemSource,
    #[serde(default)]
    pub draw_connected: bool,
}

/// A resolved axis: either a spot projection or a link projection read
/// through one direction of a spot's links, never both.
#[derive(Clone, Debug)]
pub enum AxisProjection {
    Vertex(Projection<VertexId>),
    Edge {
        projection: Projection<EdgeId>,
        incoming: bool,
    },
}

impl AxisProjection {
    /// Coordinate of `vertex` on this axis. Link projections are only defined
    /// when the spot has exactly one link in the configured direction; NaN
    /// otherwise.
    pub fn value(&self, graph: &ModelGraph, vertex: VertexId) -> f64 {
        match self {
            Self::Vertex(projection) => projection.value(graph, vertex),
            Self::Edge {
                projection,
                incoming,
            } => {
                let edges = if *incoming {
                    graph.incoming_edges(vertex)
                } else {
                    graph.outgoing_edges(vertex)
                };
                match edges {
                    [edge] => projection.value(graph, *edge),
                    _ => f64::NAN,
                }
            }
        }
    }

    pub fn units(&self) -> &str {
        match self {
            Self::Vertex(projection) => projection.units(),
            Self::Edge { projection, .. } => projection.units(),
        }
    }
}

/// On-screen axis annotation, e.g. `Spot position X (µm)`.
pub fn axis_label(spec: &FeatureSpecPair, units: &str) -> String {
    if units.is_empty() {
        spec.to_string()
    } else {
        format!("{spec} ({units})")
    }
}
