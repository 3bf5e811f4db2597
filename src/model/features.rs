use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use super::graph::{EdgeId, ModelGraph, VertexId};
use crate::plot::{AxisProjection, FeatureSpecPair, FeatureTarget};

type ProjectionFn<I> = dyn Fn(&ModelGraph, I) -> f64 + Send + Sync;

/// A named scalar measurement over spots (`I = VertexId`) or links
/// (`I = EdgeId`).
pub struct Projection<I> {
    name: String,
    units: String,
    func: Arc<ProjectionFn<I>>,
}

impl<I> Clone for Projection<I> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            units: self.units.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<I> fmt::Debug for Projection<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("name", &self.name)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl<I> Projection<I> {
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        func: impl Fn(&ModelGraph, I) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn value(&self, graph: &ModelGraph, item: I) -> f64 {
        (self.func)(graph, item)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("no {target} feature named `{feature}`")]
    UnknownFeature {
        target: FeatureTarget,
        feature: String,
    },
    #[error("{target} feature `{feature}` has no projection `{projection}`")]
    UnknownProjection {
        target: FeatureTarget,
        feature: String,
        projection: String,
    },
}

/// Physical unit labels attached to the built-in features.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Units {
    pub space: String,
    pub time: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            space: "pixel".to_owned(),
            time: "frame".to_owned(),
        }
    }
}

/// Features grouped by name; each feature owns one or more projections.
#[derive(Clone, Debug, Default)]
pub struct FeatureRegistry {
    vertex: IndexMap<String, IndexMap<String, Projection<VertexId>>>,
    edge: IndexMap<String, IndexMap<String, Projection<EdgeId>>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the spot and link features every tracking graph has.
    pub fn with_defaults(units: &Units) -> Self {
        let mut registry = Self::new();
        let space = units.space.as_str();
        let time = units.time.as_str();

        for (axis, name) in ["X", "Y", "Z"].into_iter().enumerate() {
            registry.add_vertex_projection(
                "Spot position",
                Projection::new(name, space, move |graph, v| graph.spot(v).position[axis]),
            );
        }
        registry.add_vertex_projection(
            "Spot frame",
            Projection::new("Spot frame", "", |graph, v| {
                f64::from(graph.spot(v).timepoint)
            }),
        );
        registry.add_vertex_projection(
            "Spot radius",
            Projection::new("Spot radius", space, |graph, v| graph.spot(v).radius),
        );
        registry.add_vertex_projection(
            "Spot N links",
            Projection::new("Spot N links", "", |graph, v| {
                (graph.incoming_edges(v).len() + graph.outgoing_edges(v).len()) as f64
            }),
        );

        registry.add_edge_projection(
            "Link displacement",
            Projection::new("Link displacement", space, link_displacement),
        );
        registry.add_edge_projection(
            "Link velocity",
            Projection::new("Link velocity", format!("{space}/{time}"), |graph, e| {
                let dt = link_delta_t(graph, e).abs();
                if dt == 0.0 {
                    f64::NAN
                } else {
                    link_displacement(graph, e) / dt
                }
            }),
        );
        registry.add_edge_projection(
            "Link delta T",
            Projection::new("Link delta T", time, link_delta_t),
        );

        registry
    }

    pub fn add_vertex_projection(&mut self, feature: &str, projection: Projection<VertexId>) {
        self.vertex
            .entry(feature.to_owned())
            .or_default()
            .insert(projection.name().to_owned(), projection);
    }

    pub fn add_edge_projection(&mut self, feature: &str, projection: Projection<EdgeId>) {
        self.edge
            .entry(feature.to_owned())
            .or_default()
            .insert(projection.name().to_owned(), projection);
    }

    pub fn vertex_projection(
        &self,
        feature: &str,
        projection: &str,
    ) -> Result<&Projection<VertexId>, FeatureError> {
        lookup(&self.vertex, FeatureTarget::Vertex, feature, projection)
    }

    pub fn edge_projection(
        &self,
        feature: &str,
        projection: &str,
    ) -> Result<&Projection<EdgeId>, FeatureError> {
        lookup(&self.edge, FeatureTarget::Edge, feature, projection)
    }

    /// Binds a feature specification to the projection it names.
    pub fn resolve(&self, spec: &FeatureSpecPair) -> Result<AxisProjection, FeatureError> {
        match spec.target {
            FeatureTarget::Vertex => self
                .vertex_projection(&spec.feature, &spec.projection)
                .map(|projection| AxisProjection::Vertex(projection.clone())),
            FeatureTarget::Edge => self
                .edge_projection(&spec.feature, &spec.projection)
                .map(|projection| AxisProjection::Edge {
                    projection: projection.clone(),
                    incoming: spec.incoming,
                }),
        }
    }

    /// Every projection of the registry as a specification, spot features
    /// first. Link specifications default to the incoming direction.
    pub fn specs(&self) -> Vec<FeatureSpecPair> {
        let vertex = self.vertex.iter().flat_map(|(feature, projections)| {
            projections
                .keys()
                .map(|projection| FeatureSpecPair::vertex(feature, projection))
        });
        let edge = self.edge.iter().flat_map(|(feature, projections)| {
            projections
                .keys()
                .map(|projection| FeatureSpecPair::edge(feature, projection, true))
        });
        vertex.chain(edge).collect()
    }
}

fn lookup<'a, I>(
    features: &'a IndexMap<String, IndexMap<String, Projection<I>>>,
    target: FeatureTarget,
    feature: &str,
    projection: &str,
) -> Result<&'a Projection<I>, FeatureError> {
    let projections = features
        .get(feature)
        .ok_or_else(|| FeatureError::UnknownFeature {
            target,
            feature: feature.to_owned(),
        })?;
    projections
        .get(projection)
        .ok_or_else(|| FeatureError::UnknownProjection {
            target,
            feature: feature.to_owned(),
            projection: projection.to_owned(),
        })
}

fn link_displacement(graph: &ModelGraph, edge: EdgeId) -> f64 {
    let link = graph.link(edge);
    let source = graph.spot(link.source).position;
    let target = graph.spot(link.target).position;
    source
        .iter()
        .zip(target.iter())
        .map(|(s, t)| (t - s) * (t - s))
        .sum::<f64>()
        .sqrt()
}

fn link_delta_t(graph: &ModelGraph, edge: EdgeId) -> f64 {
    let link = graph.link(edge);
    f64::from(graph.spot(link.target).timepoint) - f64::from(graph.spot(link.source).timepoint)
}
