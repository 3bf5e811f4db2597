use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use super::features::Units;
use super::graph::{ModelGraph, VertexId};
use crate::util::stable_pair;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tracking graph JSON")]
    Json(#[from] serde_json::Error),
    #[error("spot id {0} appears more than once")]
    DuplicateSpot(u64),
    #[error("link {index} references unknown spot {spot}")]
    UnknownSpot { index: usize, spot: u64 },
}

/// A graph plus the unit labels it was recorded in.
#[derive(Clone, Debug)]
pub struct TrackingData {
    pub graph: ModelGraph,
    pub units: Units,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGraph {
    #[serde(default)]
    space_units: Option<String>,
    #[serde(default)]
    time_units: Option<String>,
    spots: Vec<RawSpot>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawSpot {
    id: u64,
    t: i32,
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
    #[serde(default = "default_radius")]
    radius: f64,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    source: u64,
    target: u64,
}

fn default_radius() -> f64 {
    1.0
}

pub fn load_tracking_file(path: &Path) -> Result<TrackingData, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let data = parse_tracking_json(&raw)?;
    info!(
        "loaded {} spots and {} links from {}",
        data.graph.vertex_count(),
        data.graph.edge_count(),
        path.display()
    );
    Ok(data)
}

pub fn parse_tracking_json(raw: &str) -> Result<TrackingData, LoadError> {
    let parsed: RawGraph = serde_json::from_str(raw)?;

    let mut graph = ModelGraph::with_capacity(parsed.spots.len(), parsed.links.len());
    let mut by_id: HashMap<u64, VertexId> = HashMap::with_capacity(parsed.spots.len());
    for spot in parsed.spots {
        if by_id.contains_key(&spot.id) {
            return Err(LoadError::DuplicateSpot(spot.id));
        }
        let vertex = graph.add_vertex(spot.t, [spot.x, spot.y, spot.z], spot.radius);
        graph.set_label(vertex, spot.label.unwrap_or_else(|| spot.id.to_string()));
        by_id.insert(spot.id, vertex);
    }

    for (index, link) in parsed.links.into_iter().enumerate() {
        let resolve = |spot: u64| {
            by_id
                .get(&spot)
                .copied()
                .ok_or(LoadError::UnknownSpot { index, spot })
        };
        let source = resolve(link.source)?;
        let target = resolve(link.target)?;
        graph.add_edge(source, target);
    }

    let defaults = Units::default();
    Ok(TrackingData {
        graph,
        units: Units {
            space: parsed.space_units.unwrap_or(defaults.space),
            time: parsed.time_units.unwrap_or(defaults.time),
        },
    })
}

/// Synthetic lineages: `tracks` founder cells drifting over `frames`
/// timepoints, each dividing once around the middle of the movie.
pub fn demo_lineages(tracks: usize, frames: usize, units: Units) -> TrackingData {
    const STEP: f64 = 2.5;

    let frames = frames.max(1);
    let mut graph = ModelGraph::with_capacity(tracks * frames * 2, tracks * frames * 2);

    for track in 0..tracks {
        let (ox, oy) = stable_pair(("origin", track));
        let founder = graph.add_vertex(0, [ox * 200.0, oy * 200.0, 0.0], 4.0);
        graph.set_label(founder, format!("T{track}-0"));

        let (split, _) = stable_pair(("division", track));
        let division_frame = (frames as f64 * (0.5 + split * 0.2)) as usize;

        let mut tips = vec![founder];
        for frame in 1..frames {
            let mut next_tips = Vec::with_capacity(tips.len() * 2);
            for (branch, &tip) in tips.iter().enumerate() {
                let daughters = if frame == division_frame { 2 } else { 1 };
                for daughter in 0..daughters {
                    let (dx, dy) = stable_pair((track, frame, branch, daughter));
                    let parent = graph.spot(tip);
                    let position = [
                        parent.position[0] + dx * STEP,
                        parent.position[1] + dy * STEP,
                        parent.position[2],
                    ];
                    let radius = (parent.radius + dx * 0.2).clamp(2.0, 8.0);
                    let child = graph.add_vertex(frame as i32, position, radius);
                    graph.set_label(child, format!("T{track}.{branch}{daughter}-{frame}"));
                    graph.add_edge(tip, child);
                    next_tips.push(child);
                }
            }
            tips = next_tips;
        }
    }

    info!(
        "generated demo lineages: {} spots, {} links",
        graph.vertex_count(),
        graph.edge_count()
    );
    TrackingData { graph, units }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_lineage_has_one_division_per_track() {
        let data = demo_lineages(3, 10, Units::default());
        let graph = &data.graph;

        let divisions = graph
            .vertices()
            .filter(|&v| graph.outgoing_edges(v).len() == 2)
            .count();
        assert_eq!(divisions, 3);
        assert!(graph.vertices().all(|v| graph.incoming_edges(v).len() <= 1));
        assert_eq!(graph.edge_count(), graph.vertex_count() - 3);
    }

    #[test]
    fn units_default_when_absent() {
        let data = parse_tracking_json(r#"{ "spots": [{ "id": 1, "t": 0, "x": 1, "y": 2 }] }"#)
            .expect("valid graph");
        assert_eq!(data.units, Units::default());
        assert_eq!(data.graph.spot(VertexId(0)).label, "1");
        assert_eq!(data.graph.spot(VertexId(0)).radius, 1.0);
    }
}
