use std::fs;

use tempfile::TempDir;
use track_scatter::model::{LoadError, VertexId, load_tracking_file};

fn write_graph(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("graph.json");
    fs::write(&path, contents).expect("write graph file");
    path
}

#[test]
fn loads_spots_links_and_units() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_graph(
        &dir,
        r#"{
            "spaceUnits": "µm",
            "timeUnits": "min",
            "spots": [
                { "id": 10, "t": 0, "x": 1.0, "y": 2.0, "radius": 3.0, "label": "root" },
                { "id": 11, "t": 1, "x": 1.5, "y": 2.5, "z": 0.5 },
                { "id": 12, "t": 1, "x": 0.5, "y": 1.5 }
            ],
            "links": [
                { "source": 10, "target": 11 },
                { "source": 10, "target": 12 }
            ]
        }"#,
    );

    let data = load_tracking_file(&path).expect("valid graph");
    let graph = &data.graph;
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(data.units.space, "µm");
    assert_eq!(data.units.time, "min");

    let root = graph.spot(VertexId(0));
    assert_eq!(root.label, "root");
    assert_eq!(root.radius, 3.0);
    assert_eq!(graph.spot(VertexId(1)).position, [1.5, 2.5, 0.5]);
    assert_eq!(graph.spot(VertexId(2)).label, "12");
    assert_eq!(graph.outgoing_edges(VertexId(0)).len(), 2);
}

#[test]
fn link_to_unknown_spot_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_graph(
        &dir,
        r#"{
            "spots": [{ "id": 1, "t": 0, "x": 0, "y": 0 }],
            "links": [{ "source": 1, "target": 7 }]
        }"#,
    );

    match load_tracking_file(&path) {
        Err(LoadError::UnknownSpot { index, spot }) => {
            assert_eq!(index, 0);
            assert_eq!(spot, 7);
        }
        other => panic!("expected an unknown spot error, got {other:?}"),
    }
}

#[test]
fn duplicate_spot_ids_are_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_graph(
        &dir,
        r#"{
            "spots": [
                { "id": 4, "t": 0, "x": 0, "y": 0 },
                { "id": 4, "t": 1, "x": 1, "y": 1 }
            ]
        }"#,
    );

    assert!(matches!(
        load_tracking_file(&path),
        Err(LoadError::DuplicateSpot(4))
    ));
}

#[test]
fn malformed_json_and_missing_files_fail() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_graph(&dir, "{ \"spots\": [");
    assert!(matches!(load_tracking_file(&path), Err(LoadError::Json(_))));

    let missing = dir.path().join("missing.json");
    let error = load_tracking_file(&missing).expect_err("file does not exist");
    assert!(matches!(error, LoadError::Io { .. }));
    assert!(error.to_string().contains("missing.json"));
}
