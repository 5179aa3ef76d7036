//! Common test utilities and graph fixtures.
//!
//! Each integration test file pulls in what it needs; unused helpers are
//! expected per file.

use std::fs;
use std::path::PathBuf;

use georoute_lib::{Coordinate, GraphDirection, NodeId, NodeKind, RoadGraph};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid coordinate")
}

/// A–B–C line with weights 2 and 3.
#[allow(dead_code)]
pub fn line_graph() -> RoadGraph {
    let mut graph = RoadGraph::new(GraphDirection::Undirected);
    let a = graph.add_node(coord(0.0, 0.0), NodeKind::Start);
    let b = graph.add_node(coord(0.0, 0.001), NodeKind::Waypoint);
    let c = graph.add_node(coord(0.0, 0.002), NodeKind::End);
    graph.connect(a, b, 2.0).expect("edge a-b");
    graph.connect(b, c, 3.0).expect("edge b-c");
    graph
}

/// `size`×`size` lattice with 8-neighbour edges of weight 1.
///
/// Nodes are 0.001° apart so the great-circle heuristic (in km) stays far
/// below the unit edge weights.
#[allow(dead_code)]
pub fn unit_grid(size: usize) -> RoadGraph {
    let mut graph = RoadGraph::new(GraphDirection::Undirected);
    for row in 0..size {
        for col in 0..size {
            graph.add_node(
                coord(row as f64 * 0.001, col as f64 * 0.001),
                NodeKind::Intersection,
            );
        }
    }
    for row in 0..size {
        for col in 0..size {
            let id = row * size + col;
            for (dr, dc) in [(0, 1), (1, -1), (1, 0), (1, 1)] {
                let r = row as isize + dr;
                let c = col as isize + dc;
                if r < 0 || c < 0 || r as usize >= size || c as usize >= size {
                    continue;
                }
                graph
                    .connect(id, r as usize * size + c as usize, 1.0)
                    .expect("grid edge");
            }
        }
    }
    graph
}

/// Two 2-node islands with no edge between them.
#[allow(dead_code)]
pub fn disconnected_graph() -> RoadGraph {
    let mut graph = RoadGraph::new(GraphDirection::Undirected);
    let a = graph.add_node(coord(0.0, 0.0), NodeKind::Intersection);
    let b = graph.add_node(coord(0.0, 0.01), NodeKind::Intersection);
    let c = graph.add_node(coord(1.0, 1.0), NodeKind::Intersection);
    let d = graph.add_node(coord(1.0, 1.01), NodeKind::Intersection);
    graph.connect_by_distance(a, b).expect("edge a-b");
    graph.connect_by_distance(c, d).expect("edge c-d");
    graph
}

/// Sum of graph edge weights along `nodes`.
#[allow(dead_code)]
pub fn path_weight(graph: &RoadGraph, nodes: &[NodeId]) -> f64 {
    nodes
        .windows(2)
        .map(|pair| {
            graph
                .edge_weight(pair[0], pair[1])
                .unwrap_or_else(|| panic!("nodes {} and {} are not connected", pair[0], pair[1]))
        })
        .sum()
}

/// Write `contents` to a JSON file inside a fresh temporary directory.
#[allow(dead_code)]
pub fn write_graph_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("graph.json");
    fs::write(&path, contents).expect("write graph file");
    (dir, path)
}
