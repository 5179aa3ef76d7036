//! Generated graph topologies for demos and visual replay.
//!
//! Both builders take only a start and end coordinate:
//! - [`build_synthetic_graph`] interpolates waypoints on the straight line and
//!   connects every pair (complete graph).
//! - [`build_grid_graph`] lays a D×D lattice over the box spanned by the two
//!   points and links each cell to its up-to-8 neighbours.
//!
//! Edge weights are the haversine distance between endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::distance::DistanceUnit;
use crate::error::{Error, Result};
use crate::graph::{GraphDirection, NodeId, NodeKind, RoadGraph};

/// Default number of interior waypoints for the synthetic topology.
pub const DEFAULT_WAYPOINTS: usize = 9;

/// Default lattice side length for the grid topology.
pub const DEFAULT_GRID_DENSITY: usize = 10;

/// Default padding (degrees) added around a start/end pair when loading a region.
pub const DEFAULT_REGION_PADDING: f64 = 0.01;

/// Generated topology selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    Synthetic,
    #[default]
    Grid,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildMode::Synthetic => "synthetic",
            BuildMode::Grid => "grid",
        })
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "synthetic" => Ok(BuildMode::Synthetic),
            "grid" => Ok(BuildMode::Grid),
            other => Err(format!("unknown topology '{other}'")),
        }
    }
}

/// Options controlling generated and region-loaded graphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBuildOptions {
    /// Interior waypoints on the synthetic line.
    pub waypoints: usize,
    /// Lattice side length for the grid topology (at least 2).
    pub grid_density: usize,
    /// Unit for generated edge weights.
    pub unit: DistanceUnit,
    /// Degrees of padding around the endpoints when selecting a region.
    pub region_padding: f64,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            waypoints: DEFAULT_WAYPOINTS,
            grid_density: DEFAULT_GRID_DENSITY,
            unit: DistanceUnit::Kilometers,
            region_padding: DEFAULT_REGION_PADDING,
        }
    }
}

/// A generated graph together with the nodes placed on the endpoints.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: RoadGraph,
    pub start: NodeId,
    pub goal: NodeId,
}

/// Build a generated graph for the given endpoints.
pub fn build_graph(
    start: Coordinate,
    end: Coordinate,
    mode: BuildMode,
    options: &GraphBuildOptions,
) -> Result<BuiltGraph> {
    start.validate()?;
    end.validate()?;
    match mode {
        BuildMode::Synthetic => build_synthetic_graph(start, end, options),
        BuildMode::Grid => build_grid_graph(start, end, options),
    }
}

/// Straight-line waypoints between `start` and `end`, fully connected.
pub fn build_synthetic_graph(
    start: Coordinate,
    end: Coordinate,
    options: &GraphBuildOptions,
) -> Result<BuiltGraph> {
    let mut graph = RoadGraph::new(GraphDirection::Undirected).with_unit(options.unit);
    let start_id = graph.add_node(start, NodeKind::Start);
    let goal_id = graph.add_node(end, NodeKind::End);

    let segments = options.waypoints + 1;
    for step in 1..segments {
        let t = step as f64 / segments as f64;
        graph.add_node(start.lerp(&end, t), NodeKind::Waypoint);
    }

    let count = graph.len();
    for a in 0..count {
        for b in (a + 1)..count {
            graph.connect_by_distance(a, b)?;
        }
    }

    tracing::debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        "built synthetic graph"
    );

    Ok(BuiltGraph {
        graph,
        start: start_id,
        goal: goal_id,
    })
}

const GRID_DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// D×D lattice spanning `start` (node 0) to `end` (node D²−1).
pub fn build_grid_graph(
    start: Coordinate,
    end: Coordinate,
    options: &GraphBuildOptions,
) -> Result<BuiltGraph> {
    let density = options.grid_density;
    if density < 2 {
        return Err(Error::invalid_graph(format!(
            "grid density must be at least 2, got {density}"
        )));
    }

    let mut graph = RoadGraph::new(GraphDirection::Undirected).with_unit(options.unit);
    let last = density - 1;
    let lat_step = (end.lat - start.lat) / last as f64;
    let lng_step = (end.lng - start.lng) / last as f64;

    for row in 0..density {
        for col in 0..density {
            let kind = match (row, col) {
                (0, 0) => NodeKind::Start,
                (r, c) if r == last && c == last => NodeKind::End,
                _ => NodeKind::Intersection,
            };
            let coordinate = Coordinate {
                lat: start.lat + lat_step * row as f64,
                lng: start.lng + lng_step * col as f64,
            };
            graph.add_node(coordinate, kind);
        }
    }

    for row in 0..density {
        for col in 0..density {
            let current = row * density + col;
            for (dr, dc) in GRID_DIRECTIONS {
                let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
                else {
                    continue;
                };
                if r >= density || c >= density {
                    continue;
                }
                let neighbor = r * density + c;
                if neighbor > current {
                    graph.connect_by_distance(current, neighbor)?;
                }
            }
        }
    }

    tracing::debug!(
        density,
        nodes = graph.len(),
        edges = graph.edge_count(),
        "built grid graph"
    );

    Ok(BuiltGraph {
        graph,
        start: 0,
        goal: density * density - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(37.55, 126.97).unwrap(),
            Coordinate::new(37.60, 127.05).unwrap(),
        )
    }

    #[test]
    fn synthetic_graph_is_complete() {
        let (start, end) = endpoints();
        let built = build_synthetic_graph(start, end, &GraphBuildOptions::default()).unwrap();

        assert_eq!(built.graph.len(), 11);
        assert_eq!(built.graph.edge_count(), 11 * 10 / 2);
        assert_eq!(built.start, 0);
        assert_eq!(built.goal, 1);
        assert_eq!(built.graph.node(0).unwrap().kind, NodeKind::Start);
        assert_eq!(built.graph.node(1).unwrap().kind, NodeKind::End);
        assert!(built.graph.nodes()[2..]
            .iter()
            .all(|node| node.kind == NodeKind::Waypoint));
    }

    #[test]
    fn synthetic_waypoints_lie_between_the_endpoints() {
        let (start, end) = endpoints();
        let options = GraphBuildOptions {
            waypoints: 3,
            ..GraphBuildOptions::default()
        };
        let built = build_synthetic_graph(start, end, &options).unwrap();
        let midpoint = built.graph.coordinate(3).unwrap();
        assert!((midpoint.lat - 37.575).abs() < 1e-9);
        assert!((midpoint.lng - 127.01).abs() < 1e-9);
    }

    #[test]
    fn grid_graph_has_eight_neighbourhood() {
        let (start, end) = endpoints();
        let options = GraphBuildOptions {
            grid_density: 3,
            ..GraphBuildOptions::default()
        };
        let built = build_grid_graph(start, end, &options).unwrap();
        let graph = &built.graph;

        assert_eq!(graph.len(), 9);
        assert_eq!(built.start, 0);
        assert_eq!(built.goal, 8);
        // corners see 3 neighbours, edges 5, the centre 8
        assert_eq!(graph.node(0).unwrap().degree(), 3);
        assert_eq!(graph.node(1).unwrap().degree(), 5);
        assert_eq!(graph.node(4).unwrap().degree(), 8);
        // 12 orthogonal + 8 diagonal links
        assert_eq!(graph.edge_count(), 20);
        assert_eq!(graph.coordinate(8).unwrap(), end);
    }

    #[test]
    fn grid_density_below_two_is_rejected() {
        let (start, end) = endpoints();
        let options = GraphBuildOptions {
            grid_density: 1,
            ..GraphBuildOptions::default()
        };
        assert!(build_grid_graph(start, end, &options).is_err());
    }

    #[test]
    fn build_graph_validates_endpoints_first() {
        let start = Coordinate { lat: 95.0, lng: 0.0 };
        let end = Coordinate { lat: 0.0, lng: 0.0 };
        let error = build_graph(start, end, BuildMode::Grid, &GraphBuildOptions::default())
            .unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn build_mode_parses_case_insensitively() {
        assert_eq!("GRID".parse::<BuildMode>().unwrap(), BuildMode::Grid);
        assert_eq!(
            "synthetic".parse::<BuildMode>().unwrap(),
            BuildMode::Synthetic
        );
        assert!("osm".parse::<BuildMode>().is_err());
    }
}
