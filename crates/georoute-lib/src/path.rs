use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::graph::{NodeId, RoadGraph};
use crate::search::SearchState;

/// Node sequence from start to goal with its coordinates and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub nodes: Vec<NodeId>,
    pub coordinates: Vec<Coordinate>,
    pub total_cost: f64,
}

impl RoutePath {
    /// Zero-cost path that never leaves `node`.
    pub fn single(graph: &RoadGraph, node: NodeId) -> Result<Self> {
        Self::from_nodes(graph, vec![node], 0.0)
    }

    fn from_nodes(graph: &RoadGraph, nodes: Vec<NodeId>, total_cost: f64) -> Result<Self> {
        let coordinates = nodes
            .iter()
            .map(|&id| graph.coordinate(id).ok_or(Error::UnknownNode { id }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            nodes,
            coordinates,
            total_cost,
        })
    }

    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Per-edge breakdown of the path.
    pub fn segments(&self, graph: &RoadGraph) -> Vec<PathSegment> {
        self.nodes
            .windows(2)
            .zip(self.coordinates.windows(2))
            .map(|(ids, points)| {
                let distance = graph
                    .edge_weight(ids[0], ids[1])
                    .unwrap_or_else(|| graph.metric().distance(&points[0], &points[1]));
                let bearing = points[0].bearing_to(&points[1]);
                PathSegment {
                    from: ids[0],
                    to: ids[1],
                    distance,
                    bearing,
                    heading: Heading::from_bearing(bearing),
                }
            })
            .collect()
    }

    /// Coordinates including the shape points stored on traversed edges.
    pub fn expanded_geometry(&self, graph: &RoadGraph) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.coordinates.len());
        for (index, coordinate) in self.coordinates.iter().enumerate() {
            if index > 0 {
                if let Some(shape) = graph.edge_geometry(self.nodes[index - 1], self.nodes[index]) {
                    points.extend_from_slice(shape);
                }
            }
            points.push(*coordinate);
        }
        points
    }
}

/// Walk predecessors of `state` back from `target`.
pub fn reconstruct(graph: &RoadGraph, state: &SearchState, target: NodeId) -> Result<RoutePath> {
    let total_cost = state.distance(target);
    let nodes = state.chain_to(target);
    if !total_cost.is_finite() || nodes.is_empty() {
        return Err(Error::NoPath {
            start: nodes.first().copied().unwrap_or(target),
            goal: target,
        });
    }
    RoutePath::from_nodes(graph, nodes, total_cost)
}

/// Join a forward chain (start to `meeting`) with a backward chain (`meeting`
/// to goal). The meeting node appears once.
pub fn join(
    graph: &RoadGraph,
    forward: &SearchState,
    backward: &SearchState,
    meeting: NodeId,
) -> Result<RoutePath> {
    let head = forward.chain_to(meeting);
    let mut tail = backward.chain_to(meeting);
    let total_cost = forward.distance(meeting) + backward.distance(meeting);
    if head.is_empty() || tail.is_empty() || !total_cost.is_finite() {
        return Err(Error::NoPath {
            start: head.first().copied().unwrap_or(meeting),
            goal: tail.first().copied().unwrap_or(meeting),
        });
    }

    tail.reverse();
    let mut nodes = head;
    nodes.extend(tail.into_iter().skip(1));
    RoutePath::from_nodes(graph, nodes, total_cost)
}

/// One edge of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    /// Initial bearing in degrees.
    pub bearing: f64,
    pub heading: Heading,
}

/// Eight-point compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
}

impl Heading {
    const ALL: [Heading; 8] = [
        Heading::North,
        Heading::NorthEast,
        Heading::East,
        Heading::SouthEast,
        Heading::South,
        Heading::SouthWest,
        Heading::West,
        Heading::NorthWest,
    ];

    /// Nearest compass point; each covers 45° centred on its direction.
    pub fn from_bearing(bearing: f64) -> Self {
        let sector = ((bearing.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
        Self::ALL[sector]
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Heading::North => "N",
            Heading::NorthEast => "NE",
            Heading::East => "E",
            Heading::SouthEast => "SE",
            Heading::South => "S",
            Heading::SouthWest => "SW",
            Heading::West => "W",
            Heading::NorthWest => "NW",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
