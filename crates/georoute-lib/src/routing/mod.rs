//! Route planning over a [`RoadGraph`].
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search strategies
//! - [`RouteRequest`] - Coordinates plus search options
//! - [`RoutePlan`] - Planned route result
//! - [`route`] - Main entry point for computing routes
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in its own [`RoutePlanner`]; [`route`] only
//! validates, snaps and dispatches.
//!
//! # Example
//!
//! ```ignore
//! use georoute_lib::{build_graph, route, BuildMode, Coordinate, GraphBuildOptions, RouteRequest};
//!
//! let start = Coordinate::new(37.5547, 126.9707)?;
//! let end = Coordinate::new(37.4979, 127.0276)?;
//! let built = build_graph(start, end, BuildMode::Grid, &GraphBuildOptions::default())?;
//! let plan = route(&built.graph, &RouteRequest::new(start, end))?;
//! println!("{:.2} km over {} hops", plan.total_cost(), plan.hop_count());
//! ```

mod planner;

pub use planner::{
    select_planner, AStarPlanner, BidirectionalPlanner, DijkstraPlanner, RoutePlanner,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::graph::{NodeId, RoadGraph};
use crate::locate::{snap_endpoints, EndpointPolicy};
use crate::path::RoutePath;
use crate::search::SearchLimits;
use crate::trace::StepTrace;

/// Supported search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm.
    Dijkstra,
    /// A* guided by great-circle distance.
    #[default]
    AStar,
    /// Meet-in-the-middle Dijkstra.
    Bidirectional,
    /// Meet-in-the-middle A*.
    BidirectionalAStar,
}

impl RouteAlgorithm {
    pub const ALL: [RouteAlgorithm; 4] = [
        RouteAlgorithm::Dijkstra,
        RouteAlgorithm::AStar,
        RouteAlgorithm::Bidirectional,
        RouteAlgorithm::BidirectionalAStar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::Bidirectional => "bidirectional",
            RouteAlgorithm::BidirectionalAStar => "bidirectional-a-star",
        }
    }
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        RouteAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == normalized)
            .or(match normalized.as_str() {
                "astar" => Some(RouteAlgorithm::AStar),
                _ => None,
            })
            .ok_or_else(|| format!("unknown algorithm '{s}'"))
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub goal: Coordinate,
    pub algorithm: RouteAlgorithm,
    /// Record a [`StepTrace`] while searching.
    pub with_trace: bool,
    pub endpoint_policy: EndpointPolicy,
    pub limits: SearchLimits,
}

impl RouteRequest {
    /// Request using the default algorithm, no trace and no limits.
    pub fn new(start: Coordinate, goal: Coordinate) -> Self {
        Self {
            start,
            goal,
            algorithm: RouteAlgorithm::default(),
            with_trace: false,
            endpoint_policy: EndpointPolicy::default(),
            limits: SearchLimits::default(),
        }
    }

    /// Convenience constructor for Dijkstra routes.
    pub fn dijkstra(start: Coordinate, goal: Coordinate) -> Self {
        Self::new(start, goal).with_algorithm(RouteAlgorithm::Dijkstra)
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.with_trace = enabled;
        self
    }

    pub fn with_endpoint_policy(mut self, policy: EndpointPolicy) -> Self {
        self.endpoint_policy = policy;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    /// Node the start coordinate snapped to.
    pub start: NodeId,
    /// Node the goal coordinate snapped to.
    pub goal: NodeId,
    pub path: RoutePath,
    /// Nodes finalised by the search.
    pub visited: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<StepTrace>,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.path.hop_count()
    }

    pub fn total_cost(&self) -> f64 {
        self.path.total_cost
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.path.coordinates
    }
}

/// Compute a route on `graph` for the coordinates in `request`.
///
/// 1. Validates both coordinates before touching the graph
/// 2. Rejects empty graphs
/// 3. Snaps the coordinates to nodes under the request's endpoint policy
/// 4. Runs the planner for the requested algorithm
pub fn route(graph: &RoadGraph, request: &RouteRequest) -> Result<RoutePlan> {
    request.start.validate()?;
    request.goal.validate()?;

    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let (start, goal) = snap_endpoints(
        graph,
        &request.start,
        &request.goal,
        request.endpoint_policy,
    )?;

    let planner = select_planner(request.algorithm);
    let mut trace = request.with_trace.then(StepTrace::new);
    let outcome = planner.search(graph, start, goal, &request.limits, trace.as_mut())?;

    tracing::info!(
        algorithm = %request.algorithm,
        start,
        goal,
        cost = outcome.path.total_cost,
        hops = outcome.path.hop_count(),
        visited = outcome.visited,
        "route computed"
    );

    Ok(RoutePlan {
        algorithm: request.algorithm,
        start,
        goal,
        path: outcome.path,
        visited: outcome.visited,
        meeting: outcome.meeting,
        trace,
    })
}
