//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and one implementation per
//! [`RouteAlgorithm`]. New algorithms plug in here without changing
//! [`route`](super::route).

use crate::error::Result;
use crate::graph::{NodeId, RoadGraph};
use crate::search::{bidirectional, unidirectional, Heuristic, SearchLimits, SearchOutcome};
use crate::trace::StepTrace;

use super::RouteAlgorithm;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Search `graph` between two snapped nodes, optionally recording a trace.
    fn search(
        &self,
        graph: &RoadGraph,
        start: NodeId,
        goal: NodeId,
        limits: &SearchLimits,
        trace: Option<&mut StepTrace>,
    ) -> Result<SearchOutcome>;

    /// Whether the frontier is ordered with a distance estimate.
    fn uses_heuristic(&self) -> bool {
        false
    }
}

/// Dijkstra's algorithm planner.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn search(
        &self,
        graph: &RoadGraph,
        start: NodeId,
        goal: NodeId,
        limits: &SearchLimits,
        trace: Option<&mut StepTrace>,
    ) -> Result<SearchOutcome> {
        unidirectional(graph, start, goal, Heuristic::Zero, limits, trace)
    }
}

/// A* planner using great-circle distance to the goal as the heuristic.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn search(
        &self,
        graph: &RoadGraph,
        start: NodeId,
        goal: NodeId,
        limits: &SearchLimits,
        trace: Option<&mut StepTrace>,
    ) -> Result<SearchOutcome> {
        unidirectional(graph, start, goal, Heuristic::GreatCircle, limits, trace)
    }

    fn uses_heuristic(&self) -> bool {
        true
    }
}

/// Meet-in-the-middle planner, with or without a heuristic.
#[derive(Debug, Clone, Default)]
pub struct BidirectionalPlanner {
    heuristic: bool,
}

impl BidirectionalPlanner {
    /// Plain bidirectional Dijkstra.
    pub fn dijkstra() -> Self {
        Self { heuristic: false }
    }

    /// Bidirectional A*.
    pub fn a_star() -> Self {
        Self { heuristic: true }
    }
}

impl RoutePlanner for BidirectionalPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        if self.heuristic {
            RouteAlgorithm::BidirectionalAStar
        } else {
            RouteAlgorithm::Bidirectional
        }
    }

    fn search(
        &self,
        graph: &RoadGraph,
        start: NodeId,
        goal: NodeId,
        limits: &SearchLimits,
        trace: Option<&mut StepTrace>,
    ) -> Result<SearchOutcome> {
        let heuristic = if self.heuristic {
            Heuristic::GreatCircle
        } else {
            Heuristic::Zero
        };
        bidirectional(graph, start, goal, heuristic, limits, trace)
    }

    fn uses_heuristic(&self) -> bool {
        self.heuristic
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
        RouteAlgorithm::Bidirectional => Box::new(BidirectionalPlanner::dijkstra()),
        RouteAlgorithm::BidirectionalAStar => Box::new(BidirectionalPlanner::a_star()),
    }
}
