//! Shortest-path search engine.
//!
//! One engine, parameterised by a [`Heuristic`] (zero for Dijkstra, the graph
//! metric for A*) and an optional [`StepTrace`](crate::trace::StepTrace) sink:
//! - [`unidirectional`] expands from the start until the goal is finalised.
//! - [`bidirectional`] alternates a forward and a backward search and joins
//!   them at the best meeting node.
//!
//! Every run allocates its own [`SearchState`]; graphs are only read.

mod bidirectional;
mod unidirectional;

pub use bidirectional::bidirectional;
pub use unidirectional::unidirectional;

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{NodeId, RoadGraph};
use crate::path::RoutePath;

/// Which end of the route a search side grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchDirection::Forward => "forward",
            SearchDirection::Backward => "backward",
        })
    }
}

/// Remaining-cost estimate used to order the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Plain Dijkstra ordering.
    #[default]
    Zero,
    /// Great-circle distance in the graph unit. Admissible as long as no edge
    /// is shorter than the straight line between its endpoints.
    GreatCircle,
}

impl Heuristic {
    pub fn estimate(self, graph: &RoadGraph, from: NodeId, to: NodeId) -> f64 {
        match self {
            Heuristic::Zero => 0.0,
            Heuristic::GreatCircle => graph.distance_between(from, to).unwrap_or(0.0),
        }
    }
}

/// Derived classification of a node within one search side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// No tentative distance yet.
    Unseen,
    /// Discovered with a finite tentative distance but not finalised.
    Seen,
    /// Finalised; its distance will not change.
    Visited,
}

/// Per-run bookkeeping for one search side, sized to the graph.
#[derive(Debug, Clone)]
pub struct SearchState {
    distances: Vec<f64>,
    visited: Vec<bool>,
    predecessors: Vec<Option<NodeId>>,
    expanded: usize,
}

impl SearchState {
    pub fn new(size: usize) -> Self {
        Self {
            distances: vec![f64::INFINITY; size],
            visited: vec![false; size],
            predecessors: vec![None; size],
            expanded: 0,
        }
    }

    /// Mark `root` as the origin of this side.
    pub fn seed(&mut self, root: NodeId) {
        if let Some(distance) = self.distances.get_mut(root) {
            *distance = 0.0;
        }
    }

    /// Tentative distance, `f64::INFINITY` when undiscovered.
    pub fn distance(&self, id: NodeId) -> f64 {
        self.distances.get(id).copied().unwrap_or(f64::INFINITY)
    }

    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.predecessors.get(id).copied().flatten()
    }

    pub fn is_visited(&self, id: NodeId) -> bool {
        self.visited.get(id).copied().unwrap_or(false)
    }

    pub fn status(&self, id: NodeId) -> NodeStatus {
        if self.is_visited(id) {
            NodeStatus::Visited
        } else if self.distance(id).is_finite() {
            NodeStatus::Seen
        } else {
            NodeStatus::Unseen
        }
    }

    /// Finalise `id`. Returns `false` if it was already visited.
    pub fn visit(&mut self, id: NodeId) -> bool {
        match self.visited.get_mut(id) {
            Some(flag) if !*flag => {
                *flag = true;
                self.expanded += 1;
                true
            }
            _ => false,
        }
    }

    /// Record `candidate` for `node` via `via` when it improves the tentative
    /// distance. Returns whether it did.
    pub fn relax(&mut self, node: NodeId, via: NodeId, candidate: f64) -> bool {
        match self.distances.get_mut(node) {
            Some(current) if candidate < *current => {
                *current = candidate;
                self.predecessors[node] = Some(via);
                true
            }
            _ => false,
        }
    }

    /// Number of finalised nodes.
    pub fn visited_count(&self) -> usize {
        self.expanded
    }

    /// Finalised nodes in ascending id order.
    pub fn visited_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.visited
            .iter()
            .enumerate()
            .filter_map(|(id, &visited)| visited.then_some(id))
    }

    /// Finite tentative distances in ascending id order.
    pub fn finite_distances(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, distance)| distance.is_finite())
            .map(|(id, &distance)| (id, distance))
    }

    /// `(predecessor, node)` pairs of the current search tree.
    pub fn tree_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.predecessors
            .iter()
            .enumerate()
            .filter_map(|(id, predecessor)| predecessor.map(|p| (p, id)))
    }

    /// Nodes from this side's root to `id`, root first. Empty when `id` was
    /// never reached.
    pub fn chain_to(&self, id: NodeId) -> Vec<NodeId> {
        if !self.distance(id).is_finite() {
            return Vec::new();
        }
        let mut chain = vec![id];
        let mut current = id;
        while let Some(previous) = self.predecessor(current) {
            chain.push(previous);
            current = previous;
        }
        chain.reverse();
        chain
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Caller-imposed bounds. Exceeding either ends the search with `NoPath`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub timeout: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Running check of [`SearchLimits`] for one search.
#[derive(Debug)]
pub(crate) struct Budget {
    limits: SearchLimits,
    started: Instant,
}

impl Budget {
    pub(crate) fn start(limits: &SearchLimits) -> Self {
        Self {
            limits: *limits,
            started: Instant::now(),
        }
    }

    /// Fails with `NoPath` once another expansion would break a limit.
    pub(crate) fn check(&self, expanded: usize, start: NodeId, goal: NodeId) -> Result<()> {
        if let Some(max) = self.limits.max_expansions {
            if expanded >= max {
                tracing::warn!(max, "search stopped at expansion limit");
                return Err(Error::NoPath { start, goal });
            }
        }
        if let Some(timeout) = self.limits.timeout {
            if self.started.elapsed() >= timeout {
                tracing::warn!(?timeout, expanded, "search stopped at time limit");
                return Err(Error::NoPath { start, goal });
            }
        }
        Ok(())
    }
}

/// Result of a successful search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: RoutePath,
    /// Nodes finalised across all sides.
    pub visited: usize,
    /// Node where the two sides of a bidirectional search were joined.
    pub meeting: Option<NodeId>,
    pub forward: SearchState,
    /// Backward side of a bidirectional search.
    pub backward: Option<SearchState>,
}

pub(crate) fn ensure_nodes(graph: &RoadGraph, start: NodeId, goal: NodeId) -> Result<()> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }
    for id in [start, goal] {
        if !graph.contains(id) {
            return Err(Error::UnknownNode { id });
        }
    }
    Ok(())
}
