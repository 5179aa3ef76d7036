//! Replayable record of search progress.
//!
//! A search appends one [`StepSnapshot`] per node it finalises. The trace is
//! immutable once the search returns; any number of [`TraceCursor`]s can then
//! step through it independently.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::graph::{NodeId, RoadGraph};
use crate::search::{SearchDirection, SearchState};

/// Search state captured right after one node was finalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Zero-based position in the trace.
    pub step: usize,
    /// Node finalised at this step.
    pub node: NodeId,
    pub coordinate: Coordinate,
    /// Side that expanded the node; `None` for unidirectional searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SearchDirection>,
    /// Settled distance of `node` from its side's root.
    pub distance: f64,
    /// Every finalised node so far, ascending.
    pub visited: Vec<NodeId>,
    /// Finite tentative distances of the expanding side, ascending by id.
    pub distances: Vec<(NodeId, f64)>,
    /// `(predecessor, node)` edges of the search trees.
    pub tree: Vec<(NodeId, NodeId)>,
    /// Coordinates from the expanding side's root to `node`.
    pub partial_path: Vec<Coordinate>,
}

/// How a node should be drawn at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceNodeState {
    Current,
    Visited,
    Seen,
    Unseen,
}

impl StepSnapshot {
    /// Capture the state after `node` was finalised by `state`. `other` is the
    /// opposite side of a bidirectional search.
    pub(crate) fn capture(
        graph: &RoadGraph,
        step: usize,
        node: NodeId,
        direction: Option<SearchDirection>,
        state: &SearchState,
        other: Option<&SearchState>,
    ) -> Result<Self> {
        let coordinate = graph
            .coordinate(node)
            .ok_or(Error::UnknownNode { id: node })?;

        let mut visited: Vec<NodeId> = state.visited_nodes().collect();
        let mut tree: Vec<(NodeId, NodeId)> = state.tree_edges().collect();
        if let Some(other) = other {
            visited.extend(other.visited_nodes());
            visited.sort_unstable();
            visited.dedup();
            tree.extend(other.tree_edges());
        }

        let partial_path = state
            .chain_to(node)
            .into_iter()
            .filter_map(|id| graph.coordinate(id))
            .collect();

        Ok(Self {
            step,
            node,
            coordinate,
            direction,
            distance: state.distance(node),
            visited,
            distances: state.finite_distances().collect(),
            tree,
            partial_path,
        })
    }

    /// Rendering state of `node` at this step.
    pub fn status_of(&self, node: NodeId) -> TraceNodeState {
        if node == self.node {
            TraceNodeState::Current
        } else if self.visited.binary_search(&node).is_ok() {
            TraceNodeState::Visited
        } else if self
            .distances
            .binary_search_by_key(&node, |(id, _)| *id)
            .is_ok()
        {
            TraceNodeState::Seen
        } else {
            TraceNodeState::Unseen
        }
    }

    /// Whether the edge between `a` and `b` belongs to a search tree.
    pub fn is_tree_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.tree
            .iter()
            .any(|&(from, to)| (from, to) == (a, b) || (from, to) == (b, a))
    }
}

/// Append-only sequence of snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTrace {
    entries: Vec<StepSnapshot>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: StepSnapshot) {
        self.entries.push(snapshot);
    }

    pub fn entries(&self) -> &[StepSnapshot] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&StepSnapshot> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A fresh read position at the first entry.
    pub fn cursor(&self) -> TraceCursor<'_> {
        TraceCursor::new(self)
    }
}

/// Playback position within a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProgress {
    /// One-based step, 0 for an empty trace.
    pub current_step: usize,
    pub total_steps: usize,
    pub percent: f64,
}

/// Independent read position over a [`StepTrace`].
#[derive(Debug, Clone)]
pub struct TraceCursor<'a> {
    trace: &'a StepTrace,
    index: usize,
}

impl<'a> TraceCursor<'a> {
    pub fn new(trace: &'a StepTrace) -> Self {
        Self { trace, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&'a StepSnapshot> {
        self.trace.get(self.index)
    }

    /// Move one step forward, staying on the last entry at the end.
    pub fn next_step(&mut self) -> Option<&'a StepSnapshot> {
        if self.index + 1 < self.trace.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Move one step back, staying on the first entry at the start.
    pub fn previous_step(&mut self) -> Option<&'a StepSnapshot> {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn is_at_end(&self) -> bool {
        self.index + 1 >= self.trace.len()
    }

    pub fn progress(&self) -> PlaybackProgress {
        let total_steps = self.trace.len();
        if total_steps == 0 {
            return PlaybackProgress {
                current_step: 0,
                total_steps,
                percent: 0.0,
            };
        }
        let current_step = self.index + 1;
        PlaybackProgress {
            current_step,
            total_steps,
            percent: current_step as f64 / total_steps as f64 * 100.0,
        }
    }
}
