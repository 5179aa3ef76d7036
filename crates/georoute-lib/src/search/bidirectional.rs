use crate::error::{Error, Result};
use crate::frontier::Frontier;
use crate::graph::{Neighbors, NodeId, RoadGraph};
use crate::path::{join, RoutePath};
use crate::trace::{StepSnapshot, StepTrace};

use super::{
    ensure_nodes, Budget, Heuristic, SearchDirection, SearchLimits, SearchOutcome, SearchState,
};

/// Meet-in-the-middle search: a forward side from `start` and a backward side
/// from `goal` expand alternately, one node each per round.
///
/// Whenever a node is reached by both sides its combined distance is offered as
/// a candidate meeting point. A side stops the search once its next priority
/// is no lower than the best candidate, or once it runs out of nodes. With
/// [`Heuristic::GreatCircle`] the forward side estimates towards the goal and
/// the backward side towards the start.
pub fn bidirectional(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    limits: &SearchLimits,
    mut trace: Option<&mut StepTrace>,
) -> Result<SearchOutcome> {
    ensure_nodes(graph, start, goal)?;

    if start == goal {
        return Ok(SearchOutcome {
            path: RoutePath::single(graph, start)?,
            visited: 0,
            meeting: Some(start),
            forward: SearchState::new(graph.len()),
            backward: Some(SearchState::new(graph.len())),
        });
    }

    let run = Run {
        graph,
        budget: Budget::start(limits),
        start,
        goal,
    };
    let mut forward = Side::new(&run, SearchDirection::Forward, start, goal, heuristic);
    let mut backward = Side::new(&run, SearchDirection::Backward, goal, start, heuristic);
    let mut meeting = Meeting::default();

    loop {
        match forward.advance(&run, &backward.state, &mut meeting, trace.as_deref_mut())? {
            Advance::Expanded => {}
            Advance::Settled | Advance::Exhausted => break,
        }
        match backward.advance(&run, &forward.state, &mut meeting, trace.as_deref_mut())? {
            Advance::Expanded => {}
            Advance::Settled | Advance::Exhausted => break,
        }
    }

    let visited = forward.state.visited_count() + backward.state.visited_count();
    tracing::debug!(
        start,
        goal,
        ?heuristic,
        forward = forward.state.visited_count(),
        backward = backward.state.visited_count(),
        meeting = ?meeting.node,
        "bidirectional search finished"
    );

    let Some(node) = meeting.node else {
        return Err(Error::NoPath { start, goal });
    };
    let path = join(graph, &forward.state, &backward.state, node)?;

    Ok(SearchOutcome {
        path,
        visited,
        meeting: Some(node),
        forward: forward.state,
        backward: Some(backward.state),
    })
}

/// Inputs shared by both sides for one run.
struct Run<'g> {
    graph: &'g RoadGraph,
    budget: Budget,
    start: NodeId,
    goal: NodeId,
}

/// Best known start-to-goal cost through a node reached by both sides.
#[derive(Debug, Clone, Copy)]
struct Meeting {
    cost: f64,
    node: Option<NodeId>,
}

impl Default for Meeting {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            node: None,
        }
    }
}

impl Meeting {
    fn offer(&mut self, node: NodeId, cost: f64) {
        if cost < self.cost {
            self.cost = cost;
            self.node = Some(node);
        }
    }
}

enum Advance {
    Expanded,
    /// The side's next priority already reaches the best meeting cost.
    Settled,
    Exhausted,
}

/// One half of a bidirectional search.
struct Side {
    direction: SearchDirection,
    /// Node the heuristic estimates towards.
    target: NodeId,
    heuristic: Heuristic,
    state: SearchState,
    frontier: Frontier,
}

impl Side {
    fn new(
        run: &Run<'_>,
        direction: SearchDirection,
        root: NodeId,
        target: NodeId,
        heuristic: Heuristic,
    ) -> Self {
        let mut side = Self {
            direction,
            target,
            heuristic,
            state: SearchState::new(run.graph.len()),
            frontier: Frontier::with_capacity(run.graph.len()),
        };
        side.state.seed(root);
        let priority = side.estimate(run.graph, root);
        side.frontier.push(priority, root);
        side
    }

    fn estimate(&self, graph: &RoadGraph, node: NodeId) -> f64 {
        self.heuristic.estimate(graph, node, self.target)
    }

    fn edges<'g>(&self, graph: &'g RoadGraph, node: NodeId) -> Neighbors<'g> {
        match self.direction {
            SearchDirection::Forward => graph.neighbors(node),
            SearchDirection::Backward => graph.reverse_neighbors(node),
        }
    }

    /// Finalise this side's next node, if the search is not over yet.
    fn advance(
        &mut self,
        run: &Run<'_>,
        other: &SearchState,
        meeting: &mut Meeting,
        trace: Option<&mut StepTrace>,
    ) -> Result<Advance> {
        let current = loop {
            let Some((priority, node)) = self.frontier.pop_min() else {
                return Ok(Advance::Exhausted);
            };
            if self.state.is_visited(node) {
                continue;
            }
            if priority >= meeting.cost {
                return Ok(Advance::Settled);
            }
            break node;
        };

        run.budget.check(
            self.state.visited_count() + other.visited_count(),
            run.start,
            run.goal,
        )?;
        self.state.visit(current);

        if let Some(trace) = trace {
            let step = trace.len();
            trace.record(StepSnapshot::capture(
                run.graph,
                step,
                current,
                Some(self.direction),
                &self.state,
                Some(other),
            )?);
        }

        let base = self.state.distance(current);
        let across = other.distance(current);
        if across.is_finite() {
            meeting.offer(current, base + across);
        }

        for (neighbor, weight) in self.edges(run.graph, current) {
            if self.state.is_visited(neighbor) {
                continue;
            }
            let candidate = base + weight;
            if self.state.relax(neighbor, current, candidate) {
                let priority = candidate + self.estimate(run.graph, neighbor);
                self.frontier.push(priority, neighbor);
            }
            let across = other.distance(neighbor);
            if across.is_finite() {
                meeting.offer(neighbor, self.state.distance(neighbor) + across);
            }
        }

        Ok(Advance::Expanded)
    }
}
