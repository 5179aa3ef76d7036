use crate::error::Result;
use crate::frontier::Frontier;
use crate::graph::{NodeId, RoadGraph};
use crate::path::reconstruct;
use crate::trace::{StepSnapshot, StepTrace};

use super::{ensure_nodes, Budget, Heuristic, SearchLimits, SearchOutcome, SearchState};

/// Single-source search from `start` that stops once `goal` is finalised.
///
/// With [`Heuristic::Zero`] this is Dijkstra; with
/// [`Heuristic::GreatCircle`] it is A*. When `trace` is given, one snapshot is
/// recorded per finalised node.
pub fn unidirectional(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    limits: &SearchLimits,
    mut trace: Option<&mut StepTrace>,
) -> Result<SearchOutcome> {
    ensure_nodes(graph, start, goal)?;

    let budget = Budget::start(limits);
    let mut state = SearchState::new(graph.len());
    let mut frontier = Frontier::with_capacity(graph.len());

    state.seed(start);
    frontier.push(heuristic.estimate(graph, start, goal), start);

    let mut reached = false;
    while let Some((_, current)) = frontier.pop_min() {
        if state.is_visited(current) {
            continue;
        }
        budget.check(state.visited_count(), start, goal)?;
        state.visit(current);

        if let Some(trace) = trace.as_deref_mut() {
            let step = trace.len();
            trace.record(StepSnapshot::capture(
                graph, step, current, None, &state, None,
            )?);
        }

        if current == goal {
            reached = true;
            break;
        }

        let base = state.distance(current);
        for (neighbor, weight) in graph.neighbors(current) {
            if state.is_visited(neighbor) {
                continue;
            }
            let candidate = base + weight;
            if state.relax(neighbor, current, candidate) {
                frontier.push(
                    candidate + heuristic.estimate(graph, neighbor, goal),
                    neighbor,
                );
            }
        }
    }

    tracing::debug!(
        start,
        goal,
        ?heuristic,
        visited = state.visited_count(),
        reached,
        "unidirectional search finished"
    );

    let path = reconstruct(graph, &state, goal)?;
    Ok(SearchOutcome {
        path,
        visited: state.visited_count(),
        meeting: None,
        forward: state,
        backward: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::graph::{GraphDirection, NodeKind};

    fn line() -> RoadGraph {
        let mut graph = RoadGraph::new(GraphDirection::Undirected);
        for lng in [0.0, 0.01, 0.02] {
            graph.add_node(Coordinate::new(0.0, lng).unwrap(), NodeKind::Intersection);
        }
        graph.connect(0, 1, 2.0).unwrap();
        graph.connect(1, 2, 3.0).unwrap();
        graph
    }

    #[test]
    fn line_graph_yields_all_nodes() {
        let graph = line();
        let outcome =
            unidirectional(&graph, 0, 2, Heuristic::Zero, &SearchLimits::default(), None).unwrap();
        assert_eq!(outcome.path.nodes, vec![0, 1, 2]);
        assert_eq!(outcome.path.total_cost, 5.0);
        assert_eq!(outcome.visited, 3);
        assert!(outcome.meeting.is_none());
    }

    #[test]
    fn unreachable_goal_is_no_path() {
        let mut graph = line();
        graph.add_node(Coordinate::new(1.0, 1.0).unwrap(), NodeKind::Intersection);
        let error = unidirectional(&graph, 0, 3, Heuristic::Zero, &SearchLimits::default(), None)
            .unwrap_err();
        assert!(error.is_no_path());
    }

    #[test]
    fn trace_has_one_entry_per_visit() {
        let graph = line();
        let mut trace = StepTrace::new();
        let outcome = unidirectional(
            &graph,
            0,
            2,
            Heuristic::Zero,
            &SearchLimits::default(),
            Some(&mut trace),
        )
        .unwrap();
        assert_eq!(trace.len(), outcome.visited);
        assert_eq!(trace.get(0).map(|s| s.node), Some(0));
        assert_eq!(trace.get(2).map(|s| s.node), Some(2));
    }

    #[test]
    fn expansion_limit_stops_the_search() {
        let graph = line();
        let limits = SearchLimits::unlimited().with_max_expansions(1);
        let error = unidirectional(&graph, 0, 2, Heuristic::Zero, &limits, None).unwrap_err();
        assert!(error.is_no_path());
    }

    #[test]
    fn directed_edges_are_followed_one_way() {
        let mut graph = RoadGraph::new(GraphDirection::Directed);
        let a = graph.add_node(Coordinate::new(0.0, 0.0).unwrap(), NodeKind::Intersection);
        let b = graph.add_node(Coordinate::new(0.0, 0.01).unwrap(), NodeKind::Intersection);
        graph.connect(a, b, 1.0).unwrap();

        let limits = SearchLimits::default();
        assert!(unidirectional(&graph, a, b, Heuristic::Zero, &limits, None).is_ok());
        assert!(unidirectional(&graph, b, a, Heuristic::Zero, &limits, None)
            .unwrap_err()
            .is_no_path());
    }
}
