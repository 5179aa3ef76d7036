//! Nearest-node snapping of query coordinates onto a graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::graph::{NodeId, RoadGraph};

/// How the goal is snapped relative to the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Snap both endpoints independently. When they land on the same node the
    /// route is a single node with zero cost.
    #[default]
    AllowShared,
    /// Snap the goal while excluding the start node.
    ///
    /// This is an approximation: on sparse graphs the node picked for the goal
    /// can be far from the requested destination.
    DistinctEndpoints,
}

/// Closest node to `coordinate` that is not in `exclude`.
///
/// Linear scan; ties resolve to the lowest node id.
pub fn nearest_node(
    graph: &RoadGraph,
    coordinate: &Coordinate,
    exclude: &HashSet<NodeId>,
) -> Result<NodeId> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let metric = graph.metric();
    let mut best: Option<(NodeId, f64)> = None;
    for node in graph.nodes() {
        if exclude.contains(&node.id) {
            continue;
        }
        let distance = metric.distance(coordinate, &node.coordinate);
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((node.id, distance)),
        }
    }

    best.map(|(id, _)| id)
        .ok_or(Error::NearestNodeNotFound {
            excluded: exclude.len(),
        })
}

/// Snap a start/goal pair under `policy`, returning `(start, goal)` node ids.
pub fn snap_endpoints(
    graph: &RoadGraph,
    start: &Coordinate,
    goal: &Coordinate,
    policy: EndpointPolicy,
) -> Result<(NodeId, NodeId)> {
    let start_id = nearest_node(graph, start, &HashSet::new())?;

    let goal_id = match policy {
        EndpointPolicy::AllowShared => nearest_node(graph, goal, &HashSet::new())?,
        EndpointPolicy::DistinctEndpoints => {
            let exclude = HashSet::from([start_id]);
            let goal_id = nearest_node(graph, goal, &exclude)?;
            if nearest_node(graph, goal, &HashSet::new())? == start_id {
                tracing::warn!(
                    start = start_id,
                    goal = goal_id,
                    "goal snapped to the start node; using the nearest other node instead"
                );
            }
            goal_id
        }
    };

    tracing::debug!(start = start_id, goal = goal_id, ?policy, "snapped endpoints");
    Ok((start_id, goal_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphDirection, NodeKind};

    fn line_graph() -> RoadGraph {
        let mut graph = RoadGraph::new(GraphDirection::Undirected);
        for lng in [0.0, 1.0, 2.0] {
            graph.add_node(Coordinate::new(0.0, lng).unwrap(), NodeKind::Intersection);
        }
        graph
    }

    #[test]
    fn picks_the_closest_node() {
        let graph = line_graph();
        let query = Coordinate::new(0.1, 1.2).unwrap();
        assert_eq!(nearest_node(&graph, &query, &HashSet::new()).unwrap(), 1);
    }

    #[test]
    fn ties_resolve_to_the_lowest_id() {
        let graph = line_graph();
        let halfway = Coordinate::new(0.0, 0.5).unwrap();
        assert_eq!(nearest_node(&graph, &halfway, &HashSet::new()).unwrap(), 0);
    }

    #[test]
    fn exclusion_skips_nodes() {
        let graph = line_graph();
        let query = Coordinate::new(0.0, 0.0).unwrap();
        let exclude = HashSet::from([0]);
        assert_eq!(nearest_node(&graph, &query, &exclude).unwrap(), 1);
    }

    #[test]
    fn empty_graph_and_full_exclusion_fail() {
        let query = Coordinate::new(0.0, 0.0).unwrap();
        let empty = RoadGraph::new(GraphDirection::Undirected);
        assert!(matches!(
            nearest_node(&empty, &query, &HashSet::new()),
            Err(Error::EmptyGraph)
        ));

        let graph = line_graph();
        let exclude = HashSet::from([0, 1, 2]);
        assert!(matches!(
            nearest_node(&graph, &query, &exclude),
            Err(Error::NearestNodeNotFound { excluded: 3 })
        ));
    }

    #[test]
    fn policy_controls_shared_endpoints() {
        let graph = line_graph();
        let a = Coordinate::new(0.0, 0.01).unwrap();
        let b = Coordinate::new(0.0, 0.02).unwrap();

        assert_eq!(
            snap_endpoints(&graph, &a, &b, EndpointPolicy::AllowShared).unwrap(),
            (0, 0)
        );
        assert_eq!(
            snap_endpoints(&graph, &a, &b, EndpointPolicy::DistinctEndpoints).unwrap(),
            (0, 1)
        );
    }

    #[test]
    fn distinct_endpoints_on_single_node_graph_fails() {
        let mut graph = RoadGraph::new(GraphDirection::Undirected);
        graph.add_node(Coordinate::new(0.0, 0.0).unwrap(), NodeKind::Intersection);
        let query = Coordinate::new(0.0, 0.0).unwrap();
        let result = snap_endpoints(&graph, &query, &query, EndpointPolicy::DistinctEndpoints);
        assert!(matches!(result, Err(Error::NearestNodeNotFound { .. })));
    }
}
