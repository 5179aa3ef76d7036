use std::collections::{btree_map, BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::distance::{DistanceMetric, DistanceUnit};
use crate::error::{Error, Result};

/// Dense node identifier, assigned from 0 in insertion order.
pub type NodeId = usize;

/// Presentation tag carried by each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    End,
    Waypoint,
    #[default]
    Intersection,
}

/// Whether edges are stored symmetrically or once per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphDirection {
    #[default]
    Undirected,
    Directed,
}

/// Graph vertex owning its outgoing connections.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub coordinate: Coordinate,
    pub kind: NodeKind,
    /// Identifier used by the data source this node was imported from, if any.
    pub external_id: Option<i64>,
    connections: BTreeMap<NodeId, f64>,
}

impl Node {
    /// Outgoing connections keyed by neighbour id.
    pub fn connections(&self) -> &BTreeMap<NodeId, f64> {
        &self.connections
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }
}

/// Iterator over `(neighbour, weight)` pairs in ascending neighbour order.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    inner: Option<btree_map::Iter<'a, NodeId, f64>>,
}

impl Iterator for Neighbors<'_> {
    type Item = (NodeId, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .as_mut()?
            .next()
            .map(|(&neighbor, &weight)| (neighbor, weight))
    }
}

/// Road network searched by the routing engine.
///
/// Construction mutates the graph; once built it is treated as read-only and
/// may be shared between concurrent searches.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    direction: GraphDirection,
    metric: DistanceMetric,
    nodes: Vec<Node>,
    // Incoming edges, only maintained for directed graphs.
    incoming: Vec<BTreeMap<NodeId, f64>>,
    geometry: HashMap<(NodeId, NodeId), Vec<Coordinate>>,
}

impl RoadGraph {
    pub fn new(direction: GraphDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Fix the unit used for fallback weights and heuristics.
    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.metric = DistanceMetric::new(unit);
        self
    }

    pub fn direction(&self) -> GraphDirection {
        self.direction
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn unit(&self) -> DistanceUnit {
        self.metric.unit()
    }

    /// Append a node and return its id.
    pub fn add_node(&mut self, coordinate: Coordinate, kind: NodeKind) -> NodeId {
        self.push_node(coordinate, kind, None)
    }

    /// Append a node that carries the identifier of its source record.
    pub fn add_external_node(
        &mut self,
        external_id: i64,
        coordinate: Coordinate,
        kind: NodeKind,
    ) -> NodeId {
        self.push_node(coordinate, kind, Some(external_id))
    }

    fn push_node(
        &mut self,
        coordinate: Coordinate,
        kind: NodeKind,
        external_id: Option<i64>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            coordinate,
            kind,
            external_id,
            connections: BTreeMap::new(),
        });
        if self.direction == GraphDirection::Directed {
            self.incoming.push(BTreeMap::new());
        }
        id
    }

    /// Add or overwrite the edge `a -> b` (and `b -> a` when undirected).
    pub fn connect(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<()> {
        self.check_edge(a, b, weight)?;
        self.geometry.remove(&(a, b));
        if self.direction == GraphDirection::Undirected {
            self.geometry.remove(&(b, a));
        }
        self.insert_edge(a, b, weight);
        Ok(())
    }

    /// Like [`RoadGraph::connect`], also recording the intermediate shape
    /// points between `a` and `b` in travel order.
    pub fn connect_with_geometry(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: f64,
        geometry: Vec<Coordinate>,
    ) -> Result<()> {
        self.check_edge(a, b, weight)?;
        self.insert_edge(a, b, weight);
        if self.direction == GraphDirection::Undirected {
            let mut reversed = geometry.clone();
            reversed.reverse();
            self.geometry.insert((b, a), reversed);
        }
        self.geometry.insert((a, b), geometry);
        Ok(())
    }

    /// Connect two nodes using the graph metric as weight.
    pub fn connect_by_distance(&mut self, a: NodeId, b: NodeId) -> Result<f64> {
        let weight = self.distance_between(a, b)?;
        self.connect(a, b, weight)?;
        Ok(weight)
    }

    /// Metric distance between two nodes of this graph.
    pub fn distance_between(&self, a: NodeId, b: NodeId) -> Result<f64> {
        let from = self.node(a).ok_or(Error::UnknownNode { id: a })?;
        let to = self.node(b).ok_or(Error::UnknownNode { id: b })?;
        Ok(self.metric.distance(&from.coordinate, &to.coordinate))
    }

    fn check_edge(&self, a: NodeId, b: NodeId, weight: f64) -> Result<()> {
        for id in [a, b] {
            if !self.contains(id) {
                return Err(Error::UnknownNode { id });
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::invalid_graph(format!(
                "edge {a} -> {b} has invalid weight {weight}"
            )));
        }
        Ok(())
    }

    fn insert_edge(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.nodes[a].connections.insert(b, weight);
        match self.direction {
            GraphDirection::Undirected => {
                self.nodes[b].connections.insert(a, weight);
            }
            GraphDirection::Directed => {
                self.incoming[b].insert(a, weight);
            }
        }
    }

    /// Outgoing neighbours of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: NodeId) -> Neighbors<'_> {
        Neighbors {
            inner: self.nodes.get(id).map(|node| node.connections.iter()),
        }
    }

    /// Incoming neighbours of `id`, i.e. the edges a backward search follows.
    pub fn reverse_neighbors(&self, id: NodeId) -> Neighbors<'_> {
        match self.direction {
            GraphDirection::Undirected => self.neighbors(id),
            GraphDirection::Directed => Neighbors {
                inner: self.incoming.get(id).map(BTreeMap::iter),
            },
        }
    }

    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.nodes.get(a)?.connections.get(&b).copied()
    }

    /// Intermediate shape points of `a -> b`, if the edge carries geometry.
    pub fn edge_geometry(&self, a: NodeId, b: NodeId) -> Option<&[Coordinate]> {
        self.geometry.get(&(a, b)).map(Vec::as_slice)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.nodes.get(id).map(|node| node.coordinate)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges; an undirected edge counts once.
    pub fn edge_count(&self) -> usize {
        let stored: usize = self.nodes.iter().map(Node::degree).sum();
        match self.direction {
            GraphDirection::Directed => stored,
            GraphDirection::Undirected => {
                let self_loops = self
                    .nodes
                    .iter()
                    .filter(|node| node.connections.contains_key(&node.id))
                    .count();
                (stored + self_loops) / 2
            }
        }
    }

    /// Reset to an empty graph, keeping direction and unit.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.incoming.clear();
        self.geometry.clear();
    }
}
