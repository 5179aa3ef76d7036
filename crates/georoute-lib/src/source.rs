//! Ingestion of externally supplied road networks.
//!
//! Graph acquisition (querying a mapping service, parsing OSM extracts) happens
//! outside this crate; what arrives here is an exported [`GraphSource`]
//! document. Validation is strict: malformed records fail the whole load.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::distance::DistanceUnit;
use crate::error::{Error, Result};
use crate::graph::{GraphDirection, NodeKind, RoadGraph};

/// Serialised road network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSource {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub unit: DistanceUnit,
    pub nodes: Vec<SourceNode>,
    #[serde(default)]
    pub edges: Vec<SourceEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceNode {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEdge {
    pub from: i64,
    pub to: i64,
    /// Supplied length; the haversine distance is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<Coordinate>,
}

/// Axis-aligned region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Box enclosing both points, widened by `padding` degrees on each side and
    /// clamped to valid coordinate ranges.
    pub fn around(a: &Coordinate, b: &Coordinate, padding: f64) -> Self {
        Self {
            south: (a.lat.min(b.lat) - padding).max(-90.0),
            west: (a.lng.min(b.lng) - padding).max(-180.0),
            north: (a.lat.max(b.lat) + padding).min(90.0),
            east: (a.lng.max(b.lng) + padding).min(180.0),
        }
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.south..=self.north).contains(&coordinate.lat)
            && (self.west..=self.east).contains(&coordinate.lng)
    }
}

impl GraphSource {
    /// Parse a source document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Keep only the nodes inside `region` and the edges between them.
    pub fn clip(&self, region: &BoundingBox) -> GraphSource {
        let nodes: Vec<SourceNode> = self
            .nodes
            .iter()
            .filter(|node| {
                region.contains(&Coordinate {
                    lat: node.lat,
                    lng: node.lng,
                })
            })
            .cloned()
            .collect();
        let kept: std::collections::HashSet<i64> = nodes.iter().map(|node| node.id).collect();
        let edges = self
            .edges
            .iter()
            .filter(|edge| kept.contains(&edge.from) && kept.contains(&edge.to))
            .cloned()
            .collect();

        GraphSource {
            directed: self.directed,
            unit: self.unit,
            nodes,
            edges,
        }
    }

    /// Convert into a [`RoadGraph`], assigning dense ids in document order.
    pub fn into_graph(self) -> Result<RoadGraph> {
        let direction = if self.directed {
            GraphDirection::Directed
        } else {
            GraphDirection::Undirected
        };
        let mut graph = RoadGraph::new(direction).with_unit(self.unit);
        let mut ids = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let coordinate = Coordinate::new(node.lat, node.lng).map_err(|e| {
                Error::invalid_graph(format!("node {} has {}", node.id, e))
            })?;
            if ids.contains_key(&node.id) {
                return Err(Error::invalid_graph(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
            let id = graph.add_external_node(node.id, coordinate, node.kind);
            ids.insert(node.id, id);
        }

        for edge in self.edges {
            let lookup = |external: i64| {
                ids.get(&external).copied().ok_or_else(|| {
                    Error::invalid_graph(format!(
                        "edge {} -> {} references unknown node {external}",
                        edge.from, edge.to
                    ))
                })
            };
            let from = lookup(edge.from)?;
            let to = lookup(edge.to)?;

            for point in &edge.geometry {
                point.validate().map_err(|e| {
                    Error::invalid_graph(format!(
                        "edge {} -> {} geometry has {}",
                        edge.from, edge.to, e
                    ))
                })?;
            }

            let weight = match edge.length {
                Some(length) => length,
                None => graph.distance_between(from, to)?,
            };
            if edge.geometry.is_empty() {
                graph.connect(from, to, weight)?;
            } else {
                graph.connect_with_geometry(from, to, weight, edge.geometry)?;
            }
        }

        tracing::debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            directed = self.directed,
            "ingested graph source"
        );

        Ok(graph)
    }
}

/// Read a [`GraphSource`] JSON file and build the graph.
pub fn load_graph_source(path: &Path) -> Result<RoadGraph> {
    let text = fs::read_to_string(path)?;
    GraphSource::from_json(&text)?.into_graph()
}

/// Supplies the road network for a request region.
pub trait GraphProvider: Send + Sync {
    fn load(&self, region: &BoundingBox) -> Result<RoadGraph>;
}

/// Provider backed by an exported JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphProvider for JsonFileProvider {
    fn load(&self, region: &BoundingBox) -> Result<RoadGraph> {
        let text = fs::read_to_string(&self.path)?;
        let source = GraphSource::from_json(&text)?;
        let total = source.nodes.len();
        let clipped = source.clip(region);
        tracing::debug!(
            path = %self.path.display(),
            total,
            kept = clipped.nodes.len(),
            "clipped graph source to region"
        );
        clipped.into_graph()
    }
}
