//! Georoute library entry points.
//!
//! This crate models road networks as weighted graphs of geographic
//! coordinates, snaps query coordinates onto them, and finds shortest paths
//! with Dijkstra, A* or bidirectional search, optionally recording a
//! replayable trace. Higher-level consumers (CLI, HTTP service) should only
//! depend on the items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod build;
pub mod coordinate;
pub mod distance;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod locate;
pub mod output;
pub mod path;
pub mod routing;
pub mod search;
pub mod source;
pub mod trace;

pub use build::{
    build_graph, build_grid_graph, build_synthetic_graph, BuildMode, BuiltGraph,
    GraphBuildOptions, DEFAULT_GRID_DENSITY, DEFAULT_REGION_PADDING, DEFAULT_WAYPOINTS,
};
pub use coordinate::Coordinate;
pub use distance::{haversine_distance, DistanceMetric, DistanceUnit};
pub use error::{Error, ErrorKind, Result};
pub use graph::{GraphDirection, Node, NodeId, NodeKind, RoadGraph};
pub use locate::{nearest_node, snap_endpoints, EndpointPolicy};
pub use output::{RenderMode, RouteEndpoint, RouteSummary};
pub use path::{Heading, PathSegment, RoutePath};
pub use routing::{route, RouteAlgorithm, RoutePlan, RouteRequest};
pub use search::{Heuristic, NodeStatus, SearchDirection, SearchLimits, SearchOutcome, SearchState};
pub use source::{load_graph_source, BoundingBox, GraphProvider, GraphSource, JsonFileProvider};
pub use trace::{PlaybackProgress, StepSnapshot, StepTrace, TraceCursor, TraceNodeState};
