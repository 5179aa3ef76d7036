//! Shared route arguments and their conversion into library types.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use georoute_lib::{
    build_graph, load_graph_source, BoundingBox, BuildMode, Coordinate, EndpointPolicy,
    GraphBuildOptions, GraphProvider, JsonFileProvider, RoadGraph, RouteAlgorithm, RouteRequest,
    SearchLimits, DEFAULT_GRID_DENSITY, DEFAULT_WAYPOINTS,
};

/// Where the road graph comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Topology {
    /// Straight-line waypoints between the endpoints, fully connected.
    Synthetic,
    /// Lattice spanning the endpoints.
    Grid,
    /// Road network read from `--graph`.
    File,
}

/// Arguments shared by `route` and `trace`.
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Start coordinate as `LAT,LNG`.
    #[arg(long = "from", value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub from: Coordinate,
    /// Destination coordinate as `LAT,LNG`.
    #[arg(long = "to", value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub to: Coordinate,
    /// Graph topology to search.
    #[arg(long, value_enum, default_value_t = Topology::Grid)]
    pub topology: Topology,
    /// Road network JSON file (required with `--topology file`).
    #[arg(long)]
    pub graph: Option<PathBuf>,
    /// Degrees of padding around the endpoints; only nodes in that region are
    /// loaded from `--graph`.
    #[arg(long)]
    pub padding: Option<f64>,
    /// Search algorithm (dijkstra, a-star, bidirectional, bidirectional-a-star).
    #[arg(long, default_value_t = RouteAlgorithm::AStar)]
    pub algorithm: RouteAlgorithm,
    /// Lattice side length for the grid topology.
    #[arg(long, default_value_t = DEFAULT_GRID_DENSITY)]
    pub density: usize,
    /// Interior waypoints for the synthetic topology.
    #[arg(long, default_value_t = DEFAULT_WAYPOINTS)]
    pub waypoints: usize,
    /// Never snap the destination onto the start node.
    #[arg(long)]
    pub distinct_endpoints: bool,
    /// Give up after this many node expansions.
    #[arg(long)]
    pub max_expansions: Option<usize>,
    /// Give up after this many milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl RouteArgs {
    /// Build or load the graph selected by the arguments.
    pub fn load_graph(&self) -> Result<RoadGraph> {
        match self.topology {
            Topology::Synthetic | Topology::Grid => {
                let mode = if self.topology == Topology::Grid {
                    BuildMode::Grid
                } else {
                    BuildMode::Synthetic
                };
                let options = GraphBuildOptions {
                    waypoints: self.waypoints,
                    grid_density: self.density,
                    ..GraphBuildOptions::default()
                };
                let built = build_graph(self.from, self.to, mode, &options)
                    .with_context(|| format!("failed to build {mode} graph"))?;
                Ok(built.graph)
            }
            Topology::File => {
                let Some(path) = self.graph.as_deref() else {
                    bail!("--graph is required with --topology file");
                };
                match self.padding {
                    Some(padding) => {
                        let region = BoundingBox::around(&self.from, &self.to, padding);
                        JsonFileProvider::new(path)
                            .load(&region)
                            .with_context(|| format!("failed to load {}", path.display()))
                    }
                    None => load_graph_source(path)
                        .with_context(|| format!("failed to load {}", path.display())),
                }
            }
        }
    }

    /// Library request for these arguments.
    pub fn to_request(&self, with_trace: bool) -> RouteRequest {
        let mut limits = SearchLimits::unlimited();
        if let Some(max) = self.max_expansions {
            limits = limits.with_max_expansions(max);
        }
        if let Some(ms) = self.timeout_ms {
            limits = limits.with_timeout(Duration::from_millis(ms));
        }
        let policy = if self.distinct_endpoints {
            EndpointPolicy::DistinctEndpoints
        } else {
            EndpointPolicy::AllowShared
        };

        RouteRequest::new(self.from, self.to)
            .with_algorithm(self.algorithm)
            .with_endpoint_policy(policy)
            .with_limits(limits)
            .with_trace(with_trace)
    }
}

/// Parse `LAT,LNG` into a validated coordinate.
pub fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;
    Coordinate::new(lat, lng).map_err(|e| e.to_string())
}
