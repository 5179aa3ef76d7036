//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use georoute_lib::{
    BuildMode, Coordinate, EndpointPolicy, GraphBuildOptions, RouteAlgorithm,
    RouteRequest as LibRequest, SearchLimits, DEFAULT_GRID_DENSITY, DEFAULT_WAYPOINTS,
};

use crate::ProblemDetails;

/// Largest accepted grid side length.
pub const MAX_GRID_DENSITY: usize = 100;

/// Largest accepted waypoint count; the synthetic graph is complete.
pub const MAX_WAYPOINTS: usize = 200;

/// Largest graph a traced request may run on. Every snapshot copies the
/// visited set, so trace size grows with the square of the node count.
pub const MAX_TRACE_NODES: usize = 1024;

/// Validation trait for request types.
pub trait Validate {
    /// Validate the request; `request_id` fills the problem's `instance`.
    ///
    /// Boxed to keep the `Err` variant small.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Graph a route request is answered on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Straight-line waypoints between the endpoints.
    Synthetic,
    /// Lattice spanning the endpoints.
    #[default]
    Grid,
    /// The road network preloaded from `GEOROUTE_GRAPH_PATH`.
    Loaded,
}

impl Topology {
    /// Build mode for generated topologies; `None` for [`Topology::Loaded`].
    pub fn build_mode(self) -> Option<BuildMode> {
        match self {
            Topology::Synthetic => Some(BuildMode::Synthetic),
            Topology::Grid => Some(BuildMode::Grid),
            Topology::Loaded => None,
        }
    }
}

/// Body of `POST /api/v1/route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,

    pub end: Coordinate,

    #[serde(default)]
    pub algorithm: RouteAlgorithm,

    #[serde(default)]
    pub topology: Topology,

    /// Grid side length.
    #[serde(default = "default_density")]
    pub density: usize,

    /// Interior waypoints for the synthetic topology.
    #[serde(default = "default_waypoints")]
    pub waypoints: usize,

    /// Include the step trace in the response.
    #[serde(default)]
    pub trace: bool,

    /// Never snap `end` onto the node chosen for `start`.
    #[serde(default)]
    pub distinct_endpoints: bool,
}

fn default_density() -> usize {
    DEFAULT_GRID_DENSITY
}

fn default_waypoints() -> usize {
    DEFAULT_WAYPOINTS
}

impl RouteRequest {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            algorithm: RouteAlgorithm::default(),
            topology: Topology::default(),
            density: DEFAULT_GRID_DENSITY,
            waypoints: DEFAULT_WAYPOINTS,
            trace: false,
            distinct_endpoints: false,
        }
    }

    /// Options for building the generated topologies.
    pub fn build_options(&self) -> GraphBuildOptions {
        GraphBuildOptions {
            waypoints: self.waypoints,
            grid_density: self.density,
            ..GraphBuildOptions::default()
        }
    }

    /// Node count of the generated topology; `None` for [`Topology::Loaded`].
    pub fn generated_node_count(&self) -> Option<usize> {
        match self.topology {
            Topology::Synthetic => Some(self.waypoints.saturating_add(2)),
            Topology::Grid => Some(self.density.saturating_mul(self.density)),
            Topology::Loaded => None,
        }
    }

    /// Reject `trace` when the graph answering the request has more than
    /// [`MAX_TRACE_NODES`] nodes.
    pub fn check_trace_size(
        &self,
        graph_nodes: usize,
        request_id: &str,
    ) -> Result<(), Box<ProblemDetails>> {
        if self.trace && graph_nodes > MAX_TRACE_NODES {
            return Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The 'trace' field needs a graph of at most {MAX_TRACE_NODES} nodes, got {graph_nodes}"
                ),
                request_id,
            )));
        }
        Ok(())
    }

    /// Library request, capped at `max_expansions` when the service sets one.
    pub fn to_lib_request(&self, max_expansions: Option<usize>) -> LibRequest {
        let policy = if self.distinct_endpoints {
            EndpointPolicy::DistinctEndpoints
        } else {
            EndpointPolicy::AllowShared
        };
        let limits = match max_expansions {
            Some(max) => SearchLimits::unlimited().with_max_expansions(max),
            None => SearchLimits::unlimited(),
        };

        LibRequest::new(self.start, self.end)
            .with_algorithm(self.algorithm)
            .with_endpoint_policy(policy)
            .with_limits(limits)
            .with_trace(self.trace)
    }
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        for (field, coordinate) in [("start", &self.start), ("end", &self.end)] {
            if let Err(error) = coordinate.validate() {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("The '{field}' field is invalid: {error}"),
                    request_id,
                )));
            }
        }

        if self.topology == Topology::Grid && !(2..=MAX_GRID_DENSITY).contains(&self.density) {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'density' field must be between 2 and {MAX_GRID_DENSITY}"),
                request_id,
            )));
        }

        if self.topology == Topology::Synthetic && self.waypoints > MAX_WAYPOINTS {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'waypoints' field cannot exceed {MAX_WAYPOINTS}"),
                request_id,
            )));
        }

        if let Some(nodes) = self.generated_node_count() {
            self.check_trace_size(nodes, request_id)?;
        }

        Ok(())
    }
}
