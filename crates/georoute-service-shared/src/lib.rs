//! Shared infrastructure for the georoute HTTP route service.
//!
//! - [`AppState`]: optional preloaded road network and per-request limits
//! - [`health`]: liveness and readiness probes
//! - [`ProblemDetails`]: RFC 9457 error documents
//! - [`ServiceResponse`] and [`RouteResponse`]: success bodies
//! - [`logging`]: JSON or text tracing setup
//! - [`middleware`]: request id extraction and request spans
//! - [`RouteRequest`]: request body with validation
//!
//! Handlers stay thin; routing semantics live in `georoute-lib`:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  axum handler                                 │
//! │  - parse and validate JSON                    │
//! │  - resolve the graph (generated or preloaded) │
//! │  - georoute_lib::route on a blocking thread   │
//! │  - RouteResponse or ProblemDetails            │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Enable the `test-utils` feature for [`test_utils`] in dependent crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use middleware::{extract_or_generate_request_id, request_span, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_ROUTE_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_UNROUTABLE_GRAPH,
};
pub use request::{
    RouteRequest, Topology, Validate, MAX_GRID_DENSITY, MAX_TRACE_NODES, MAX_WAYPOINTS,
};
pub use response::{RouteResponse, ServiceResponse};
pub use state::{AppState, AppStateError, GRAPH_PATH_ENV, MAX_EXPANSIONS_ENV};
