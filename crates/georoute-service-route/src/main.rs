//! Geospatial route HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/v1/route` - snap two coordinates and route between them
//! - `GET /health/live` - liveness probe
//! - `GET /health/ready` - readiness probe
//!
//! # Configuration
//!
//! - `GEOROUTE_GRAPH_PATH` - road network JSON served as `topology: "loaded"` (optional)
//! - `GEOROUTE_MAX_EXPANSIONS` - node expansion cap per request (optional)
//! - `RUST_LOG` - log level (default: info)
//! - `LOG_FORMAT` - json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use georoute_lib::{build_graph, route, BuildMode, ErrorKind, RoadGraph};
use georoute_service_shared::{
    extract_or_generate_request_id, from_lib_error, health_live, health_ready, init_logging,
    request_span, AppState, LoggingConfig, ProblemDetails, RouteRequest, RouteResponse,
    ServiceResponse, Validate,
};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service("route"));

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;
    info!(
        graph_loaded = state.has_graph(),
        max_expansions = ?state.max_expansions(),
        "application state loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/route", post(route_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| request_span(request)),
        )
        .with_state(state)
}

/// Graph a request is answered on.
enum GraphChoice {
    Generated(BuildMode),
    Preloaded(Arc<RoadGraph>),
}

/// Handle `POST /api/v1/route`.
async fn route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers).to_string();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "rejected request body");
            return ProblemDetails::bad_request(rejection.body_text(), request_id).into_response();
        }
    };

    info!(
        request_id = %request_id,
        start = %request.start,
        end = %request.end,
        algorithm = %request.algorithm,
        topology = ?request.topology,
        "handling route request"
    );

    if let Err(problem) = request.validate(&request_id) {
        return (*problem).into_response();
    }

    let choice = match (request.topology.build_mode(), state.graph()) {
        (Some(mode), _) => GraphChoice::Generated(mode),
        (None, Some(graph)) => {
            if let Err(problem) = request.check_trace_size(graph.len(), &request_id) {
                return (*problem).into_response();
            }
            GraphChoice::Preloaded(graph)
        }
        (None, None) => {
            return ProblemDetails::service_unavailable(
                "No road network is loaded; set GEOROUTE_GRAPH_PATH to enable the 'loaded' topology",
                request_id,
            )
            .into_response();
        }
    };

    let max_expansions = state.max_expansions();
    let job = tokio::task::spawn_blocking(move || compute_route(&request, choice, max_expansions));

    match job.await {
        Ok(Ok(response)) => {
            info!(
                request_id = %request_id,
                hops = response.hops,
                visited = response.visited,
                total_distance = response.total_distance,
                "route computed"
            );
            (StatusCode::OK, ServiceResponse::new(response)).into_response()
        }
        Ok(Err(e)) => {
            if e.kind() == ErrorKind::Internal {
                error!(request_id = %request_id, error = %e, "route planning failed");
            } else {
                warn!(request_id = %request_id, error = %e, "route not planned");
            }
            from_lib_error(&e, &request_id).into_response()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "route task aborted");
            ProblemDetails::internal_error("route computation aborted", request_id).into_response()
        }
    }
}

/// Synchronous part of a request, run on the blocking pool.
fn compute_route(
    request: &RouteRequest,
    choice: GraphChoice,
    max_expansions: Option<usize>,
) -> georoute_lib::Result<RouteResponse> {
    let graph = match choice {
        GraphChoice::Preloaded(graph) => graph,
        GraphChoice::Generated(mode) => {
            let built = build_graph(request.start, request.end, mode, &request.build_options())?;
            Arc::new(built.graph)
        }
    };

    let plan = route(&graph, &request.to_lib_request(max_expansions))?;
    RouteResponse::from_plan(&graph, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use georoute_service_shared::test_utils::{fixture_points, grid_endpoints, test_state};
    use georoute_lib::GraphBuildOptions;
    use georoute_service_shared::{
        HealthStatus, MAX_GRID_DENSITY, PROBLEM_INVALID_REQUEST, PROBLEM_ROUTE_NOT_FOUND,
        PROBLEM_SERVICE_UNAVAILABLE,
    };

    fn server(state: AppState) -> TestServer {
        TestServer::new(app(state)).unwrap()
    }

    fn grid_body() -> Value {
        let (start, end) = grid_endpoints();
        json!({ "start": start, "end": end, "density": 6 })
    }

    #[tokio::test]
    async fn grid_route_returns_summary() {
        let response = server(test_state())
            .post("/api/v1/route")
            .json(&grid_body())
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["algorithm"], "a-star");
        assert_eq!(body["unit"], "kilometers");
        assert_eq!(body["content_type"], "application/json");
        // corner to corner on a 6x6 lattice follows the diagonal
        assert_eq!(body["hops"], 5);
        assert_eq!(body["segments"].as_array().unwrap().len(), 5);
        assert!(body.get("trace").is_none());
    }

    #[tokio::test]
    async fn every_algorithm_agrees_on_distance() {
        let server = server(test_state());
        let mut distances = Vec::new();
        for algorithm in ["dijkstra", "a-star", "bidirectional", "bidirectional-a-star"] {
            let mut body = grid_body();
            body["algorithm"] = json!(algorithm);
            let response = server.post("/api/v1/route").json(&body).await;
            response.assert_status_ok();
            distances.push(response.json::<Value>()["total_distance"].as_f64().unwrap());
        }
        for distance in &distances[1..] {
            assert!((distance - distances[0]).abs() <= distances[0] * 1e-9);
        }
    }

    #[tokio::test]
    async fn trace_is_included_on_request() {
        let mut body = grid_body();
        body["trace"] = json!(true);
        body["algorithm"] = json!("dijkstra");

        let response = server(test_state()).post("/api/v1/route").json(&body).await;
        response.assert_status_ok();

        let body: Value = response.json();
        let steps = body["trace"].as_array().unwrap();
        assert_eq!(steps.len() as u64, body["visited"].as_u64().unwrap());
        assert_eq!(steps[0]["step"], 0);
    }

    #[tokio::test]
    async fn trace_on_a_large_grid_is_rejected() {
        let mut body = grid_body();
        body["density"] = json!(MAX_GRID_DENSITY);
        body["algorithm"] = json!("dijkstra");
        body["trace"] = json!(true);

        let response = server(test_state()).post("/api/v1/route").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let problem: ProblemDetails = response.json();
        assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
        assert!(problem.detail.unwrap().contains("'trace'"));
    }

    #[tokio::test]
    async fn trace_on_a_large_loaded_graph_is_rejected() {
        let (start, end) = grid_endpoints();
        let options = GraphBuildOptions {
            grid_density: 40,
            ..GraphBuildOptions::default()
        };
        let built = build_graph(start, end, BuildMode::Grid, &options).unwrap();
        let state = AppState::from_components(Some(built.graph), None);

        let body = json!({ "start": start, "end": end, "topology": "loaded", "trace": true });
        let response = server(state).post("/api/v1/route").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ProblemDetails>().type_uri,
            PROBLEM_INVALID_REQUEST
        );
    }

    #[tokio::test]
    async fn loaded_topology_uses_supplied_lengths() {
        let body = json!({
            "start": fixture_points::SOUTH_WEST,
            "end": fixture_points::NORTH_WEST,
            "topology": "loaded",
            "algorithm": "dijkstra",
        });
        let response = server(test_state()).post("/api/v1/route").json(&body).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["unit"], "meters");
        assert_eq!(body["total_distance"], 500.0);
        assert_eq!(body["hops"], 1);
        // endpoints plus one shape point
        assert_eq!(body["path"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn distinct_endpoints_moves_the_goal() {
        let body = json!({
            "start": fixture_points::NORTH_EAST,
            "end": fixture_points::NORTH_EAST,
            "topology": "loaded",
            "distinct_endpoints": true,
        });
        let response = server(test_state()).post("/api/v1/route").json(&body).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_ne!(body["start"]["node"], body["end"]["node"]);
        assert!(body["hops"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn unreachable_node_is_route_not_found() {
        let body = json!({
            "start": fixture_points::SOUTH_WEST,
            "end": fixture_points::ISLAND,
            "topology": "loaded",
        });
        let response = server(test_state()).post("/api/v1/route").json(&body).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let problem: ProblemDetails = response.json();
        assert_eq!(problem.type_uri, PROBLEM_ROUTE_NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_coordinate_echoes_request_id() {
        let body = json!({
            "start": { "lat": 91.0, "lng": 0.0 },
            "end": { "lat": 0.0, "lng": 0.0 },
        });
        let response = server(test_state())
            .post("/api/v1/route")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-42"),
            )
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let problem: ProblemDetails = response.json();
        assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
        assert_eq!(problem.instance.as_deref(), Some("req-42"));
        assert!(problem.detail.unwrap().contains("'start'"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_problem_document() {
        let response = server(test_state())
            .post("/api/v1/route")
            .json(&json!({ "start": "north" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ProblemDetails>().type_uri,
            PROBLEM_INVALID_REQUEST
        );
    }

    #[tokio::test]
    async fn loaded_topology_needs_a_graph() {
        let (start, end) = grid_endpoints();
        let body = json!({ "start": start, "end": end, "topology": "loaded" });
        let response = server(AppState::from_components(None, None))
            .post("/api/v1/route")
            .json(&body)
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<ProblemDetails>().type_uri,
            PROBLEM_SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn expansion_cap_reports_no_route() {
        let response = server(AppState::from_components(None, Some(1)))
            .post("/api/v1/route")
            .json(&grid_body())
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_probes_are_mounted() {
        let server = server(test_state());
        server.get("/health/live").await.assert_status_ok();

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        let status: HealthStatus = ready.json();
        assert_eq!(status.graph_loaded, Some(true));
        assert_eq!(status.graph_nodes, Some(5));
    }
}
