//! Success payloads.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use georoute_lib::{
    Coordinate, DistanceUnit, PathSegment, RoadGraph, RouteAlgorithm, RouteEndpoint, RoutePlan,
    RouteSummary, StepTrace,
};

/// Successful body with its content type, mirroring [`crate::ProblemDetails`].
///
/// The payload's fields are flattened into the top-level object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Route computed for `POST /api/v1/route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub algorithm: RouteAlgorithm,
    pub unit: DistanceUnit,
    pub start: RouteEndpoint,
    pub end: RouteEndpoint,
    pub total_distance: f64,
    pub hops: usize,
    /// Nodes expanded by the search.
    pub visited: usize,
    /// Shape points, with edge geometry spliced in.
    pub path: Vec<Coordinate>,
    pub segments: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<StepTrace>,
}

impl RouteResponse {
    /// Build the response, moving the trace out of `plan`.
    pub fn from_plan(graph: &RoadGraph, mut plan: RoutePlan) -> georoute_lib::Result<Self> {
        let summary = RouteSummary::from_plan(graph, &plan)?;
        Ok(Self {
            algorithm: summary.algorithm,
            unit: summary.unit,
            start: summary.start,
            end: summary.goal,
            total_distance: summary.total_distance,
            hops: summary.hops,
            visited: summary.visited,
            path: summary.path,
            segments: summary.segments,
            trace: plan.trace.take(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georoute_lib::{build_grid_graph, route, GraphBuildOptions, RouteRequest};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Payload {
        value: i32,
    }

    #[test]
    fn payload_fields_are_flattened() {
        let json = serde_json::to_string(&ServiceResponse::new(Payload { value: 42 })).unwrap();
        assert_eq!(json, r#"{"value":42,"content_type":"application/json"}"#);

        let back: ServiceResponse<Payload> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, Payload { value: 42 });
    }

    fn plan(with_trace: bool) -> (RoadGraph, RoutePlan) {
        let start = Coordinate { lat: 0.0, lng: 0.0 };
        let end = Coordinate { lat: 0.02, lng: 0.02 };
        let options = GraphBuildOptions {
            grid_density: 3,
            ..GraphBuildOptions::default()
        };
        let built = build_grid_graph(start, end, &options).unwrap();
        let request = RouteRequest::new(start, end).with_trace(with_trace);
        let plan = route(&built.graph, &request).unwrap();
        (built.graph, plan)
    }

    #[test]
    fn route_response_summarises_plan() {
        let (graph, plan) = plan(false);
        let response = RouteResponse::from_plan(&graph, plan).unwrap();

        assert_eq!(response.algorithm, RouteAlgorithm::AStar);
        assert_eq!(response.unit, DistanceUnit::Kilometers);
        // corner to corner along the diagonal
        assert_eq!(response.hops, 2);
        assert_eq!(response.segments.len(), 2);
        assert!(response.trace.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("trace").is_none());
    }

    #[test]
    fn route_response_keeps_trace_when_recorded() {
        let (graph, plan) = plan(true);
        let visited = plan.visited;
        let response = RouteResponse::from_plan(&graph, plan).unwrap();
        assert_eq!(response.trace.map(|trace| trace.len()), Some(visited));
    }
}
