//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Probe response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"ok"`; a process that cannot answer is not live.
    pub status: String,

    pub service: String,

    pub version: String,

    /// Whether a road network is preloaded for `topology: "loaded"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_loaded: Option<bool>,

    /// Node count of the preloaded road network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_nodes: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            graph_loaded: None,
            graph_nodes: None,
        }
    }

    /// Readiness for `state`; generated topologies need no preloaded graph.
    pub fn ready(service: &str, version: &str, state: &AppState) -> Self {
        let graph = state.graph();
        Self {
            graph_loaded: Some(graph.is_some()),
            graph_nodes: graph.map(|graph| graph.len()),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health/live`
///
/// ```text
/// {"status":"ok","service":"georoute-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`
///
/// ```text
/// {"status":"ok","service":"georoute-service-shared","version":"0.1.0","graph_loaded":true,"graph_nodes":1204}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus::ready(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &state);
    (StatusCode::OK, Json(status))
}
