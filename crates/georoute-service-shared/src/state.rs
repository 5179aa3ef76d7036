//! Application state shared by axum handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use georoute_lib::{load_graph_source, Error as LibError, RoadGraph};

/// Environment variable naming the road network preloaded for `topology: "loaded"`.
pub const GRAPH_PATH_ENV: &str = "GEOROUTE_GRAPH_PATH";

/// Environment variable capping node expansions per request.
pub const MAX_EXPANSIONS_ENV: &str = "GEOROUTE_MAX_EXPANSIONS";

/// Error during application state initialization.
#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("graph file not found: {}", .0.display())]
    GraphNotFound(PathBuf),

    #[error("failed to load graph from {}: {source}", path.display())]
    GraphLoad {
        path: PathBuf,
        #[source]
        source: LibError,
    },

    #[error("GEOROUTE_MAX_EXPANSIONS must be a positive integer, got '{0}'")]
    InvalidMaxExpansions(String),
}

/// Shared, cheaply cloneable state.
///
/// ```ignore
/// use axum::{routing::post, Router};
/// use georoute_service_shared::AppState;
///
/// let state = AppState::from_env()?;
/// let app = Router::new()
///     .route("/api/v1/route", post(route_handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    graph: Option<Arc<RoadGraph>>,
    max_expansions: Option<usize>,
}

impl AppState {
    /// Read [`GRAPH_PATH_ENV`] and [`MAX_EXPANSIONS_ENV`].
    ///
    /// Without a graph path the service still answers generated topologies.
    pub fn from_env() -> Result<Self, AppStateError> {
        let max_expansions = match std::env::var(MAX_EXPANSIONS_ENV) {
            Ok(raw) => Some(parse_max_expansions(&raw)?),
            Err(_) => None,
        };

        match std::env::var_os(GRAPH_PATH_ENV) {
            Some(path) => Self::load(path, max_expansions),
            None => {
                tracing::info!("no GEOROUTE_GRAPH_PATH set, loaded topology disabled");
                Ok(Self::from_components(None, max_expansions))
            }
        }
    }

    /// Load the road network at `graph_path`.
    pub fn load(
        graph_path: impl AsRef<Path>,
        max_expansions: Option<usize>,
    ) -> Result<Self, AppStateError> {
        let path = graph_path.as_ref();
        if !path.exists() {
            return Err(AppStateError::GraphNotFound(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), "loading road graph");
        let graph = load_graph_source(path).map_err(|source| AppStateError::GraphLoad {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "road graph loaded"
        );

        Ok(Self::from_components(Some(graph), max_expansions))
    }

    /// State from already built parts.
    pub fn from_components(graph: Option<RoadGraph>, max_expansions: Option<usize>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                graph: graph.map(Arc::new),
                max_expansions,
            }),
        }
    }

    /// The preloaded road network, if any.
    pub fn graph(&self) -> Option<Arc<RoadGraph>> {
        self.inner.graph.clone()
    }

    pub fn has_graph(&self) -> bool {
        self.inner.graph.is_some()
    }

    pub fn max_expansions(&self) -> Option<usize> {
        self.inner.max_expansions
    }
}

fn parse_max_expansions(raw: &str) -> Result<usize, AppStateError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppStateError::InvalidMaxExpansions(raw.to_string())),
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("graph_nodes", &self.inner.graph.as_ref().map(|g| g.len()))
            .field("max_expansions", &self.inner.max_expansions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SQUARE: &str = r#"{
        "nodes": [
            {"id": 10, "lat": 0.0, "lng": 0.0},
            {"id": 11, "lat": 0.0, "lng": 0.01},
            {"id": 12, "lat": 0.01, "lng": 0.01}
        ],
        "edges": [
            {"from": 10, "to": 11},
            {"from": 11, "to": 12}
        ]
    }"#;

    #[test]
    fn from_components_without_graph() {
        let state = AppState::from_components(None, Some(100));
        assert!(!state.has_graph());
        assert!(state.graph().is_none());
        assert_eq!(state.max_expansions(), Some(100));
    }

    #[test]
    fn clones_share_the_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.json");
        fs::write(&path, SQUARE).unwrap();

        let state = AppState::load(&path, None).unwrap();
        let copy = state.clone();
        let (a, b) = (state.graph().unwrap(), copy.graph().unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 3);
        assert!(format!("{state:?}").contains("graph_nodes: Some(3)"));
    }

    #[test]
    fn missing_graph_file_is_reported() {
        let err = AppState::load("/nonexistent/georoute/graph.json", None).unwrap_err();
        assert!(matches!(err, AppStateError::GraphNotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn malformed_graph_file_keeps_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AppState::load(&path, None).unwrap_err();
        assert!(matches!(err, AppStateError::GraphLoad { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn max_expansions_must_be_positive() {
        assert_eq!(parse_max_expansions(" 250 ").unwrap(), 250);
        assert!(parse_max_expansions("0").is_err());
        assert!(parse_max_expansions("lots").is_err());
    }
}
