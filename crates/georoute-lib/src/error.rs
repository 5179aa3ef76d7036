use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the georoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a coordinate is non-finite or outside the valid degree range.
    #[error("invalid coordinate ({lat}, {lng}): {reason}")]
    InvalidCoordinate {
        lat: f64,
        lng: f64,
        reason: &'static str,
    },

    /// Raised when routing is attempted on a graph without nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Raised when the exclusion set passed to the locator covers every node.
    #[error("no candidate node left after excluding {excluded} node(s)")]
    NearestNodeNotFound { excluded: usize },

    /// Raised when the search exhausted its frontier (or its limits) without
    /// reaching the goal.
    #[error("no path found between node {start} and node {goal}")]
    NoPath { start: NodeId, goal: NodeId },

    /// Raised when an operation references a node id the graph does not hold.
    #[error("unknown node id {id}")]
    UnknownNode { id: NodeId },

    /// Raised when externally supplied graph data cannot be ingested as-is.
    #[error("invalid graph data: {message}")]
    InvalidGraphData { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse classification used by callers to separate expected outcomes from faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range caller input.
    InvalidInput,
    /// The graph holds no nodes.
    EmptyGraph,
    /// Every node was excluded from snapping.
    NearestNodeNotFound,
    /// Search finished without a path; an expected outcome.
    NoPath,
    /// Anything else, propagated unchanged.
    Internal,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCoordinate { .. } => ErrorKind::InvalidInput,
            Error::EmptyGraph => ErrorKind::EmptyGraph,
            Error::NearestNodeNotFound { .. } => ErrorKind::NearestNodeNotFound,
            Error::NoPath { .. } => ErrorKind::NoPath,
            Error::UnknownNode { .. }
            | Error::InvalidGraphData { .. }
            | Error::Io(_)
            | Error::Json(_) => ErrorKind::Internal,
        }
    }

    /// `true` when the search simply found no route.
    pub fn is_no_path(&self) -> bool {
        self.kind() == ErrorKind::NoPath
    }

    pub(crate) fn invalid_graph(message: impl Into<String>) -> Self {
        Error::InvalidGraphData {
            message: message.into(),
        }
    }
}
