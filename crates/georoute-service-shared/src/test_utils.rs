//! Fixtures for handler tests.

use std::sync::OnceLock;

use georoute_lib::{Coordinate, GraphSource, RoadGraph};

use crate::state::AppState;

/// Road network used as the `loaded` topology in tests: a four-node block
/// (meters) plus one unconnected node.
pub const FIXTURE_GRAPH_JSON: &str = r#"{
    "unit": "meters",
    "nodes": [
        {"id": 1, "lat": 37.5000, "lng": 127.0000},
        {"id": 2, "lat": 37.5000, "lng": 127.0010},
        {"id": 3, "lat": 37.5010, "lng": 127.0010},
        {"id": 4, "lat": 37.5010, "lng": 127.0000},
        {"id": 5, "lat": 37.6000, "lng": 127.1000}
    ],
    "edges": [
        {"from": 1, "to": 2},
        {"from": 2, "to": 3},
        {"from": 3, "to": 4, "length": 400.0},
        {"from": 4, "to": 1, "length": 500.0,
         "geometry": [{"lat": 37.5005, "lng": 126.9995}]}
    ]
}"#;

/// Named points of [`FIXTURE_GRAPH_JSON`].
pub mod fixture_points {
    use georoute_lib::Coordinate;

    pub const SOUTH_WEST: Coordinate = Coordinate {
        lat: 37.5000,
        lng: 127.0000,
    };
    pub const NORTH_EAST: Coordinate = Coordinate {
        lat: 37.5010,
        lng: 127.0010,
    };
    pub const NORTH_WEST: Coordinate = Coordinate {
        lat: 37.5010,
        lng: 127.0000,
    };
    /// The unconnected node.
    pub const ISLAND: Coordinate = Coordinate {
        lat: 37.6000,
        lng: 127.1000,
    };
}

static FIXTURE_GRAPH: OnceLock<RoadGraph> = OnceLock::new();

/// The fixture road network.
///
/// # Panics
///
/// Panics if [`FIXTURE_GRAPH_JSON`] stops parsing, which is a test setup bug.
pub fn fixture_graph() -> RoadGraph {
    FIXTURE_GRAPH
        .get_or_init(|| {
            GraphSource::from_json(FIXTURE_GRAPH_JSON)
                .and_then(GraphSource::into_graph)
                .unwrap_or_else(|e| panic!("fixture graph is invalid: {e}"))
        })
        .clone()
}

/// State with the fixture graph preloaded and no expansion cap.
pub fn test_state() -> AppState {
    AppState::from_components(Some(fixture_graph()), None)
}

/// Coordinates that a generated grid spans in tests.
pub fn grid_endpoints() -> (Coordinate, Coordinate) {
    (
        Coordinate {
            lat: 37.55,
            lng: 126.97,
        },
        Coordinate {
            lat: 37.60,
            lng: 127.05,
        },
    )
}

/// Unique request id for tests.
pub fn test_request_id() -> String {
    format!("test-{}", crate::RequestId::generate())
}
