mod common;

use common::{coord, write_graph_file};
use georoute_lib::{
    build_graph, load_graph_source, route, BoundingBox, BuildMode, ErrorKind, GraphBuildOptions,
    GraphDirection, GraphProvider, JsonFileProvider, NodeKind, RouteAlgorithm, RouteRequest,
    DEFAULT_REGION_PADDING,
};

const CITY_BLOCK: &str = r#"{
    "unit": "meters",
    "nodes": [
        {"id": 9001, "lat": 37.5000, "lng": 127.0000},
        {"id": 9002, "lat": 37.5000, "lng": 127.0010},
        {"id": 9003, "lat": 37.5010, "lng": 127.0010},
        {"id": 9004, "lat": 37.5010, "lng": 127.0000},
        {"id": 9100, "lat": 37.9000, "lng": 127.9000}
    ],
    "edges": [
        {"from": 9001, "to": 9002},
        {"from": 9002, "to": 9003},
        {"from": 9003, "to": 9004, "length": 400.0},
        {"from": 9004, "to": 9001, "length": 500.0,
         "geometry": [{"lat": 37.5005, "lng": 126.9995}]},
        {"from": 9003, "to": 9100}
    ]
}"#;

#[test]
fn build_graph_dispatches_on_mode() {
    let start = coord(37.55, 126.97);
    let end = coord(37.60, 127.05);
    let options = GraphBuildOptions::default();

    let synthetic = build_graph(start, end, BuildMode::Synthetic, &options).expect("synthetic");
    assert_eq!(synthetic.graph.len(), options.waypoints + 2);
    assert_eq!(synthetic.graph.node(synthetic.goal).map(|n| n.kind), Some(NodeKind::End));

    let grid = build_graph(start, end, BuildMode::Grid, &options).expect("grid");
    assert_eq!(grid.graph.len(), options.grid_density * options.grid_density);
    assert_eq!(grid.graph.coordinate(grid.goal), Some(end));
}

#[test]
fn loaded_graph_routes_with_supplied_lengths() {
    let (_dir, path) = write_graph_file(CITY_BLOCK);
    let graph = load_graph_source(&path).expect("graph loads");
    assert_eq!(graph.len(), 5);
    assert_eq!(graph.direction(), GraphDirection::Undirected);

    let request = RouteRequest::new(coord(37.5000, 127.0000), coord(37.5010, 127.0000))
        .with_algorithm(RouteAlgorithm::Bidirectional);
    let plan = route(&graph, &request).expect("route");
    // the supplied 500 m edge beats the ~88 m + ~111 m + 400 m detour
    assert_eq!(plan.path.nodes, vec![0, 3]);
    assert_eq!(plan.total_cost(), 500.0);

    let geometry = plan.path.expanded_geometry(&graph);
    assert_eq!(geometry.len(), 3);
    assert_eq!(geometry[1], coord(37.5005, 126.9995));
}

#[test]
fn provider_clips_to_the_padded_region() {
    let (_dir, path) = write_graph_file(CITY_BLOCK);
    let provider = JsonFileProvider::new(&path);
    let region = BoundingBox::around(
        &coord(37.5000, 127.0000),
        &coord(37.5010, 127.0010),
        DEFAULT_REGION_PADDING,
    );

    let graph = provider.load(&region).expect("region loads");
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert!(graph.nodes().iter().all(|node| node.external_id != Some(9100)));
}

#[test]
fn directed_sources_keep_one_way_edges() {
    let text = r#"{
        "directed": true,
        "nodes": [
            {"id": 1, "lat": 0.0, "lng": 0.0},
            {"id": 2, "lat": 0.0, "lng": 0.001}
        ],
        "edges": [{"from": 1, "to": 2}]
    }"#;
    let (_dir, path) = write_graph_file(text);
    let graph = load_graph_source(&path).expect("graph loads");

    let forward = RouteRequest::dijkstra(coord(0.0, 0.0), coord(0.0, 0.001));
    assert!(route(&graph, &forward).is_ok());

    let backward = RouteRequest::dijkstra(coord(0.0, 0.001), coord(0.0, 0.0));
    assert_eq!(
        route(&graph, &backward).expect_err("one way").kind(),
        ErrorKind::NoPath
    );
}

#[test]
fn malformed_sources_are_internal_errors() {
    let (_dir, path) = write_graph_file(r#"{"nodes": [{"id": 1, "lat": 0.0}]}"#);
    let error = load_graph_source(&path).expect_err("missing lng");
    assert_eq!(error.kind(), ErrorKind::Internal);

    let missing = std::path::Path::new("/definitely/not/here.json");
    assert_eq!(
        load_graph_source(missing).expect_err("missing file").kind(),
        ErrorKind::Internal
    );
}
