#![cfg(feature = "serde")]

use ai_navgraph::{
    build_grid, find_path, grid_node_id, Graph, GridOptions, NavMeshOptions, PathResult,
    SmoothOptions,
};

#[test]
fn graph_roundtrips_via_serde() {
    let graph = build_grid(
        4,
        4,
        1.0,
        GridOptions {
            allow_diagonals: true,
            y_level: 2.0,
        },
    );

    let json = serde_json::to_string(&graph).expect("serialize graph");
    let graph2: Graph<String> = serde_json::from_str(&json).expect("deserialize graph");

    assert_eq!(graph.node_count(), graph2.node_count());
    assert_eq!(graph.edge_count(), graph2.edge_count());

    let from = grid_node_id(0, 0);
    let to = grid_node_id(3, 2);
    let path1 = find_path(&graph, &from, &to);
    let path2 = find_path(&graph2, &from, &to);
    assert_eq!(path1, path2);

    let json = serde_json::to_string(&path1).expect("serialize result");
    let back: PathResult<String> = serde_json::from_str(&json).expect("deserialize result");
    assert_eq!(back, path1);
}

#[test]
fn graph_with_dangling_edge_is_rejected() {
    let json = r#"{
        "nodes": [["a", {"position": null, "walkable": true, "cost": 1.0}]],
        "edges": [["a", "b", {"weight": 1.0, "bidirectional": false}]]
    }"#;

    let err = serde_json::from_str::<Graph<String>>(json).unwrap_err();
    assert!(err.to_string().contains("not a node"), "{err}");
}

#[test]
fn options_fill_missing_fields_with_defaults() {
    let smooth: SmoothOptions = serde_json::from_str(r#"{"iterations": 3}"#).expect("smooth");
    assert_eq!(smooth.iterations, 3);
    assert_eq!(smooth.strength, SmoothOptions::default().strength);
    assert!(smooth.preserve_endpoints);

    let mesh: NavMeshOptions = serde_json::from_str(r#"{"epsilon": 0.01}"#).expect("mesh");
    assert!(mesh.connect_neighbors);
    assert_eq!(mesh.edge_weight, None);
}
