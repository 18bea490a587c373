use ai_navgraph::{
    build_grid, find_closest_node, find_path, find_path_dijkstra, from_navmesh, from_navmesh_with,
    grid_node_id, simplify_path, smooth_path, Dijkstra, EdgeOptions, Graph, GridOptions,
    NavMeshOptions, NodeData, Pathfinder, Polygon, SmoothOptions, SpatialHashAdjacency, Vec3,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -50.0f32..50.0
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

/// Random planar graph over `n` positioned nodes with distance-weighted edges.
fn random_graph() -> impl Strategy<Value = Graph<u32>> {
    (2usize..12)
        .prop_flat_map(|n| {
            (
                prop::collection::vec((coord(), coord()), n),
                prop::collection::vec((0..n as u32, 0..n as u32), 0..n * 3),
            )
        })
        .prop_map(|(points, links)| {
            let mut graph = Graph::new();
            for (i, (x, z)) in points.into_iter().enumerate() {
                graph.add_node(i as u32, NodeData::at(Vec3::new(x, 0.0, z)));
            }
            for (a, b) in links {
                let _ = graph.add_edge(&a, &b, EdgeOptions::bidirectional());
            }
            graph
        })
}

/// Random graph of one-way edges with arbitrary weights; a pair may carry both directions.
fn random_directed_graph() -> impl Strategy<Value = Graph<u32>> {
    (2usize..10)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((0..n as u32, 0..n as u32, 0.0f32..20.0), 0..n * 4),
            )
        })
        .prop_map(|(n, links)| {
            let mut graph = Graph::new();
            for i in 0..n as u32 {
                graph.add_node(i, NodeData::default());
            }
            for (a, b, w) in links {
                let _ = graph.add_edge(&a, &b, EdgeOptions::weighted(w));
            }
            graph
        })
}

/// Cheapest weight connecting `a` and `b` in either direction.
fn cheapest_link(graph: &Graph<u32>, a: u32, b: u32) -> Option<f32> {
    let forward = graph.get_edge(&a, &b).map(|e| e.weight);
    let backward = graph.get_edge(&b, &a).map(|e| e.weight);
    match (forward, backward) {
        (Some(f), Some(r)) => Some(f.min(r)),
        (f, r) => f.or(r),
    }
}

proptest! {
    #[test]
    fn grid_shape_matches_dimensions(w in 1u32..8, h in 1u32..8, cell in 0.1f32..5.0, diag in any::<bool>()) {
        let graph = build_grid(w, h, cell, GridOptions { allow_diagonals: diag, y_level: 0.0 });
        prop_assert_eq!(graph.node_count(), (w * h) as usize);

        let mut ok = true;
        graph.for_each_edge(|from, to, edge| {
            ok &= graph.get_edge(to, from) == Some(edge);
            let expected = graph
                .get_node(from)
                .and_then(|a| Some(a.position()?.distance(graph.get_node(to)?.position()?)))
                .unwrap_or(f32::NAN);
            ok &= (edge.weight - expected).abs() < 1e-4 * cell.max(1.0);
            ok &= edge.weight >= cell - 1e-6;
        });
        prop_assert!(ok);
    }

    #[test]
    fn found_paths_are_consistent(graph in random_graph(), a in 0u32..12, b in 0u32..12) {
        let result = find_path(&graph, &a, &b);
        if result.found {
            prop_assert_eq!(result.path.len(), result.node_count);
            prop_assert_eq!(result.positions.len(), result.node_count);
            prop_assert_eq!(result.path.first(), Some(&a));
            prop_assert_eq!(result.path.last(), Some(&b));

            let edge_sum: f32 = result
                .path
                .windows(2)
                .map(|w| graph.get_edge(&w[0], &w[1]).map(|e| e.weight).unwrap_or(f32::NAN))
                .sum();
            prop_assert!((result.cost - edge_sum).abs() < 1e-3);
        } else {
            prop_assert!(result.path.is_empty());
            prop_assert_eq!(result.cost, 0.0);
        }
    }

    #[test]
    fn dijkstra_and_astar_agree_on_cost(graph in random_graph(), a in 0u32..12, b in 0u32..12) {
        let astar = find_path(&graph, &a, &b);
        let dijkstra = find_path_dijkstra(&graph, &a, &b);
        prop_assert_eq!(astar.found, dijkstra.found);
        if astar.found {
            let tolerance = 1e-3 * astar.cost.max(1.0);
            prop_assert!((astar.cost - dijkstra.cost).abs() < tolerance);
        }
    }

    #[test]
    fn grid_paths_have_manhattan_cost(w in 2u32..7, h in 2u32..7, cell in 0.5f32..3.0) {
        let graph = build_grid(w, h, cell, GridOptions::default());
        let result = find_path(&graph, &grid_node_id(0, 0), &grid_node_id(w - 1, h - 1));
        prop_assert!(result.found);
        prop_assert_eq!(result.node_count, (w + h - 1) as usize);
        let expected = (w + h - 2) as f32 * cell;
        prop_assert!((result.cost - expected).abs() < 1e-3 * expected);
    }

    #[test]
    fn collinear_points_simplify_to_endpoints(
        start in point(),
        dir in point(),
        steps in prop::collection::vec(0u8..8, 1..10),
        epsilon in 0.0f32..2.0,
    ) {
        let dir = Vec3::new(dir.x.round(), dir.y.round(), dir.z.round());
        prop_assume!(dir.length() > 0.0);
        let start = Vec3::new(start.x.round(), start.y.round(), start.z.round());

        // Integer coordinates keep the cross products exact.
        let mut points = vec![start];
        let mut t = 0.0;
        for s in steps {
            t += s as f32 + 1.0;
            points.push(start + dir * t);
        }

        let simplified = simplify_path(&points, epsilon);
        prop_assert_eq!(simplified, vec![points[0], points[points.len() - 1]]);
    }

    #[test]
    fn simplification_keeps_endpoints_and_order(
        points in prop::collection::vec(point(), 0..30),
        epsilon in -1.0f32..5.0,
    ) {
        let simplified = simplify_path(&points, epsilon);
        prop_assert!(simplified.len() <= points.len());
        prop_assert_eq!(simplified.first(), points.first());
        prop_assert_eq!(simplified.last(), points.last());

        let mut cursor = points.iter();
        for p in &simplified {
            prop_assert!(cursor.any(|q| q == p));
        }
    }

    #[test]
    fn smoothing_preserves_endpoints(
        points in prop::collection::vec(point(), 3..8),
        iterations in 0u32..4,
        strength in 0.0f32..1.0,
    ) {
        let smoothed = smooth_path(
            &points,
            SmoothOptions { iterations, strength, preserve_endpoints: true },
        );
        prop_assert_eq!(smoothed.first(), points.first());
        prop_assert_eq!(smoothed.last(), points.last());
    }

    #[test]
    fn closest_node_is_minimal(graph in random_graph(), query in point()) {
        let closest = find_closest_node(&graph, query).expect("graph has positioned nodes");
        let best = graph
            .get_node(closest)
            .and_then(|n| n.position())
            .map(|p| p.distance(query))
            .unwrap_or(f32::INFINITY);

        for node in graph.nodes() {
            if let Some(p) = node.position() {
                prop_assert!(best <= p.distance(query) + 1e-4);
            }
        }
    }

    #[test]
    fn spatial_hash_matches_brute_force(
        w in 1usize..6,
        h in 1usize..6,
        jitter in 0.0f32..0.0009,
        cell in 0.2f32..3.0,
    ) {
        let mut regions = Vec::new();
        for z in 0..h {
            for x in 0..w {
                let (x0, z0) = (x as f32, z as f32);
                let (x1, z1) = (x0 + 1.0, z0 + 1.0);
                let j = if (x + z) % 2 == 0 { jitter } else { 0.0 };
                regions.push(Polygon::triangle(
                    Vec3::new(x0 + j, 0.0, z0),
                    Vec3::new(x1, 0.0, z0),
                    Vec3::new(x1, 0.0, z1 - j),
                ));
                regions.push(Polygon::triangle(
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x1, 0.0, z1),
                    Vec3::new(x0, 0.0, z1),
                ));
            }
        }

        let options = NavMeshOptions::default();
        let brute = from_navmesh(&regions, options);
        let hashed = from_navmesh_with(&regions, options, &SpatialHashAdjacency::new(cell));
        let brute_edges: Vec<_> = brute.edges().map(|(a, b, _)| (a.clone(), b.clone())).collect();
        let hashed_edges: Vec<_> = hashed.edges().map(|(a, b, _)| (a.clone(), b.clone())).collect();
        prop_assert_eq!(brute_edges, hashed_edges);
    }

    #[test]
    fn one_way_edges_report_walked_weights(graph in random_directed_graph(), a in 0u32..10, b in 0u32..10) {
        let unoriented = Pathfinder::with_policy(&graph, Dijkstra).find(&a, &b);
        if unoriented.found {
            let expected: f32 = unoriented
                .path
                .windows(2)
                .map(|w| cheapest_link(&graph, w[0], w[1]).unwrap_or(f32::NAN))
                .sum();
            prop_assert!((unoriented.cost - expected).abs() < 1e-3);
        }

        let oriented = Pathfinder::with_policy(&graph, Dijkstra).oriented(true).find(&a, &b);
        if oriented.found {
            let expected: f32 = oriented
                .path
                .windows(2)
                .map(|w| graph.get_edge(&w[0], &w[1]).map(|e| e.weight).unwrap_or(f32::NAN))
                .sum();
            prop_assert!((oriented.cost - expected).abs() < 1e-3);
            prop_assert!(unoriented.found);
            prop_assert!(unoriented.cost <= oriented.cost + 1e-3);
        }
    }
}
