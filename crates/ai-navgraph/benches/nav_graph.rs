use ai_navgraph::{
    build_grid, from_navmesh, from_navmesh_with, grid_node_id, simplify_path, smooth_path,
    GridOptions, NavMeshOptions, Pathfinder, Polygon, SmoothOptions, SpatialHashAdjacency, Vec3,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn triangle_strip(width: usize, height: usize, cell: f32) -> Vec<Polygon> {
    let mut tris = Vec::with_capacity(width * height * 2);
    for z in 0..height {
        for x in 0..width {
            let x0 = x as f32 * cell;
            let z0 = z as f32 * cell;
            let x1 = (x + 1) as f32 * cell;
            let z1 = (z + 1) as f32 * cell;

            tris.push(Polygon::triangle(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x1, 0.0, z0),
                Vec3::new(x1, 0.0, z1),
            ));
            tris.push(Polygon::triangle(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x1, 0.0, z1),
                Vec3::new(x0, 0.0, z1),
            ));
        }
    }
    tris
}

fn bench_grid_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("ai-navgraph/grid_search");

    for &size in &[32u32, 64u32] {
        let graph = build_grid(
            size,
            size,
            1.0,
            GridOptions {
                allow_diagonals: true,
                y_level: 0.0,
            },
        );
        let from = grid_node_id(0, 0);
        let to = grid_node_id(size - 1, size - 1);

        group.bench_with_input(BenchmarkId::new("find_reuse", size), &size, |b, _| {
            let mut finder = Pathfinder::new(&graph);
            b.iter(|| {
                let result = finder.find(&from, &to);
                black_box(result.node_count);
            })
        });
    }

    group.finish();
}

fn bench_navmesh_adjacency(c: &mut Criterion) {
    let regions = triangle_strip(12, 12, 1.0);
    let options = NavMeshOptions::default();

    let mut group = c.benchmark_group("ai-navgraph/navmesh_adjacency");
    group.bench_function("brute_force", |b| {
        b.iter(|| black_box(from_navmesh(&regions, options).edge_count()))
    });
    group.bench_function("spatial_hash", |b| {
        let strategy = SpatialHashAdjacency::new(1.0);
        b.iter(|| black_box(from_navmesh_with(&regions, options, &strategy).edge_count()))
    });
    group.finish();
}

fn bench_post_process(c: &mut Criterion) {
    let points: Vec<Vec3> = (0..2_000)
        .map(|i| {
            let t = i as f32 * 0.05;
            Vec3::new(t, 0.0, (t * 0.3).sin() * 0.01)
        })
        .collect();

    let mut group = c.benchmark_group("ai-navgraph/post_process");
    group.bench_function("simplify", |b| {
        b.iter(|| black_box(simplify_path(&points, 0.05).len()))
    });
    group.bench_function("smooth", |b| {
        let short = &points[..64];
        b.iter(|| black_box(smooth_path(short, SmoothOptions::default()).len()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_grid_search,
    bench_navmesh_adjacency,
    bench_post_process
);
criterion_main!(benches);
