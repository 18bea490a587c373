use std::collections::{BTreeMap, BTreeSet};

use crate::{EdgeData, Graph, NodeData, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Brute-force pairing above this many regions is logged as a performance concern.
const BRUTE_FORCE_WARN_REGIONS: usize = 100;

/// A convex polygon region of a navigation mesh.
pub trait ConvexRegion {
    fn vertices(&self) -> &[Vec3];

    /// Defaults to the average of the vertices.
    fn centroid(&self) -> Vec3 {
        let verts = self.vertices();
        if verts.is_empty() {
            return Vec3::ZERO;
        }
        let sum = verts.iter().fold(Vec3::ZERO, |acc, v| acc + *v);
        sum / verts.len() as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    pub vertices: Vec<Vec3>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::new(vec![a, b, c])
    }
}

impl ConvexRegion for Polygon {
    fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavMeshOptions {
    /// Infer adjacency from shared vertices. Disable to supply edges separately.
    pub connect_neighbors: bool,
    /// Per-axis tolerance for treating two vertices as the same point.
    pub epsilon: f32,
    /// Weight for every adjacency edge; centroid distance when `None`.
    pub edge_weight: Option<f32>,
}

impl Default for NavMeshOptions {
    fn default() -> Self {
        Self {
            connect_neighbors: true,
            epsilon: 0.001,
            edge_weight: None,
        }
    }
}

/// Finds pairs of adjacent regions (`i < j`), in ascending order.
pub trait AdjacencyStrategy {
    fn adjacent_pairs<R: ConvexRegion>(&self, regions: &[R], epsilon: f32) -> Vec<(usize, usize)>;
}

/// Compares every pair of regions. O(n^2 * v^2).
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceAdjacency;

impl AdjacencyStrategy for BruteForceAdjacency {
    fn adjacent_pairs<R: ConvexRegion>(&self, regions: &[R], epsilon: f32) -> Vec<(usize, usize)> {
        if regions.len() > BRUTE_FORCE_WARN_REGIONS {
            tracing::warn!(
                regions = regions.len(),
                "brute-force navmesh adjacency is quadratic; consider SpatialHashAdjacency"
            );
        }

        let mut pairs = Vec::new();
        for i in 0..regions.len() {
            for j in (i + 1)..regions.len() {
                if shares_edge(regions[i].vertices(), regions[j].vertices(), epsilon) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// Buckets vertices into a uniform spatial hash and only tests regions that share a bucket
/// neighbourhood. Produces the same pairs as [`BruteForceAdjacency`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialHashAdjacency {
    pub cell_size: f32,
}

impl Default for SpatialHashAdjacency {
    fn default() -> Self {
        Self { cell_size: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cell(i64, i64, i64);

impl SpatialHashAdjacency {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    fn cell_of(&self, p: Vec3, cell_size: f32) -> Cell {
        Cell(
            (p.x / cell_size).floor() as i64,
            (p.y / cell_size).floor() as i64,
            (p.z / cell_size).floor() as i64,
        )
    }
}

impl AdjacencyStrategy for SpatialHashAdjacency {
    fn adjacent_pairs<R: ConvexRegion>(&self, regions: &[R], epsilon: f32) -> Vec<(usize, usize)> {
        // Cells at least as wide as the tolerance keep matching vertices in adjacent cells.
        let cell_size = self.cell_size.max(epsilon).max(1e-3);

        let mut buckets: BTreeMap<Cell, Vec<usize>> = BTreeMap::new();
        for (idx, region) in regions.iter().enumerate() {
            for v in region.vertices() {
                let bucket = buckets.entry(self.cell_of(*v, cell_size)).or_default();
                if bucket.last() != Some(&idx) {
                    bucket.push(idx);
                }
            }
        }

        let mut candidates: BTreeSet<(usize, usize)> = BTreeSet::new();
        for (idx, region) in regions.iter().enumerate() {
            for v in region.vertices() {
                let Cell(cx, cy, cz) = self.cell_of(*v, cell_size);
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            // Float-to-int casts saturate, so neighbours of extreme cells must too.
                            let cell = Cell(
                                cx.saturating_add(dx),
                                cy.saturating_add(dy),
                                cz.saturating_add(dz),
                            );
                            let Some(bucket) = buckets.get(&cell) else {
                                continue;
                            };
                            candidates.extend(
                                bucket.iter().copied().filter(|&o| o > idx).map(|o| (idx, o)),
                            );
                        }
                    }
                }
            }
        }

        candidates
            .into_iter()
            .filter(|&(i, j)| shares_edge(regions[i].vertices(), regions[j].vertices(), epsilon))
            .collect()
    }
}

/// Two regions are adjacent when at least two vertices of `a` match distinct vertices of `b`.
fn shares_edge(a: &[Vec3], b: &[Vec3], epsilon: f32) -> bool {
    let mut used = vec![false; b.len()];
    let mut shared = 0;
    for va in a {
        let hit = (0..b.len()).find(|&k| !used[k] && va.approx_eq(b[k], epsilon));
        if let Some(k) = hit {
            used[k] = true;
            shared += 1;
            if shared >= 2 {
                return true;
            }
        }
    }
    false
}

/// Node id assigned to the region at `index`.
pub fn region_node_id(index: usize) -> String {
    format!("region_{index}")
}

/// Build a graph with one node per region (at its centroid) and bidirectional edges between
/// regions sharing an edge, using [`BruteForceAdjacency`].
pub fn from_navmesh<R: ConvexRegion>(regions: &[R], options: NavMeshOptions) -> Graph<String> {
    from_navmesh_with(regions, options, &BruteForceAdjacency)
}

pub fn from_navmesh_with<R, S>(regions: &[R], options: NavMeshOptions, strategy: &S) -> Graph<String>
where
    R: ConvexRegion,
    S: AdjacencyStrategy,
{
    let mut graph = Graph::new();
    let mut centroids = Vec::with_capacity(regions.len());
    for (idx, region) in regions.iter().enumerate() {
        let centroid = region.centroid();
        centroids.push(centroid);
        graph.add_node(region_node_id(idx), NodeData::at(centroid));
    }

    if options.connect_neighbors {
        let epsilon = options.epsilon.max(0.0);
        for (i, j) in strategy.adjacent_pairs(regions, epsilon) {
            let edge = EdgeData {
                weight: match options.edge_weight {
                    Some(w) => w.max(0.0),
                    None => centroids[i].distance(centroids[j]),
                },
                bidirectional: true,
            };
            let (a, b) = (region_node_id(i), region_node_id(j));
            graph.connect(&a, &b, edge);
            graph.connect(&b, &a, edge);
        }
    }

    tracing::debug!(
        regions = regions.len(),
        edges = graph.edge_count(),
        connect_neighbors = options.connect_neighbors,
        "navmesh graph built"
    );
    graph
}
