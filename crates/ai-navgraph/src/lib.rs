//! Navigation graph primitives: a node/edge store, A* search with pluggable policies,
//! navmesh and grid graph builders, and path post-processing.
//!
//! Typical flow:
//!
//! ```
//! use ai_navgraph::{build_grid, find_path, simplify_path, GridOptions};
//!
//! let graph = build_grid(3, 3, 1.0, GridOptions::default());
//! let result = find_path(&graph, &"0_0".to_string(), &"2_2".to_string());
//! assert!(result.found);
//!
//! let waypoints = simplify_path(&result.positions, 0.01);
//! assert!(waypoints.len() <= result.positions.len());
//! ```
//!
//! Not-found outcomes (unknown ids, unreachable goals, empty graphs) are ordinary return
//! values. [`NavGraphError`] is reserved for malformed graph edits.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod graph;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod navigator;
pub mod path;
pub mod pathfinder;
pub mod policy;
pub mod query;

pub use graph::{EdgeData, EdgeOptions, Graph, GraphNode, NodeData, NodeKey};
pub use grid::{build_grid, grid_node_id, GridOptions};
pub use math::Vec3;
pub use mesh::{
    from_navmesh, from_navmesh_with, region_node_id, AdjacencyStrategy, BruteForceAdjacency,
    ConvexRegion, NavMeshOptions, Polygon, SpatialHashAdjacency,
};
pub use navigator::{GraphNavigator, NavPath, Navigator, NavigatorOptions};
pub use path::{path_length, simplify_path, smooth_path, SmoothOptions};
pub use pathfinder::{find_path, find_path_dijkstra, PathResult, Pathfinder};
pub use policy::{Dijkstra, Euclidean, FnPolicy, SearchPolicy, Terrain};
pub use query::find_closest_node;

use thiserror::Error;

/// Errors raised by graph edits that would break the graph's invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavGraphError {
    #[error("Edge endpoint {id} is not a node in the graph")]
    UnknownNode { id: String },

    #[error("Edge weight must be finite and non-negative, got {weight}")]
    InvalidWeight { weight: f32 },
}

pub type Result<T> = std::result::Result<T, NavGraphError>;
