use core::f32::consts::SQRT_2;

use crate::{EdgeData, Graph, NodeData, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    /// Also connect the four diagonal neighbours (weight `cell_size * sqrt(2)`).
    pub allow_diagonals: bool,
    /// Height (`y`) shared by every node.
    pub y_level: f32,
}

/// Node id of the cell at `(x, z)`.
pub fn grid_node_id(x: u32, z: u32) -> String {
    format!("{x}_{z}")
}

/// Build a `width x height` grid graph with nodes at `(x * cell_size, y_level, z * cell_size)`.
///
/// Orthogonal neighbours are joined by bidirectional edges of weight `cell_size`.
pub fn build_grid(width: u32, height: u32, cell_size: f32, options: GridOptions) -> Graph<String> {
    let mut graph = Graph::new();

    for z in 0..height {
        for x in 0..width {
            let position = Vec3::new(x as f32 * cell_size, options.y_level, z as f32 * cell_size);
            graph.add_node(grid_node_id(x, z), NodeData::at(position));
        }
    }

    let straight = EdgeData {
        weight: cell_size,
        bidirectional: true,
    };
    let diagonal = EdgeData {
        weight: cell_size * SQRT_2,
        bidirectional: true,
    };

    for z in 0..height {
        for x in 0..width {
            if x + 1 < width {
                link(&mut graph, (x, z), (x + 1, z), straight);
            }
            if z + 1 < height {
                link(&mut graph, (x, z), (x, z + 1), straight);
            }
            if options.allow_diagonals && z + 1 < height {
                // Forward diagonals only; the mirrored halves cover the other two.
                if x + 1 < width {
                    link(&mut graph, (x, z), (x + 1, z + 1), diagonal);
                }
                if x > 0 {
                    link(&mut graph, (x, z), (x - 1, z + 1), diagonal);
                }
            }
        }
    }

    tracing::debug!(
        width,
        height,
        cell_size,
        diagonals = options.allow_diagonals,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "grid graph built"
    );
    graph
}

fn link(graph: &mut Graph<String>, a: (u32, u32), b: (u32, u32), edge: EdgeData) {
    let (a, b) = (grid_node_id(a.0, a.1), grid_node_id(b.0, b.1));
    graph.connect(&a, &b, edge);
    graph.connect(&b, &a, edge);
}
