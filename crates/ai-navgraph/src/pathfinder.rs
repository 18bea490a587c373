use core::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::{Dijkstra, EdgeData, Euclidean, Graph, GraphNode, NodeKey, SearchPolicy, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a search. `found == false` implies every other field is empty/zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult<K> {
    pub found: bool,
    /// Node ids from start to goal, inclusive.
    pub path: Vec<K>,
    /// Positions of the nodes in `path`; nodes without a position are skipped.
    pub positions: Vec<Vec3>,
    /// Sum of the weights of the traversed edges.
    pub cost: f32,
    pub node_count: usize,
}

impl<K> PathResult<K> {
    pub fn not_found() -> Self {
        Self {
            found: false,
            path: Vec::new(),
            positions: Vec::new(),
            cost: 0.0,
            node_count: 0,
        }
    }
}

#[derive(Debug)]
struct OpenNode<'g, K> {
    f: f32,
    g: f32,
    id: &'g K,
    tie: u64,
}

impl<K> PartialEq for OpenNode<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for OpenNode<'_, K> {}

impl<K> PartialOrd for OpenNode<'_, K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for OpenNode<'_, K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        // Equal f pops in insertion order.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

#[derive(Debug)]
struct Visit<'g, K> {
    g: f32,
    parent: Option<&'g K>,
    /// Weight of the edge walked from `parent`.
    step: f32,
}

/// Reusable scratch buffers, kept per pathfinder so queries never share state.
#[derive(Debug)]
struct SearchScratch<'g, K> {
    open: BinaryHeap<OpenNode<'g, K>>,
    visits: BTreeMap<&'g K, Visit<'g, K>>,
}

impl<K> Default for SearchScratch<'_, K> {
    fn default() -> Self {
        Self {
            open: BinaryHeap::new(),
            visits: BTreeMap::new(),
        }
    }
}

/// A* search over a borrowed [`Graph`].
///
/// The graph is re-read on every [`Pathfinder::find`]; holding the borrow means it cannot be
/// mutated while the pathfinder is alive.
///
/// Edge weights (and policy distances) must be non-negative for the result to be optimal.
#[derive(Debug)]
pub struct Pathfinder<'g, K, P = Euclidean> {
    graph: &'g Graph<K>,
    policy: P,
    oriented: bool,
    scratch: SearchScratch<'g, K>,
}

impl<'g, K: NodeKey> Pathfinder<'g, K, Euclidean> {
    pub fn new(graph: &'g Graph<K>) -> Self {
        Self::with_policy(graph, Euclidean)
    }
}

impl<'g, K: NodeKey, P: SearchPolicy> Pathfinder<'g, K, P> {
    pub fn with_policy(graph: &'g Graph<K>, policy: P) -> Self {
        Self {
            graph,
            policy,
            oriented: false,
            scratch: SearchScratch::default(),
        }
    }

    /// Treat edges as strictly directed. When `false` (default) an edge `a -> b` can also be
    /// walked from `b` to `a`.
    pub fn oriented(mut self, oriented: bool) -> Self {
        self.oriented = oriented;
        self
    }

    pub fn graph(&self) -> &'g Graph<K> {
        self.graph
    }

    pub fn find(&mut self, from: &K, to: &K) -> PathResult<K> {
        let graph = self.graph;
        let (Some(start), Some(goal)) = (graph.get_node(from), graph.get_node(to)) else {
            tracing::trace!(?from, ?to, "endpoint missing from graph");
            return PathResult::not_found();
        };

        let Some((ids, steps, expanded)) = self.search(start, goal) else {
            tracing::debug!(?from, ?to, found = false, "no path");
            return PathResult::not_found();
        };

        let result = self.build_result(&ids, &steps);
        tracing::debug!(
            ?from,
            ?to,
            found = true,
            expanded,
            nodes = result.node_count,
            cost = result.cost,
            "path found"
        );
        result
    }

    fn search(
        &mut self,
        start: &'g GraphNode<K>,
        goal: &'g GraphNode<K>,
    ) -> Option<(Vec<&'g K>, Vec<f32>, usize)> {
        let Self {
            graph,
            policy,
            oriented,
            scratch,
        } = self;
        let graph: &'g Graph<K> = *graph;
        let SearchScratch { open, visits } = scratch;
        open.clear();
        visits.clear();

        visits.insert(
            start.id(),
            Visit {
                g: 0.0,
                parent: None,
                step: 0.0,
            },
        );
        open.push(OpenNode {
            f: policy.heuristic(start.data(), goal.data()),
            g: 0.0,
            id: start.id(),
            tie: 0,
        });
        let mut tie: u64 = 1;
        let mut expanded = 0usize;

        while let Some(node) = open.pop() {
            if visits.get(node.id).map(|v| v.g) != Some(node.g) {
                // Stale heap entry.
                continue;
            }
            expanded += 1;

            if node.id == goal.id() {
                let mut out = vec![node.id];
                let mut steps = Vec::new();
                let mut current = node.id;
                while let Some(visit) = visits.get(current) {
                    let Some(prev) = visit.parent else {
                        break;
                    };
                    steps.push(visit.step);
                    current = prev;
                    out.push(current);
                }
                out.reverse();
                steps.reverse();
                return Some((out, steps, expanded));
            }

            let Some(current) = graph.get_node(node.id) else {
                continue;
            };

            for (neighbor_id, edge) in neighbors(graph, current, *oriented) {
                let Some(neighbor) = graph.get_node(neighbor_id) else {
                    continue;
                };
                if policy.blocked(neighbor.data(), current.data()) {
                    continue;
                }

                let tentative_g = node.g + policy.distance(current.data(), neighbor.data(), edge);
                if visits
                    .get(neighbor_id)
                    .is_some_and(|v| tentative_g >= v.g)
                {
                    continue;
                }

                visits.insert(
                    neighbor_id,
                    Visit {
                        g: tentative_g,
                        parent: Some(current.id()),
                        step: edge.weight,
                    },
                );
                open.push(OpenNode {
                    f: tentative_g + policy.heuristic(neighbor.data(), goal.data()),
                    g: tentative_g,
                    id: neighbor_id,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }

    /// `steps[i]` is the weight of the edge walked from `ids[i]` to `ids[i + 1]`.
    fn build_result(&self, ids: &[&'g K], steps: &[f32]) -> PathResult<K> {
        let graph = self.graph;
        let positions = ids
            .iter()
            .filter_map(|id| graph.get_node(id).and_then(|n| n.position()))
            .collect();
        let cost = steps.iter().sum::<f32>();

        PathResult {
            found: true,
            path: ids.iter().map(|id| (*id).clone()).collect(),
            positions,
            cost,
            node_count: ids.len(),
        }
    }
}

/// Edges leaving `node`, plus reversed incoming edges when the search is not oriented.
fn neighbors<'g, K: NodeKey>(
    graph: &'g Graph<K>,
    node: &'g GraphNode<K>,
    oriented: bool,
) -> impl Iterator<Item = (&'g K, &'g EdgeData)> + 'g {
    let reversed = (!oriented)
        .then(|| {
            node.incoming().filter_map(move |source| {
                graph
                    .get_edge(source, node.id())
                    .map(|edge| (source, edge))
            })
        })
        .into_iter()
        .flatten();
    node.links().chain(reversed)
}

/// A* from `from` to `to` with the default Euclidean policy.
pub fn find_path<K: NodeKey>(graph: &Graph<K>, from: &K, to: &K) -> PathResult<K> {
    Pathfinder::new(graph).find(from, to)
}

/// Uniform-cost search (A* with a zero heuristic).
pub fn find_path_dijkstra<K: NodeKey>(graph: &Graph<K>, from: &K, to: &K) -> PathResult<K> {
    Pathfinder::with_policy(graph, Dijkstra).find(from, to)
}
