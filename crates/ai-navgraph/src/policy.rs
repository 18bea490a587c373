use crate::{EdgeData, NodeData};

/// Cost model for [`crate::Pathfinder`].
///
/// Search optimality requires `distance` to be non-negative and `heuristic` to never
/// overestimate the remaining cost (admissible).
pub trait SearchPolicy {
    /// Lower-bound estimate of the cost from `from` to the goal `to`.
    ///
    /// Defaults to the Euclidean distance, or `0` when either node has no position.
    fn heuristic(&self, from: &NodeData, to: &NodeData) -> f32 {
        euclidean(from, to)
    }

    /// Cost of traversing `edge` from `from` to `to`. Defaults to the edge weight.
    fn distance(&self, _from: &NodeData, _to: &NodeData, edge: &EdgeData) -> f32 {
        edge.weight
    }

    /// Exclude `node` from expansion when reached from `from`.
    ///
    /// Never called for the start node.
    fn blocked(&self, _node: &NodeData, _from: &NodeData) -> bool {
        false
    }
}

impl<P: SearchPolicy + ?Sized> SearchPolicy for &P {
    fn heuristic(&self, from: &NodeData, to: &NodeData) -> f32 {
        (**self).heuristic(from, to)
    }

    fn distance(&self, from: &NodeData, to: &NodeData, edge: &EdgeData) -> f32 {
        (**self).distance(from, to, edge)
    }

    fn blocked(&self, node: &NodeData, from: &NodeData) -> bool {
        (**self).blocked(node, from)
    }
}

fn euclidean(from: &NodeData, to: &NodeData) -> f32 {
    match (from.position, to.position) {
        (Some(a), Some(b)) => a.distance(b),
        _ => 0.0,
    }
}

/// A* with a straight-line heuristic and edge weights as costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl SearchPolicy for Euclidean {}

/// Uniform-cost search: zero heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl SearchPolicy for Dijkstra {
    fn heuristic(&self, _from: &NodeData, _to: &NodeData) -> f32 {
        0.0
    }
}

/// Reads per-node terrain data: non-walkable nodes are blocked and edge weights are scaled
/// by the destination's `cost`.
///
/// The Euclidean heuristic stays admissible as long as every `cost >= 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terrain;

impl SearchPolicy for Terrain {
    fn distance(&self, _from: &NodeData, to: &NodeData, edge: &EdgeData) -> f32 {
        edge.weight * to.cost.max(0.0)
    }

    fn blocked(&self, node: &NodeData, _from: &NodeData) -> bool {
        !node.walkable
    }
}

type HeuristicFn = dyn Fn(&NodeData, &NodeData) -> f32;
type DistanceFn = dyn Fn(&NodeData, &NodeData, &EdgeData) -> f32;
type BlockedFn = dyn Fn(&NodeData, &NodeData) -> bool;

/// Closure-backed policy; each function falls back to the trait default when unset.
///
/// ```
/// use ai_navgraph::FnPolicy;
///
/// let policy = FnPolicy::new()
///     .heuristic(|_, _| 0.0)
///     .blocked(|node, _| !node.walkable);
/// # let _ = policy;
/// ```
#[derive(Default)]
pub struct FnPolicy {
    heuristic: Option<Box<HeuristicFn>>,
    distance: Option<Box<DistanceFn>>,
    blocked: Option<Box<BlockedFn>>,
}

impl FnPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heuristic(mut self, f: impl Fn(&NodeData, &NodeData) -> f32 + 'static) -> Self {
        self.heuristic = Some(Box::new(f));
        self
    }

    pub fn distance(
        mut self,
        f: impl Fn(&NodeData, &NodeData, &EdgeData) -> f32 + 'static,
    ) -> Self {
        self.distance = Some(Box::new(f));
        self
    }

    pub fn blocked(mut self, f: impl Fn(&NodeData, &NodeData) -> bool + 'static) -> Self {
        self.blocked = Some(Box::new(f));
        self
    }
}

impl core::fmt::Debug for FnPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnPolicy")
            .field("heuristic", &self.heuristic.is_some())
            .field("distance", &self.distance.is_some())
            .field("blocked", &self.blocked.is_some())
            .finish()
    }
}

impl SearchPolicy for FnPolicy {
    fn heuristic(&self, from: &NodeData, to: &NodeData) -> f32 {
        match &self.heuristic {
            Some(f) => f(from, to),
            None => euclidean(from, to),
        }
    }

    fn distance(&self, from: &NodeData, to: &NodeData, edge: &EdgeData) -> f32 {
        match &self.distance {
            Some(f) => f(from, to, edge),
            None => edge.weight,
        }
    }

    fn blocked(&self, node: &NodeData, from: &NodeData) -> bool {
        self.blocked.as_ref().is_some_and(|f| f(node, from))
    }
}
