use crate::{
    find_closest_node, simplify_path, smooth_path, Euclidean, Graph, NodeKey, Pathfinder,
    SearchPolicy, SmoothOptions, Vec3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    pub points: Vec<Vec3>,
    /// Sum of traversed edge weights between the snapped start and goal nodes.
    pub cost: f32,
}

impl NavPath {
    pub fn new(points: Vec<Vec3>, cost: f32) -> Self {
        Self { points, cost }
    }
}

/// Position-to-position navigation, as consumed by movement/steering code.
pub trait Navigator {
    fn find_path(&self, start: Vec3, goal: Vec3) -> Option<NavPath>;

    /// Project a point onto the nearest navigable location.
    ///
    /// Backends that don't support projection may return `None`.
    fn nearest_point(&self, _point: Vec3) -> Option<Vec3> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigatorOptions {
    pub oriented: bool,
    /// Simplify the waypoint list with this tolerance before smoothing.
    pub simplify_epsilon: Option<f32>,
    pub smoothing: Option<SmoothOptions>,
}

/// [`Navigator`] over a [`Graph`]: snaps endpoints to the closest nodes, searches, then
/// post-processes the waypoints.
#[derive(Debug)]
pub struct GraphNavigator<'g, K, P = Euclidean> {
    graph: &'g Graph<K>,
    policy: P,
    options: NavigatorOptions,
}

impl<'g, K: NodeKey> GraphNavigator<'g, K, Euclidean> {
    pub fn new(graph: &'g Graph<K>, options: NavigatorOptions) -> Self {
        Self::with_policy(graph, Euclidean, options)
    }
}

impl<'g, K: NodeKey, P: SearchPolicy> GraphNavigator<'g, K, P> {
    pub fn with_policy(graph: &'g Graph<K>, policy: P, options: NavigatorOptions) -> Self {
        Self {
            graph,
            policy,
            options,
        }
    }

    pub fn options(&self) -> &NavigatorOptions {
        &self.options
    }
}

impl<K: NodeKey, P: SearchPolicy> Navigator for GraphNavigator<'_, K, P> {
    fn find_path(&self, start: Vec3, goal: Vec3) -> Option<NavPath> {
        let from = find_closest_node(self.graph, start)?;
        let to = find_closest_node(self.graph, goal)?;

        let result = Pathfinder::with_policy(self.graph, &self.policy)
            .oriented(self.options.oriented)
            .find(from, to);
        if !result.found {
            return None;
        }

        // Preserve exact endpoints for nicer movement.
        let inner_len = result.positions.len().saturating_sub(2);
        let mut points = Vec::with_capacity(inner_len + 2);
        points.push(start);
        points.extend(result.positions.iter().skip(1).take(inner_len).copied());
        points.push(goal);

        if let Some(epsilon) = self.options.simplify_epsilon {
            points = simplify_path(&points, epsilon);
        }
        if let Some(smoothing) = self.options.smoothing {
            points = smooth_path(&points, smoothing);
        }

        Some(NavPath::new(points, result.cost))
    }

    fn nearest_point(&self, point: Vec3) -> Option<Vec3> {
        let id = find_closest_node(self.graph, point)?;
        self.graph.get_node(id)?.position()
    }
}
