//! Post-processing for waypoint lists: corner-cutting smoothing and
//! Ramer-Douglas-Peucker simplification.

use crate::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothOptions {
    pub iterations: u32,
    /// Cut position along each segment, clamped to `[0, 1]`.
    pub strength: f32,
    /// Keep the original first and last points exactly.
    pub preserve_endpoints: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            strength: 0.25,
            preserve_endpoints: true,
        }
    }
}

/// Chaikin-style corner cutting.
///
/// Each pass replaces every segment `(p0, p1)` with the points at `strength` and
/// `1 - strength` along it, so the point count roughly doubles per iteration. Inputs with
/// fewer than three points are returned unchanged.
pub fn smooth_path(points: &[Vec3], options: SmoothOptions) -> Vec<Vec3> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let strength = options.strength.clamp(0.0, 1.0);
    let mut current = points.to_vec();

    for _ in 0..options.iterations {
        let last_segment = current.len() - 2;
        let mut next = Vec::with_capacity(current.len() * 2);
        if options.preserve_endpoints {
            next.push(current[0]);
        }

        for (i, w) in current.windows(2).enumerate() {
            let (p0, p1) = (w[0], w[1]);
            if !(options.preserve_endpoints && i == 0) {
                next.push(p0.lerp(p1, strength));
            }
            if !(options.preserve_endpoints && i == last_segment) {
                next.push(p0.lerp(p1, 1.0 - strength));
            }
        }

        if options.preserve_endpoints {
            next.push(current[current.len() - 1]);
        }
        current = next;
    }

    current
}

/// Ramer-Douglas-Peucker simplification in 3D.
///
/// Drops every point within `epsilon` of the chord of the span it belongs to. Negative
/// tolerances are treated as `0`. Uses an explicit stack, so long nearly-straight inputs do
/// not deepen the call stack.
pub fn simplify_path(points: &[Vec3], epsilon: f32) -> Vec<Vec3> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let epsilon = epsilon.max(0.0);
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (a, b) = (points[start], points[end]);
        let mut max_dist = 0.0f32;
        let mut max_idx = start;
        for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = distance_to_line(*p, a, b);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }

        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((max_idx, end));
            stack.push((start, max_idx));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn distance_to_line(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return p.distance(a);
    }
    (p - a).cross(ab).length() / len
}

/// Total length of the polyline through `points`.
pub fn path_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
