use crate::{Graph, NodeKey, Vec3};

/// Id of the positioned node nearest to `position`, by linear scan.
///
/// Returns `None` when no node carries a position. Nodes at a non-finite distance are skipped. Ties resolve to the smallest id.
pub fn find_closest_node<K: NodeKey>(graph: &Graph<K>, position: Vec3) -> Option<&K> {
    let mut best: Option<(f32, &K)> = None;
    for node in graph.nodes() {
        let Some(p) = node.position() else {
            continue;
        };
        let d2 = p.distance_squared(position);
        if !d2.is_finite() {
            continue;
        }
        match best {
            None => best = Some((d2, node.id())),
            Some((best_d2, _)) if d2 < best_d2 => best = Some((d2, node.id())),
            _ => {}
        }
    }
    best.map(|(_, id)| id)
}
