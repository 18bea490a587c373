use core::fmt::Debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::{NavGraphError, Result, Vec3};

#[cfg(feature = "serde")]
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Caller-chosen node identifier (string, integer, or any ordered key).
///
/// Ordering keeps iteration and search expansion deterministic across runs.
pub trait NodeKey: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> NodeKey for T {}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeData {
    pub position: Option<Vec3>,
    /// Not interpreted by the graph; read by policies such as [`crate::Terrain`].
    pub walkable: bool,
    /// Terrain multiplier for search weighting. Not interpreted by the graph.
    pub cost: f32,
}

impl Default for NodeData {
    fn default() -> Self {
        Self {
            position: None,
            walkable: true,
            cost: 1.0,
        }
    }
}

impl NodeData {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }
}

/// Data stored on a directed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeData {
    pub weight: f32,
    /// Set on both halves of an edge pair created with [`EdgeOptions::bidirectional`].
    pub bidirectional: bool,
}

/// Parameters for [`Graph::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeOptions {
    /// Explicit weight. When `None`, the Euclidean distance between the endpoints is used if
    /// both carry a position, else `1`.
    pub weight: Option<f32>,
    /// Also add the mirrored `to -> from` edge with the same weight.
    pub bidirectional: bool,
}

impl EdgeOptions {
    pub fn weighted(weight: f32) -> Self {
        Self {
            weight: Some(weight),
            bidirectional: false,
        }
    }

    pub fn bidirectional() -> Self {
        Self {
            weight: None,
            bidirectional: true,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode<K> {
    id: K,
    data: NodeData,
    links: BTreeMap<K, EdgeData>,
    incoming: BTreeSet<K>,
}

impl<K: NodeKey> GraphNode<K> {
    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn position(&self) -> Option<Vec3> {
        self.data.position
    }

    /// Outgoing edges in key order.
    pub fn links(&self) -> impl Iterator<Item = (&K, &EdgeData)> + '_ {
        self.links.iter()
    }

    /// Sources of incoming edges in key order.
    pub(crate) fn incoming(&self) -> impl Iterator<Item = &K> + '_ {
        self.incoming.iter()
    }

    /// Number of outgoing edges.
    pub fn degree(&self) -> usize {
        self.links.len()
    }
}

/// Mutable node/edge store keyed by caller-chosen ids.
///
/// Edges always reference existing nodes: [`Graph::add_edge`] rejects unknown endpoints and
/// [`Graph::remove_node`] drops every edge touching the removed node.
#[derive(Debug, Clone)]
pub struct Graph<K = String> {
    nodes: BTreeMap<K, GraphNode<K>>,
    edge_count: usize,
}

impl<K: NodeKey> Default for Graph<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> Graph<K> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edge_count: 0,
        }
    }

    /// Insert a node, or overwrite the data of an existing one. Existing edges are kept.
    pub fn add_node(&mut self, id: K, data: NodeData) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.data = data;
            return;
        }
        self.nodes.insert(
            id.clone(),
            GraphNode {
                id,
                data,
                links: BTreeMap::new(),
                incoming: BTreeSet::new(),
            },
        );
    }

    /// Add (or overwrite) the edge `from -> to`, plus `to -> from` when bidirectional.
    ///
    /// The mirrored edge reuses the same weight, so a bidirectional pair is always symmetric.
    /// Returns the data stored on the forward edge.
    pub fn add_edge(&mut self, from: &K, to: &K, options: EdgeOptions) -> Result<EdgeData> {
        let from_pos = self.endpoint(from)?.data.position;
        let to_pos = self.endpoint(to)?.data.position;

        let weight = match options.weight {
            Some(w) if !w.is_finite() || w < 0.0 => {
                return Err(NavGraphError::InvalidWeight { weight: w })
            }
            Some(w) => w,
            None => match (from_pos, to_pos) {
                (Some(a), Some(b)) => a.distance(b),
                _ => 1.0,
            },
        };

        let edge = EdgeData {
            weight,
            bidirectional: options.bidirectional,
        };
        self.connect(from, to, edge);
        if options.bidirectional {
            self.connect(to, from, edge);
        }
        Ok(edge)
    }

    /// Insert a directed edge between two nodes known to exist.
    pub(crate) fn connect(&mut self, from: &K, to: &K, edge: EdgeData) {
        debug_assert!(self.nodes.contains_key(from) && self.nodes.contains_key(to));
        let Some(source) = self.nodes.get_mut(from) else {
            return;
        };
        if source.links.insert(to.clone(), edge).is_none() {
            self.edge_count += 1;
        }
        if let Some(target) = self.nodes.get_mut(to) {
            target.incoming.insert(from.clone());
        }
    }

    fn endpoint(&self, id: &K) -> Result<&GraphNode<K>> {
        self.nodes.get(id).ok_or_else(|| NavGraphError::UnknownNode {
            id: format!("{id:?}"),
        })
    }

    /// Remove a node and every edge touching it. Unknown ids are ignored.
    pub fn remove_node(&mut self, id: &K) -> Option<NodeData> {
        let node = self.nodes.remove(id)?;

        for target in node.links.keys().filter(|t| *t != id) {
            if let Some(t) = self.nodes.get_mut(target) {
                t.incoming.remove(id);
            }
        }
        let mut removed = node.links.len();
        for source in node.incoming.iter().filter(|s| *s != id) {
            if let Some(s) = self.nodes.get_mut(source) {
                if s.links.remove(id).is_some() {
                    removed += 1;
                }
            }
        }

        self.edge_count -= removed;
        Some(node.data)
    }

    /// Remove the directed edge `from -> to` only. Missing edges are ignored.
    pub fn remove_edge(&mut self, from: &K, to: &K) -> Option<EdgeData> {
        let edge = self.nodes.get_mut(from)?.links.remove(to)?;
        if let Some(target) = self.nodes.get_mut(to) {
            target.incoming.remove(from);
        }
        self.edge_count -= 1;
        Some(edge)
    }

    pub fn has_node(&self, id: &K) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn has_edge(&self, from: &K, to: &K) -> bool {
        self.get_edge(from, to).is_some()
    }

    pub fn get_node(&self, id: &K) -> Option<&GraphNode<K>> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, from: &K, to: &K) -> Option<&EdgeData> {
        self.nodes.get(from)?.links.get(to)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode<K>> + '_ {
        self.nodes.values()
    }

    /// Every directed edge as `(from, to, data)`; a bidirectional pair appears twice.
    pub fn edges(&self) -> impl Iterator<Item = (&K, &K, &EdgeData)> + '_ {
        self.nodes
            .values()
            .flat_map(|node| node.links.iter().map(move |(to, e)| (&node.id, to, e)))
    }

    pub fn for_each_node(&self, mut visitor: impl FnMut(&GraphNode<K>)) {
        self.nodes().for_each(|node| visitor(node));
    }

    pub fn for_each_edge(&self, mut visitor: impl FnMut(&K, &K, &EdgeData)) {
        self.edges().for_each(|(from, to, e)| visitor(from, to, e));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edge_count = 0;
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct GraphSerde<K> {
    nodes: Vec<(K, NodeData)>,
    edges: Vec<(K, K, EdgeData)>,
}

#[cfg(feature = "serde")]
impl<K: NodeKey + Serialize> Serialize for Graph<K> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        GraphSerde {
            nodes: self.nodes().map(|n| (n.id.clone(), n.data)).collect(),
            edges: self
                .edges()
                .map(|(from, to, e)| (from.clone(), to.clone(), *e))
                .collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, K: NodeKey + Deserialize<'de>> Deserialize<'de> for Graph<K> {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = GraphSerde::<K>::deserialize(deserializer)?;
        let mut graph = Graph::new();
        for (id, node) in data.nodes {
            graph.add_node(id, node);
        }
        // Stored edges are already directed halves; mirrors are listed explicitly.
        for (from, to, edge) in data.edges {
            graph.endpoint(&from).map_err(D::Error::custom)?;
            graph.endpoint(&to).map_err(D::Error::custom)?;
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(D::Error::custom(NavGraphError::InvalidWeight {
                    weight: edge.weight,
                }));
            }
            graph.connect(&from, &to, edge);
        }
        Ok(graph)
    }
}
