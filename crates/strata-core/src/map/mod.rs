//! Validated, layered view of a [`Graph`].
//!
//! # Overview
//!
//! A [`Map`] is built once per graph snapshot. Building it:
//!
//! 1. links every edge, rejecting targets that are not nodes;
//! 2. assigns ASAP layers with Kahn's algorithm, reporting a
//!    minimum cycle when the graph is not a DAG;
//! 3. computes the full ancestor/descendant sets;
//! 4. keeps the *critical* edges, the transitive reduction of the direct
//!    edges.
//!
//! # Storage
//!
//! Nodes live in an arena (`Vec<MapNode>`) and refer to each other by
//! [`NodeId`]. Ids are handed out in name order, so every ordered id set
//! iterates in name order as well. Transitive sets are bitsets over ids.
//!
//! # Invariants
//!
//! For every edge `a → b`, `layer(a) < layer(b)`. Right after building,
//! `layer(b) = 1 + max(layer(p))` over direct predecessors `p`, and sources
//! sit on layer 0. [`Map::reverse`] and the layout's push-tight pass keep the
//! first invariant but not necessarily the second.

#![allow(clippy::module_name_repetitions)]

mod closure;
mod layers;
mod reach;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use crate::cycles::Adjacency;
use crate::error::{Error, Result};
use crate::graph::Graph;

// ---------------------------------------------------------------------------
// NodeId / MapNode
// ---------------------------------------------------------------------------

/// Arena index of a [`MapNode`] within its [`Map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One node of a [`Map`].
#[derive(Debug, Clone)]
pub struct MapNode {
    name: String,
    pub(crate) ins: BTreeSet<NodeId>,
    pub(crate) outs: BTreeSet<NodeId>,
    pub(crate) all_ins: FixedBitSet,
    pub(crate) all_outs: FixedBitSet,
    pub(crate) crit_ins: BTreeSet<NodeId>,
    pub(crate) crit_outs: BTreeSet<NodeId>,
    pub(crate) layer: usize,
    pub(crate) pos: Option<(usize, usize)>,
}

impl MapNode {
    fn new(name: String, n: usize) -> Self {
        Self {
            name,
            ins: BTreeSet::new(),
            outs: BTreeSet::new(),
            all_ins: FixedBitSet::with_capacity(n),
            all_outs: FixedBitSet::with_capacity(n),
            crit_ins: BTreeSet::new(),
            crit_outs: BTreeSet::new(),
            layer: 0,
            pos: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn layer(&self) -> usize {
        self.layer
    }

    /// Layout column, once the map has been laid out.
    #[must_use]
    pub fn x(&self) -> Option<usize> {
        self.pos.map(|(x, _)| x)
    }

    /// Layout row, once the map has been laid out.
    #[must_use]
    pub fn y(&self) -> Option<usize> {
        self.pos.map(|(_, y)| y)
    }

    /// Direct predecessors.
    pub fn ins(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ins.iter().copied()
    }

    /// Direct successors.
    pub fn outs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outs.iter().copied()
    }

    /// Every node that reaches this one.
    pub fn all_ins(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.all_ins.ones().map(NodeId)
    }

    /// Every node reachable from this one.
    pub fn all_outs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.all_outs.ones().map(NodeId)
    }

    /// Predecessors over non-redundant edges.
    pub fn crit_ins(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.crit_ins.iter().copied()
    }

    /// Successors over non-redundant edges.
    pub fn crit_outs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.crit_outs.iter().copied()
    }

    /// `true` if there is a path of length ≥ 1 from this node to `other`.
    #[must_use]
    pub fn reaches(&self, other: NodeId) -> bool {
        self.all_outs.contains(other.0)
    }

    fn swap_direction(&mut self, nlayer: usize) {
        std::mem::swap(&mut self.ins, &mut self.outs);
        std::mem::swap(&mut self.all_ins, &mut self.all_outs);
        std::mem::swap(&mut self.crit_ins, &mut self.crit_outs);
        self.layer = nlayer - 1 - self.layer;
        self.pos = self.pos.map(|(x, y)| (nlayer - 1 - x, y));
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Arena of [`MapNode`]s for one graph snapshot, plus edge and layer counts.
#[derive(Debug, Clone)]
pub struct Map {
    pub(crate) nodes: Vec<MapNode>,
    index: HashMap<String, NodeId>,
    nedge: usize,
    ncrit: usize,
    pub(crate) nlayer: usize,
}

impl Map {
    /// Build a map from `graph`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingNode`] if an edge targets a name that is not a key.
    /// - [`Error::Cycle`] with a minimum cycle if the graph is not a DAG.
    #[instrument(skip(graph), fields(nodes = graph.node_count()))]
    pub fn new(graph: &Graph) -> Result<Self> {
        let mut map = Self::init(graph)?;
        map.make_layers()?;
        map.build_alls();
        map.build_crits();

        debug!(
            nedge = map.nedge,
            ncrit = map.ncrit,
            nlayer = map.nlayer,
            "map built"
        );
        Ok(map)
    }

    /// Allocate nodes and link direct edges. Duplicate edges link once.
    fn init(graph: &Graph) -> Result<Self> {
        let n = graph.node_count();
        let mut nodes = Vec::with_capacity(n);
        let mut index = HashMap::with_capacity(n);
        for (i, name) in graph.names().enumerate() {
            nodes.push(MapNode::new(name.to_string(), n));
            index.insert(name.to_string(), NodeId(i));
        }

        let mut nedge = 0;
        for (from, outs) in graph.iter() {
            let from_id = index[from];
            for to in outs {
                let Some(&to_id) = index.get(to.as_str()) else {
                    return Err(Error::MissingNode {
                        node: to.clone(),
                        from: from.to_string(),
                    });
                };
                if nodes[from_id.0].outs.insert(to_id) {
                    nodes[to_id.0].ins.insert(from_id);
                    nedge += 1;
                }
            }
        }

        Ok(Self {
            nodes,
            index,
            nedge,
            ncrit: 0,
            nlayer: 0,
        })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct direct edges.
    #[must_use]
    pub const fn nedge(&self) -> usize {
        self.nedge
    }

    /// Number of critical (non-redundant) edges.
    #[must_use]
    pub const fn ncrit(&self) -> usize {
        self.ncrit
    }

    /// Number of layers: one more than the largest layer value.
    #[must_use]
    pub const fn nlayer(&self) -> usize {
        self.nlayer
    }

    /// Look up a node id by name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Look up a node by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MapNode> {
        self.id(name).map(|id| &self.nodes[id.0])
    }

    /// The node with `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another map with more nodes.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &MapNode {
        &self.nodes[id.0]
    }

    /// Name of the node with `id`.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Resolve ids to names, keeping the iteration order.
    pub fn names<I>(&self, ids: I) -> Vec<&str>
    where
        I: IntoIterator<Item = NodeId>,
    {
        ids.into_iter().map(|id| self.name(id)).collect()
    }

    /// All nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &MapNode> {
        self.nodes.iter()
    }

    /// All node ids in name order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Nodes ordered by layer, then by name.
    #[must_use]
    pub fn sorted_nodes(&self) -> Vec<&MapNode> {
        self.sorted_ids().into_iter().map(|id| self.node(id)).collect()
    }

    pub(crate) fn sorted_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.ids().collect();
        ids.sort_by_key(|id| (self.nodes[id.0].layer, *id));
        ids
    }

    /// Flip every edge in place.
    ///
    /// Swaps ins/outs, all_ins/all_outs and crit_ins/crit_outs on every node
    /// and mirrors layers (and layout columns) so that all invariants keep
    /// holding without recomputation. Applying it twice restores the map.
    pub fn reverse(&mut self) {
        let nlayer = self.nlayer;
        for node in &mut self.nodes {
            node.swap_direction(nlayer);
        }
    }

    /// The direct-edge graph this map describes.
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        self.nodes
            .iter()
            .map(|node| (node.name.clone(), self.names(node.outs())))
            .collect()
    }

    /// Layer of every node by name.
    #[must_use]
    pub fn layers(&self) -> BTreeMap<&str, usize> {
        self.nodes.iter().map(|n| (n.name(), n.layer)).collect()
    }
}

impl Adjacency for Map {
    fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(MapNode::name).collect()
    }

    fn out_names(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|node| self.names(node.outs()))
            .unwrap_or_default()
    }
}

/// Check that `graph` is a DAG whose edges all point at known nodes.
///
/// # Errors
///
/// Returns [`Error::MissingNode`] or [`Error::Cycle`]; the cycle error
/// formats as `graph has circle: a->b->c`.
pub fn check_dag(graph: &Graph) -> Result<()> {
    let mut map = Map::init(graph)?;
    map.make_layers()
}
