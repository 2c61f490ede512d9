//! Adjacency-list input graph and its structural transforms.
//!
//! # Overview
//!
//! A [`Graph`] maps every node name to the ordered list of names it points
//! at. An edge `A → B` means "A depends on B" or "A imports B", whatever the
//! driver chooses; the engine only cares about direction.
//!
//! The graph is a value: [`Graph::reverse`], [`Graph::remove`],
//! [`Graph::filter`] and [`Graph::rename`] all return a new graph and never
//! touch `self`. No validation happens here; dangling edge targets are
//! reported when a [`Map`](crate::map::Map) is built.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A directed graph keyed by node name.
///
/// Serializes as a plain JSON object: `{"a": ["b", "c"], "b": [], "c": []}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    nodes: BTreeMap<String, Vec<String>>,
}

impl Graph {
    /// Wrap a name → out-neighbors mapping.
    #[must_use]
    pub const fn new(nodes: BTreeMap<String, Vec<String>>) -> Self {
        Self { nodes }
    }

    /// Number of node keys.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of listed edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Node names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Out-neighbors of `name`, in the order they were given.
    #[must_use]
    pub fn outs(&self, name: &str) -> Option<&[String]> {
        self.nodes.get(name).map(Vec::as_slice)
    }

    /// `(name, outs)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Return the graph with every edge flipped.
    ///
    /// Every key of `self` stays a key of the result, even when nothing
    /// points at it. Neighbor lists of the result are sorted.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut nodes: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (from, outs) in &self.nodes {
            nodes.entry(from.clone()).or_default();
            for to in outs {
                nodes.entry(to.clone()).or_default().push(from.clone());
            }
        }
        for ins in nodes.values_mut() {
            ins.sort_unstable();
        }
        Self { nodes }
    }

    /// Return the graph without `name` and without any edge touching it.
    #[must_use]
    pub fn remove(&self, name: &str) -> Self {
        self.filter(|n| n != name)
    }

    /// Keep only nodes accepted by `keep`, and only edges whose endpoints are
    /// both kept.
    #[must_use]
    pub fn filter<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let kept: BTreeSet<&str> = self.names().filter(|&n| keep(n)).collect();
        let nodes = self
            .nodes
            .iter()
            .filter(|(name, _)| kept.contains(name.as_str()))
            .map(|(name, outs)| {
                let outs = outs
                    .iter()
                    .filter(|to| kept.contains(to.as_str()))
                    .cloned()
                    .collect();
                (name.clone(), outs)
            })
            .collect();
        Self { nodes }
    }

    /// Relabel every node and edge endpoint with `f`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `f` fails, when two nodes are
    /// renamed to the same name, or when a renamed edge target is not among
    /// the renamed keys.
    pub fn rename<F, E>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&str) -> std::result::Result<String, E>,
        E: Display,
    {
        let mut renamed: HashMap<&str, String> = HashMap::with_capacity(self.nodes.len());
        for name in self.nodes.keys() {
            let to = f(name)
                .map_err(|e| Error::InvalidArgument(format!("rename {name:?}: {e}")))?;
            renamed.insert(name.as_str(), to);
        }

        let mut nodes: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, outs) in &self.nodes {
            let mut new_outs = Vec::with_capacity(outs.len());
            for to in outs {
                let Some(new_to) = renamed.get(to.as_str()) else {
                    return Err(Error::InvalidArgument(format!(
                        "edge target {to:?} of {name:?} is not a node"
                    )));
                };
                new_outs.push(new_to.clone());
            }
            let new_name = renamed[name.as_str()].clone();
            if nodes.insert(new_name.clone(), new_outs).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "rename maps more than one node to {new_name:?}"
                )));
            }
        }
        Ok(Self { nodes })
    }

    /// Export to a petgraph [`DiGraph`] for use with petgraph algorithms.
    ///
    /// Edge targets missing from the key set are added as nodes. Duplicate
    /// edges are collapsed.
    #[must_use]
    pub fn to_digraph(&self) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::<String, ()>::with_capacity(self.nodes.len(), self.edge_count());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for name in self.nodes.keys() {
            let idx = graph.add_node(name.clone());
            node_map.insert(name.clone(), idx);
        }

        for (from, outs) in &self.nodes {
            let from_idx = node_map[from.as_str()];
            for to in outs {
                let to_idx = *node_map
                    .entry(to.clone())
                    .or_insert_with(|| graph.add_node(to.clone()));
                if !graph.contains_edge(from_idx, to_idx) {
                    graph.add_edge(from_idx, to_idx, ());
                }
            }
        }

        (graph, node_map)
    }
}

impl<K, V> FromIterator<(K, V)> for Graph
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let nodes = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
            .collect();
        Self { nodes }
    }
}

impl From<BTreeMap<String, Vec<String>>> for Graph {
    fn from(nodes: BTreeMap<String, Vec<String>>) -> Self {
        Self::new(nodes)
    }
}

impl From<HashMap<String, Vec<String>>> for Graph {
    fn from(nodes: HashMap<String, Vec<String>>) -> Self {
        Self::new(nodes.into_iter().collect())
    }
}
