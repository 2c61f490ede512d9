//! Layout output handed to renderers.

use std::collections::BTreeMap;

use serde::Serialize;

/// A laid-out map: one column per layer, rows assigned by the layout.
///
/// Every node satisfies `x < width` and `y < height`, and no two nodes share
/// a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapView {
    pub width: usize,
    pub height: usize,
    pub nodes: BTreeMap<String, MapNodeView>,
}

/// Position and critical edges of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapNodeView {
    pub name: String,
    pub x: usize,
    pub y: usize,
    /// Sorted names of critical predecessors.
    pub crit_ins: Vec<String>,
    /// Sorted names of critical successors.
    pub crit_outs: Vec<String>,
}

impl MapView {
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&MapNodeView> {
        self.nodes.get(name)
    }

    /// The node occupying cell `(x, y)`, if any.
    #[must_use]
    pub fn at(&self, x: usize, y: usize) -> Option<&MapNodeView> {
        self.nodes.values().find(|n| n.x == x && n.y == y)
    }

    /// Mirror the view horizontally and flip edge direction.
    ///
    /// Rows are untouched; no layout is recomputed.
    pub fn reverse(&mut self) {
        for node in self.nodes.values_mut() {
            node.x = self.width - 1 - node.x;
            std::mem::swap(&mut node.crit_ins, &mut node.crit_outs);
        }
    }
}
