//! Transitive closure and transitive reduction over a layered map.
//!
//! # Closure
//!
//! Nodes are visited in layer order, so by the time a node is visited every
//! one of its ancestors has already pushed its ancestor set forward. For each
//! direct edge `from → to`:
//!
//! - `all_ins(to) ∪= all_ins(from) ∪ {from}`
//! - every `a ∈ all_ins(from) ∪ {from}` gains `to` in `all_outs(a)`
//!
//! One forward pass converges to exact reachability, O(n·e) in the worst
//! case.
//!
//! # Reduction
//!
//! An edge `from → to` is redundant if another direct successor `via` of
//! `from` already reaches `to`. Any longer path from `from` to `to` leaves
//! `from` through such a successor, so this matches the "some reachable
//! `via` reaches `to`" definition while only scanning direct successors.
//! The remaining edges are the critical edges.

use tracing::trace;

use super::{Map, NodeId};

impl Map {
    /// Fill `all_ins` / `all_outs`. Requires layers.
    pub(super) fn build_alls(&mut self) {
        for from in self.sorted_ids() {
            let mut ancestors = self.nodes[from.0].all_ins.clone();
            ancestors.insert(from.0);
            let outs: Vec<NodeId> = self.nodes[from.0].outs.iter().copied().collect();

            for to in outs {
                self.nodes[to.0].all_ins.union_with(&ancestors);
                for a in ancestors.ones() {
                    self.nodes[a].all_outs.insert(to.0);
                }
            }
        }
    }

    /// Fill `crit_ins` / `crit_outs` and count `ncrit`. Requires closure.
    pub(super) fn build_crits(&mut self) {
        let mut crit: Vec<(NodeId, NodeId)> = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            for &to in &node.outs {
                let redundant = node
                    .outs
                    .iter()
                    .any(|&via| via != to && self.nodes[via.0].all_outs.contains(to.0));
                if redundant {
                    trace!(from = %node.name, to = %self.nodes[to.0].name, "redundant edge");
                } else {
                    crit.push((NodeId(i), to));
                }
            }
        }

        self.ncrit = crit.len();
        for (from, to) in crit {
            self.nodes[from.0].crit_outs.insert(to);
            self.nodes[to.0].crit_ins.insert(from);
        }
    }
}
