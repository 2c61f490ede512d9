//! ASAP layering with Kahn's algorithm.
//!
//! Sources form layer 0. Each round records the current frontier as a layer,
//! then counts hits on the frontier's successors; a successor joins the next
//! frontier once every one of its predecessors has been processed. Nodes that
//! are never reached sit on (or behind) a cycle.

use tracing::trace;

use super::{Map, NodeId};
use crate::cycles::find_cycle;
use crate::error::{Error, Result};

impl Map {
    /// Assign ASAP layers and set `nlayer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`] with a minimum cycle when some node cannot be
    /// layered.
    pub(super) fn make_layers(&mut self) -> Result<()> {
        let n = self.nodes.len();
        let in_degree: Vec<usize> = self.nodes.iter().map(|node| node.ins.len()).collect();
        let mut hits = vec![0usize; n];

        let mut frontier: Vec<NodeId> = self.ids().filter(|id| in_degree[id.0] == 0).collect();
        let mut layer = 0;
        let mut processed = 0;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &id in &frontier {
                self.nodes[id.0].layer = layer;
                processed += 1;
                for &out in &self.nodes[id.0].outs {
                    hits[out.0] += 1;
                    if hits[out.0] == in_degree[out.0] {
                        next.push(out);
                    }
                }
            }
            trace!(layer, width = frontier.len(), "layer assigned");
            next.sort_unstable();
            frontier = next;
            layer += 1;
        }

        if processed < n {
            let cycle = find_cycle(&*self).ok_or_else(|| {
                Error::Internal(format!(
                    "{} of {n} nodes could not be layered but no cycle was found",
                    n - processed
                ))
            })?;
            return Err(Error::Cycle { cycle });
        }

        self.nlayer = layer;
        Ok(())
    }
}
