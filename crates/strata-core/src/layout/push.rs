//! Push-tight layer compaction.
//!
//! ASAP layering packs every node as early as possible, which leaves long
//! critical edges behind nodes whose dependents sit far below them. This pass
//! walks nodes sink-first and pulls each one a layer later while that is both
//! *able* and *worthy*:
//!
//! - **able**: every critical successor either already has room (it sits more
//!   than one layer below) or can itself be pushed, recursively, without
//!   leaving the layer range;
//! - **worthy**: some critical successor sits more than one layer below, so
//!   the push shortens at least one slack edge.
//!
//! A push moves the node together with every adjacent critical successor
//! chain that had to move, all by one layer. Precedence is preserved: an
//! edge spanning exactly one layer is always critical, so it is always part
//! of the pushed chain.

use std::collections::BTreeSet;

use tracing::{debug, instrument, trace};

use crate::error::{Error, Result};
use crate::map::{Map, NodeId};

/// Compact layers in place. Returns the number of pushes performed.
///
/// # Errors
///
/// Returns [`Error::Internal`] if a push would leave the layer range, which
/// cannot happen on a map built by [`Map::new`].
#[instrument(skip(map), fields(nodes = map.len(), nlayer = map.nlayer()))]
pub(crate) fn push_tight(map: &mut Map) -> Result<usize> {
    let nlayer = map.nlayer();
    let mut order = map.sorted_ids();
    order.reverse();

    let mut pushes = 0;
    for id in order {
        while worthy(map, id) {
            let mut chain = BTreeSet::new();
            if !able(map, id, nlayer, &mut chain) {
                break;
            }
            for moved in &chain {
                let node = &mut map.nodes[moved.index()];
                node.layer += 1;
                if node.layer >= nlayer {
                    return Err(Error::Internal(format!(
                        "push-tight moved {:?} to layer {} of {nlayer}",
                        node.name(),
                        node.layer
                    )));
                }
            }
            trace!(node = map.name(id), moved = chain.len(), "pushed");
            pushes += 1;
        }
    }

    debug!(pushes, "push-tight done");
    Ok(pushes)
}

fn worthy(map: &Map, id: NodeId) -> bool {
    let node = map.node(id);
    node.crit_outs()
        .any(|out| map.node(out).layer() > node.layer() + 1)
}

/// Collects into `chain` every node that must move with `id`.
fn able(map: &Map, id: NodeId, nlayer: usize, chain: &mut BTreeSet<NodeId>) -> bool {
    if !chain.insert(id) {
        return true;
    }
    let node = map.node(id);
    if node.layer() + 1 >= nlayer {
        return false;
    }
    node.crit_outs().all(|out| {
        map.node(out).layer() > node.layer() + 1 || able(map, out, nlayer, chain)
    })
}
