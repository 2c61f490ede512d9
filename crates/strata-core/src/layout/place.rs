//! Row assignment within layers.
//!
//! Layers are filled left to right, each layer in priority order: nodes with
//! more critical predecessors first, then more critical successors, then by
//! name. Hubs therefore claim the rows their inputs point at.
//!
//! Each layer keeps a set of taken rows. A node prefers the mean row of its
//! placed critical predecessors, probes outward (+0, −1, +1, −2, +2, …) for
//! a free row, then takes that row plus one row of clearance on either side.
//! The row is also reserved in every layer its critical edges pass through,
//! so edges get a straight lane.

#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::view::{MapNodeView, MapView};
use crate::map::{Map, NodeId};

/// Assign `(x, y)` to every node of `map` and build the view.
pub(crate) fn assign(map: &mut Map) -> MapView {
    let nlayer = map.nlayer();
    let mut layers: Vec<Vec<NodeId>> = vec![Vec::new(); nlayer];
    for id in map.ids() {
        layers[map.node(id).layer()].push(id);
    }

    let mut taken: Vec<HashSet<i64>> = vec![HashSet::new(); nlayer];
    let mut rows: Vec<Option<i64>> = vec![None; map.len()];

    for (x, members) in layers.iter_mut().enumerate() {
        members.sort_by_key(|&id| {
            let node = map.node(id);
            (
                Reverse(node.crit_ins().count()),
                Reverse(node.crit_outs().count()),
                id,
            )
        });

        for &id in members.iter() {
            let node = map.node(id);
            let preferred = preferred_row(node.crit_ins().filter_map(|p| rows[p.index()]));
            let y = snap(&taken[x], probe(&taken[x], preferred));

            taken[x].extend([y - 1, y, y + 1]);
            if let Some(far) = node.crit_outs().map(|out| map.node(out).layer()).max() {
                for lane in taken.iter_mut().take(far).skip(x + 1) {
                    lane.insert(y);
                }
            }

            trace!(node = node.name(), x, y, preferred, "placed");
            rows[id.index()] = Some(y);
        }
    }

    normalize(map, &rows)
}

/// Mean of the predecessor rows with halves rounded up, or 0.
fn preferred_row<I: Iterator<Item = i64>>(rows: I) -> i64 {
    let (sum, count) = rows.fold((0i64, 0i64), |(s, c), y| (s + y, c + 1));
    if count == 0 {
        return 0;
    }
    (2 * sum + count).div_euclid(2 * count)
}

/// First free row in the order `p, p-1, p+1, p-2, p+2, …`.
fn probe(taken: &HashSet<i64>, preferred: i64) -> i64 {
    if !taken.contains(&preferred) {
        return preferred;
    }
    let mut d = 1;
    loop {
        if !taken.contains(&(preferred - d)) {
            return preferred - d;
        }
        if !taken.contains(&(preferred + d)) {
            return preferred + d;
        }
        d += 1;
    }
}

/// Step away from a lone taken row on one side when the other side is open.
fn snap(taken: &HashSet<i64>, y: i64) -> i64 {
    let lone_below = taken.contains(&(y - 1)) && !taken.contains(&(y - 2));
    let lone_above = taken.contains(&(y + 1)) && !taken.contains(&(y + 2));

    if lone_below && !lone_above && !taken.contains(&(y + 1)) {
        y + 1
    } else if lone_above && !lone_below && !taken.contains(&(y - 1)) {
        y - 1
    } else {
        y
    }
}

/// Shift rows so the smallest is 0, store positions on the map, and build
/// the view.
fn normalize(map: &mut Map, rows: &[Option<i64>]) -> MapView {
    let min = rows.iter().flatten().copied().min().unwrap_or(0);
    let max = rows.iter().flatten().copied().max();

    let mut nodes = BTreeMap::new();
    for id in map.ids().collect::<Vec<_>>() {
        let y = rows[id.index()].map_or(0, |y| (y - min) as usize);
        let x = map.node(id).layer();
        map.nodes[id.index()].pos = Some((x, y));

        let node = map.node(id);
        nodes.insert(
            node.name().to_string(),
            MapNodeView {
                name: node.name().to_string(),
                x,
                y,
                crit_ins: map.names(node.crit_ins()).into_iter().map(str::to_string).collect(),
                crit_outs: map.names(node.crit_outs()).into_iter().map(str::to_string).collect(),
            },
        );
    }

    MapView {
        width: map.nlayer(),
        height: max.map_or(0, |max| (max - min) as usize + 1),
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_row_rounds_halves_up() {
        assert_eq!(preferred_row(std::iter::empty()), 0);
        assert_eq!(preferred_row([2, 3].into_iter()), 3);
        assert_eq!(preferred_row([-2, -1].into_iter()), -1);
        assert_eq!(preferred_row([0, 4, 5].into_iter()), 3);
    }

    #[test]
    fn probe_alternates_outward() {
        let taken: HashSet<i64> = [4, 5, 3].into_iter().collect();
        assert_eq!(probe(&taken, 4), 2);
        assert_eq!(probe(&taken, 7), 7);
        let taken: HashSet<i64> = [0, -1].into_iter().collect();
        assert_eq!(probe(&taken, 0), 1);
    }

    #[test]
    fn snap_moves_off_lone_row() {
        // Row 4 is a lone lane reservation; 6 is open so step to it.
        let taken: HashSet<i64> = [4].into_iter().collect();
        assert_eq!(snap(&taken, 5), 6);
        // Lone rows on both sides: stay.
        let taken: HashSet<i64> = [4, 6].into_iter().collect();
        assert_eq!(snap(&taken, 5), 5);
        // Row below is part of a block, not lone: stay.
        let taken: HashSet<i64> = [3, 4].into_iter().collect();
        assert_eq!(snap(&taken, 5), 5);
        // Mirror image.
        let taken: HashSet<i64> = [6].into_iter().collect();
        assert_eq!(snap(&taken, 5), 4);
    }
}
