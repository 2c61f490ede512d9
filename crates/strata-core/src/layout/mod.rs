//! Layered 2-D layout of a [`Map`].
//!
//! # Stages
//!
//! ```text
//! ASAP layers (Map::new)
//!        ↓  push::push_tight()     pull nodes toward their critical successors
//!        ↓  place::assign()        pick a free row per node, reserve edge lanes
//!        ↓  normalize              smallest row becomes 0
//! MapView
//! ```
//!
//! Every stage is deterministic: the same graph always yields the same view.
//! The layout is a heuristic; it neither minimizes area nor edge length.

mod place;
mod push;
mod view;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::map::Map;

pub use view::{MapNodeView, MapView};

/// Which way edges point in the finished layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Nodes as early as their predecessors allow.
    #[default]
    Forward,
    /// Nodes as late as their successors allow. See [`rev_layout`].
    Reverse,
}

/// Per-call layout settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    pub direction: Direction,
}

/// Lay out `map`, compacting its layers in place.
///
/// # Errors
///
/// Returns [`Error::Internal`](crate::Error::Internal) only if the map's
/// layer invariants were broken before the call.
#[instrument(skip(map), fields(nodes = map.len()))]
pub fn layout_map(map: &mut Map) -> Result<MapView> {
    push::push_tight(map)?;
    let view = place::assign(map);
    debug!(width = view.width, height = view.height, "layout done");
    Ok(view)
}

/// Lay out the reversed map, then flip both the map and the view back.
///
/// Nodes end up as late as their predecessors allow rather than as early as
/// possible, which reads better for graphs drawn top-down.
///
/// # Errors
///
/// Same as [`layout_map`]. The map is restored to its original direction
/// even on error.
pub fn rev_layout(map: &mut Map) -> Result<MapView> {
    map.reverse();
    let laid_out = layout_map(map);
    map.reverse();
    let mut view = laid_out?;
    view.reverse();
    Ok(view)
}

/// Lay out `map` in the direction chosen by `options`.
///
/// # Errors
///
/// Same as [`layout_map`].
pub fn layout_with(map: &mut Map, options: &LayoutOptions) -> Result<MapView> {
    match options.direction {
        Direction::Forward => layout_map(map),
        Direction::Reverse => rev_layout(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn laid_out(g: &Graph) -> MapView {
        let mut map = Map::new(g).expect("acyclic");
        layout_map(&mut map).expect("layout")
    }

    #[test]
    fn chain_is_one_row() {
        let view = laid_out(&Graph::from_iter([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec![]),
        ]));
        assert_eq!(view.width, 3);
        assert_eq!(view.height, 1);
        for (name, x) in [("a", 0), ("b", 1), ("c", 2)] {
            let node = view.node(name).expect("node in view");
            assert_eq!((node.x, node.y), (x, 0), "{name}");
        }
    }

    #[test]
    fn fan_out_keeps_a_row_between_siblings() {
        let view = laid_out(&Graph::from_iter([
            ("hub", vec!["p", "q", "r"]),
            ("p", vec![]),
            ("q", vec![]),
            ("r", vec![]),
        ]));
        assert_eq!(view.width, 2);

        let mut ys: Vec<usize> = ["p", "q", "r"]
            .iter()
            .map(|n| view.node(n).expect("node").y)
            .collect();
        ys.sort_unstable();
        assert_eq!(ys, vec![0, 2, 4]);
        assert_eq!(view.height, 5);
        assert_eq!(view.node("hub").expect("hub").y, 2);
    }

    fn assert_cells(view: &MapView, expected: &[(&str, usize, usize)]) {
        for &(name, x, y) in expected {
            let node = view.node(name).expect("node in view");
            assert_eq!((node.x, node.y), (x, y), "{name}");
        }
    }

    /// `a → y` spans layers 0..2 and cannot be pushed: `a → b → c` pins `a`
    /// because `c` already sits on the last layer.
    fn pinned_long_edge() -> Graph {
        Graph::from_iter([
            ("a", vec!["b", "y"]),
            ("b", vec!["c"]),
            ("c", vec![]),
            ("p", vec!["q"]),
            ("q", vec!["y"]),
            ("y", vec![]),
        ])
    }

    #[test]
    fn long_critical_edge_reserves_its_lane() {
        let view = laid_out(&pinned_long_edge());
        assert_eq!((view.width, view.height), (3, 5));
        assert_cells(
            &view,
            &[
                ("a", 0, 4),
                ("p", 0, 2),
                ("b", 1, 2),
                ("q", 1, 0),
                ("y", 2, 2),
                ("c", 2, 0),
            ],
        );
        // b prefers a's row but the a → y lane holds it.
        let a = view.node("a").expect("a");
        let b = view.node("b").expect("b");
        assert_ne!(a.y, b.y);
    }

    #[test]
    fn lone_lane_row_is_stepped_over() {
        let view = laid_out(&pinned_long_edge());
        let a = view.node("a").expect("a");
        let b = view.node("b").expect("b");
        // The first free row next to the lane is a.y - 1; b moves one further
        // so the lane keeps a row of clearance.
        assert_eq!(a.y - b.y, 2);
        assert_eq!(view.node("q").expect("q").y, 0);
    }

    #[test]
    fn more_critical_inputs_claim_the_preferred_row_first() {
        // Layer 0: n has two critical outputs, m one. Layer 1: z has two
        // critical inputs, a one. Both winners sort after the loser by name.
        let view = laid_out(&Graph::from_iter([
            ("m", vec!["z"]),
            ("n", vec!["a", "z"]),
            ("a", vec![]),
            ("z", vec![]),
        ]));
        assert_eq!((view.width, view.height), (2, 4));
        assert_cells(
            &view,
            &[("m", 0, 0), ("n", 0, 2), ("z", 1, 1), ("a", 1, 3)],
        );
    }

    #[test]
    fn layout_records_positions_on_map() {
        let g = Graph::from_iter([("a", vec!["b"]), ("b", vec![])]);
        let mut map = Map::new(&g).expect("acyclic");
        let view = layout_map(&mut map).expect("layout");

        for node in map.nodes() {
            let v = view.node(node.name()).expect("in view");
            assert_eq!(node.x(), Some(v.x));
            assert_eq!(node.y(), Some(v.y));
        }
    }

    #[test]
    fn view_lists_sorted_critical_edges() {
        let view = laid_out(&Graph::from_iter([
            ("a", vec!["c", "b"]),
            ("b", vec!["c"]),
            ("c", vec![]),
        ]));
        let a = view.node("a").expect("a");
        assert_eq!(a.crit_outs, vec!["b".to_string()]);
        let c = view.node("c").expect("c");
        assert_eq!(c.crit_ins, vec!["b".to_string()]);
    }

    #[test]
    fn rev_layout_mirrors_columns_and_edges() {
        let g = Graph::from_iter([
            ("a", vec!["b", "d"]),
            ("b", vec!["c"]),
            ("c", vec![]),
            ("d", vec![]),
        ]);
        let mut map = Map::new(&g).expect("acyclic");
        let view = rev_layout(&mut map).expect("layout");

        assert_eq!(view.width, 3);
        assert_eq!(view.node("a").expect("a").x, 0);
        assert_eq!(view.node("b").expect("b").x, 1);
        assert_eq!(view.node("c").expect("c").x, 2);
        assert_eq!(view.node("d").expect("d").x, 1);
        assert_eq!(
            view.node("a").expect("a").crit_outs,
            vec!["b".to_string(), "d".to_string()]
        );

        // The map is back in its original direction and agrees with the view.
        for node in map.nodes() {
            assert_eq!(node.x(), Some(view.node(node.name()).expect("in view").x));
            assert_eq!(node.x(), Some(node.layer()));
            for out in node.outs() {
                assert!(node.layer() < map.node(out).layer());
            }
        }
    }

    #[test]
    fn empty_map_has_empty_view() {
        let view = laid_out(&Graph::default());
        assert_eq!(view, MapView::default());
    }

    #[test]
    fn direction_parses_lowercase() {
        let d: Direction = serde_json::from_str("\"reverse\"").expect("valid direction");
        assert_eq!(d, Direction::Reverse);
    }
}
