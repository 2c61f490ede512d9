//! Induced sub-maps spanning a node subset and everything between.

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use super::Map;
use crate::error::{Error, Result};

impl Map {
    /// Build the smallest sub-map containing `names` and every node that is
    /// both a descendant of some member and an ancestor of some member.
    ///
    /// The result is a fresh [`Map`] over the induced sub-graph, with its
    /// own layers and critical edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a name is not a node of this map.
    #[instrument(skip(self, names), fields(selected = names.len()))]
    pub fn closure<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let n = self.nodes.len();
        let mut keep = FixedBitSet::with_capacity(n);
        let mut ups = FixedBitSet::with_capacity(n);
        let mut downs = FixedBitSet::with_capacity(n);

        for name in names {
            let name = name.as_ref();
            let id = self
                .id(name)
                .ok_or_else(|| Error::InvalidArgument(format!("node {name:?} is not in the map")))?;
            let node = &self.nodes[id.0];
            keep.insert(id.0);
            ups.union_with(&node.all_ins);
            downs.union_with(&node.all_outs);
        }

        ups.intersect_with(&downs);
        keep.union_with(&ups);
        debug!(kept = keep.count_ones(..), "closure selected");

        let graph = self
            .to_graph()
            .filter(|name| self.id(name).is_some_and(|id| keep.contains(id.0)));
        Self::new(&graph)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::graph::Graph;
    use crate::map::Map;

    fn layered() -> Map {
        // a → b → c → d, plus side branches x → c and c → y.
        let g = Graph::from_iter([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["d", "y"]),
            ("d", vec![]),
            ("x", vec!["c"]),
            ("y", vec![]),
        ]);
        Map::new(&g).expect("acyclic")
    }

    fn names(map: &Map) -> Vec<&str> {
        map.nodes().map(crate::map::MapNode::name).collect()
    }

    #[test]
    fn closure_adds_in_between_nodes() {
        let sub = layered().closure(&["a", "d"]).expect("known names");
        assert_eq!(names(&sub), vec!["a", "b", "c", "d"]);
        assert_eq!(sub.nedge(), 3);
        assert_eq!(sub.nlayer(), 4);
    }

    #[test]
    fn closure_of_single_node_is_that_node() {
        let sub = layered().closure(&["c"]).expect("known name");
        assert_eq!(names(&sub), vec!["c"]);
        assert_eq!(sub.nedge(), 0);
    }

    #[test]
    fn unrelated_members_stay_disconnected() {
        let sub = layered().closure(&["d", "y"]).expect("known names");
        assert_eq!(names(&sub), vec!["d", "y"]);
        assert_eq!(sub.nlayer(), 1);
    }

    #[test]
    fn side_branches_are_excluded() {
        let sub = layered().closure(&["x", "d"]).expect("known names");
        assert_eq!(names(&sub), vec!["c", "d", "x"]);
    }

    #[test]
    fn unknown_name_is_invalid_argument() {
        let err = layered().closure(&["nope"]).expect_err("unknown");
        assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("nope")));
    }
}
