#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;
use strata_core::{Error, Graph, Map, find_cycle, layout_map};

fuzz_target!(|data: &[u8]| {
    let Ok(graph) = serde_json::from_slice::<Graph>(data) else {
        return;
    };
    // Keep the quadratic passes cheap.
    if graph.node_count() > 256 {
        return;
    }

    match Map::new(&graph) {
        Ok(mut map) => {
            assert!(find_cycle(&graph).is_none());
            let view = layout_map(&mut map).expect("validated map lays out");
            let mut cells = HashSet::new();
            for node in view.nodes.values() {
                assert!(node.x < view.width && node.y < view.height);
                assert!(cells.insert((node.x, node.y)));
            }
        }
        Err(Error::Cycle { cycle }) => {
            assert!(!cycle.is_empty());
            assert_eq!(find_cycle(&graph), Some(cycle));
        }
        Err(Error::MissingNode { node, .. }) => assert!(!graph.contains(&node)),
        Err(err) => panic!("unexpected error: {err}"),
    }
});
