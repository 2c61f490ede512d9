//! Minimum-cycle extraction for name-keyed graphs.
//!
//! # Overview
//!
//! When a graph fails to layer, the user needs a concrete counterexample.
//! [`find_cycle`] returns the shortest cycle in the graph, rotated so that
//! its lexicographically smallest member comes first:
//!
//! ```text
//! {"1": ["2"], "2": ["3"], "3": ["1"]}   →   ["1", "2", "3"]
//! ```
//!
//! # Algorithm
//!
//! Multi-source BFS. Every node seeds one search, seeds are created in name
//! order, and all searches share a single FIFO of steps so paths are expanded
//! in non-decreasing length. The first step whose successor is its own
//! origin closes a minimum cycle.
//!
//! A search rooted at `start` never enters a node smaller than `start`: any
//! cycle through such a node is owned by the smaller node's search. This is
//! what makes the reported cycle canonically rooted.
//!
//! Worst case is O(d·n²) steps for average out-degree d, but the search
//! stops at the first cycle found.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::graph::Graph;

/// Read access to a name-keyed directed graph.
///
/// Implemented by [`Graph`] and [`Map`](crate::map::Map) so cycles can be
/// reported from either.
pub trait Adjacency {
    /// Every node name. Order does not matter.
    fn node_names(&self) -> Vec<&str>;

    /// Direct out-neighbors of `name`. Order does not matter; names that are
    /// not nodes are ignored.
    fn out_names(&self, name: &str) -> Vec<&str>;
}

impl Adjacency for Graph {
    fn node_names(&self) -> Vec<&str> {
        self.names().collect()
    }

    fn out_names(&self, name: &str) -> Vec<&str> {
        self.outs(name)
            .map(|outs| outs.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Find the shortest cycle in `graph`, rooted at its smallest member.
///
/// Returns `None` if the graph is acyclic. A self-loop is a one-element
/// cycle.
#[must_use]
pub fn find_cycle<A: Adjacency + ?Sized>(graph: &A) -> Option<Vec<String>> {
    let mut names = graph.node_names();
    names.sort_unstable();
    names.dedup();

    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let outs: Vec<Vec<usize>> = names
        .iter()
        .map(|&name| {
            let mut ids: Vec<usize> = graph
                .out_names(name)
                .into_iter()
                .filter_map(|o| index.get(o).copied())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        })
        .collect();

    shortest_cycle(&outs).map(|ids| ids.into_iter().map(|i| names[i].to_string()).collect())
}

/// One BFS frontier entry.
struct Step {
    start: usize,
    this: usize,
    last: Option<usize>,
    length: usize,
}

/// BFS over an index graph whose ids are already in name order.
fn shortest_cycle(outs: &[Vec<usize>]) -> Option<Vec<usize>> {
    let n = outs.len();
    let mut steps: Vec<Step> = (0..n)
        .map(|i| Step {
            start: i,
            this: i,
            last: None,
            length: 1,
        })
        .collect();
    let mut visited: Vec<HashSet<usize>> = (0..n).map(|i| HashSet::from([i])).collect();

    let mut cursor = 0;
    while let Some(step) = steps.get(cursor) {
        let (start, this, length) = (step.start, step.this, step.length);

        for &next in &outs[this] {
            if next == start {
                trace!(length, steps = steps.len(), "closed minimum cycle");
                return Some(trace_path(&steps, cursor));
            }
            if next < start || !visited[start].insert(next) {
                continue;
            }
            steps.push(Step {
                start,
                this: next,
                last: Some(cursor),
                length: length + 1,
            });
        }
        cursor += 1;
    }

    None
}

fn trace_path(steps: &[Step], end: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut cursor = Some(end);
    while let Some(i) = cursor {
        path.push(steps[i].this);
        cursor = steps[i].last;
    }
    path.reverse();
    path
}
