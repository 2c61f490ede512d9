#![forbid(unsafe_code)]
//! strata-core library.
//!
//! Dependency-graph engine: acyclicity checks with minimum counterexample
//! cycles, transitive closure, critical (transitively reduced) edges, ASAP
//! layering, and a deterministic layered 2-D layout.
//!
//! # Pipeline
//!
//! ```text
//! Graph (name → [out names])
//!        ↓  Map::new()
//! Map (layers, all_ins/all_outs, crit_ins/crit_outs)
//!        ↓  layout::layout_map()
//! MapView (width, height, per-node x/y + critical edges)
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Use [`Error`] / [`Result`] for every fallible operation.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`) and `#[instrument]`.

pub mod cycles;
pub mod error;
pub mod graph;
pub mod layout;
pub mod map;

pub use cycles::find_cycle;
pub use error::{Error, ErrorCode, Result};
pub use graph::Graph;
pub use layout::{Direction, LayoutOptions, MapNodeView, MapView, layout_map, layout_with, rev_layout};
pub use map::{Map, MapNode, NodeId, check_dag};
