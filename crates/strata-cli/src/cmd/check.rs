//! `strata check`: validate a graph as a DAG.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_core::Map;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `strata check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Graph JSON file (`-` for stdin).
    pub graph: PathBuf,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    ok: bool,
    nodes: usize,
    edges: usize,
    critical: usize,
    layers: usize,
}

/// Execute `strata check`.
pub fn run_check(args: &CheckArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = super::read_graph(&args.graph)?;
    let map = Map::new(&graph)?;

    let payload = CheckOutput {
        ok: true,
        nodes: map.len(),
        edges: map.nedge(),
        critical: map.ncrit(),
        layers: map.nlayer(),
    };
    render_mode(output, &payload, render_check_text, render_check_pretty)
}

fn render_check_text(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "ok nodes={} edges={} critical={} layers={}",
        payload.nodes, payload.edges, payload.critical, payload.layers
    )
}

fn render_check_pretty(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Graph is acyclic")?;
    pretty_kv(w, "nodes", payload.nodes.to_string())?;
    pretty_kv(w, "edges", payload.edges.to_string())?;
    pretty_kv(w, "critical", payload.critical.to_string())?;
    pretty_kv(w, "layers", payload.layers.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CheckOutput {
        CheckOutput {
            ok: true,
            nodes: 3,
            edges: 3,
            critical: 2,
            layers: 3,
        }
    }

    #[test]
    fn text_is_one_line() {
        let mut out = Vec::new();
        render_check_text(&sample(), &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "ok nodes=3 edges=3 critical=2 layers=3\n"
        );
    }

    #[test]
    fn pretty_lists_counts() {
        let mut out = Vec::new();
        render_check_pretty(&sample(), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.starts_with("Graph is acyclic\n"));
        assert!(rendered.contains("critical:    2"));
    }
}
