//! `strata closure`: the sub-graph spanning a set of nodes.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_core::Map;

use crate::output::{OutputMode, pretty_rule, render_mode};

/// Arguments for `strata closure`.
#[derive(Args, Debug)]
pub struct ClosureArgs {
    /// Graph JSON file (`-` for stdin).
    pub graph: PathBuf,

    /// Nodes to span. Every node on a path between two of them is kept.
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ClosureOutput {
    nodes: Vec<ClosureNode>,
}

#[derive(Debug, Serialize)]
struct ClosureNode {
    name: String,
    layer: usize,
    crit_outs: Vec<String>,
}

/// Execute `strata closure`.
pub fn run_closure(args: &ClosureArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = super::read_graph(&args.graph)?;
    let map = Map::new(&graph)?;
    let sub = map.closure(args.names.as_slice())?;

    let payload = ClosureOutput {
        nodes: sub
            .sorted_nodes()
            .into_iter()
            .map(|node| ClosureNode {
                name: node.name().to_string(),
                layer: node.layer(),
                crit_outs: sub
                    .names(node.crit_outs())
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect(),
    };
    render_mode(output, &payload, render_closure_text, render_closure_pretty)
}

fn render_closure_text(payload: &ClosureOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for node in &payload.nodes {
        let outs = if node.crit_outs.is_empty() {
            "-".to_string()
        } else {
            node.crit_outs.join(",")
        };
        writeln!(w, "{} {} {}", node.layer, node.name, outs)?;
    }
    Ok(())
}

fn render_closure_pretty(payload: &ClosureOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Closure ({} nodes)", payload.nodes.len())?;
    let mut current = None;
    for node in &payload.nodes {
        if current != Some(node.layer) {
            current = Some(node.layer);
            pretty_rule(w)?;
            writeln!(w, "layer {}", node.layer)?;
        }
        if node.crit_outs.is_empty() {
            writeln!(w, "  {}", node.name)?;
        } else {
            writeln!(w, "  {} → {}", node.name, node.crit_outs.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClosureOutput {
        ClosureOutput {
            nodes: vec![
                ClosureNode {
                    name: "a".into(),
                    layer: 0,
                    crit_outs: vec!["b".into(), "c".into()],
                },
                ClosureNode {
                    name: "b".into(),
                    layer: 1,
                    crit_outs: vec![],
                },
                ClosureNode {
                    name: "c".into(),
                    layer: 1,
                    crit_outs: vec![],
                },
            ],
        }
    }

    #[test]
    fn text_lists_layer_name_and_outs() {
        let mut out = Vec::new();
        render_closure_text(&sample(), &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "0 a b,c\n1 b -\n1 c -\n"
        );
    }

    #[test]
    fn pretty_groups_by_layer() {
        let mut out = Vec::new();
        render_closure_pretty(&sample(), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.starts_with("Closure (3 nodes)\n"));
        assert_eq!(rendered.matches("layer ").count(), 2);
        assert!(rendered.contains("  a → b, c\n"));
    }

    #[test]
    fn names_are_required() {
        use clap::Parser;

        #[derive(Parser, Debug)]
        struct Wrapper {
            #[command(flatten)]
            args: ClosureArgs,
        }

        assert!(Wrapper::try_parse_from(["test", "g.json"]).is_err());
        let parsed = Wrapper::try_parse_from(["test", "g.json", "a", "d"]).expect("parses");
        assert_eq!(parsed.args.names, vec!["a", "d"]);
    }
}
