//! `strata layout`: lay a DAG out on a grid.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use strata_core::{Direction, LayoutOptions, Map, MapView, layout_with};
use tracing::info;

use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `strata layout`.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Graph JSON file (`-` for stdin).
    pub graph: PathBuf,

    /// Layout direction. Overrides `[layout] direction` from `strata.toml`.
    #[arg(long, value_enum, conflicts_with = "reverse")]
    pub direction: Option<DirectionArg>,

    /// Same as `--direction reverse`.
    #[arg(long)]
    pub reverse: bool,
}

/// Command-line spelling of [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Pack nodes toward the sources.
    Forward,
    /// Pack nodes toward the sinks.
    Reverse,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Self::Forward,
            DirectionArg::Reverse => Self::Reverse,
        }
    }
}

impl LayoutArgs {
    /// Layout options with flags applied over the configured defaults.
    fn options(&self, defaults: LayoutOptions) -> LayoutOptions {
        let direction = if self.reverse {
            Some(Direction::Reverse)
        } else {
            self.direction.map(Direction::from)
        };
        LayoutOptions {
            direction: direction.unwrap_or(defaults.direction),
        }
    }
}

/// Execute `strata layout`.
pub fn run_layout(
    args: &LayoutArgs,
    defaults: LayoutOptions,
    output: OutputMode,
) -> anyhow::Result<()> {
    let graph = super::read_graph(&args.graph)?;
    let mut map = Map::new(&graph)?;

    let options = args.options(defaults);
    let view = layout_with(&mut map, &options)?;
    info!(
        width = view.width,
        height = view.height,
        direction = ?options.direction,
        "layout computed"
    );

    render_mode(output, &view, render_layout_text, render_layout_grid)
}

/// One line per node in column-major order: `name x y crit_outs`.
fn render_layout_text(view: &MapView, w: &mut dyn Write) -> std::io::Result<()> {
    let mut nodes: Vec<_> = view.nodes.values().collect();
    nodes.sort_by_key(|n| (n.x, n.y));
    for node in nodes {
        let outs = if node.crit_outs.is_empty() {
            "-".to_string()
        } else {
            node.crit_outs.join(",")
        };
        writeln!(w, "{} {} {} {}", node.name, node.x, node.y, outs)?;
    }
    Ok(())
}

/// The view as a character grid, one cell per `(x, y)`.
fn render_layout_grid(view: &MapView, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Layout {}x{}", view.width, view.height))?;

    let cell = view.nodes.keys().map(String::len).max().unwrap_or(1);
    let by_cell: HashMap<(usize, usize), &str> = view
        .nodes
        .values()
        .map(|n| ((n.x, n.y), n.name.as_str()))
        .collect();

    for y in 0..view.height {
        let row: Vec<String> = (0..view.width)
            .map(|x| {
                let name = by_cell.get(&(x, y)).copied().unwrap_or(".");
                format!("{name:<cell$}")
            })
            .collect();
        writeln!(w, "{}", row.join("  ").trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Graph, layout_map};

    fn diamond_view() -> MapView {
        let g: Graph = [
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["d"]),
            ("d", vec![]),
        ]
        .into_iter()
        .collect();
        let mut map = Map::new(&g).expect("acyclic");
        layout_map(&mut map).expect("layout")
    }

    #[test]
    fn text_is_sorted_by_cell() {
        let mut out = Vec::new();
        render_layout_text(&diamond_view(), &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "a 0 2 b,c\nc 1 0 d\nb 1 2 d\nd 2 1 -\n"
        );
    }

    #[test]
    fn grid_places_names_in_cells() {
        let mut out = Vec::new();
        render_layout_grid(&diamond_view(), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        let rows: Vec<&str> = rendered.lines().skip(2).collect();
        assert_eq!(rows, vec![".  c  .", ".  .  d", "a  b  ."]);
    }

    fn parse(args: &[&str]) -> Result<LayoutArgs, clap::Error> {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: LayoutArgs,
        }

        Wrapper::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .map(|w| w.args)
    }

    const REVERSED: LayoutOptions = LayoutOptions {
        direction: Direction::Reverse,
    };

    #[test]
    fn reverse_flag_parses() {
        let args = parse(&["g.json", "--reverse"]).expect("parses");
        assert!(args.reverse);
        assert_eq!(args.graph, PathBuf::from("g.json"));
        assert_eq!(args.options(LayoutOptions::default()), REVERSED);
    }

    #[test]
    fn no_flag_keeps_configured_direction() {
        let args = parse(&["g.json"]).expect("parses");
        assert_eq!(args.options(REVERSED), REVERSED);
        assert_eq!(args.options(LayoutOptions::default()), LayoutOptions::default());
    }

    #[test]
    fn direction_forward_overrides_configured_reverse() {
        let args = parse(&["g.json", "--direction", "forward"]).expect("parses");
        assert_eq!(args.direction, Some(DirectionArg::Forward));
        assert_eq!(args.options(REVERSED).direction, Direction::Forward);
    }

    #[test]
    fn direction_reverse_matches_reverse_flag() {
        let args = parse(&["g.json", "--direction", "reverse"]).expect("parses");
        assert_eq!(args.options(LayoutOptions::default()), REVERSED);
    }

    #[test]
    fn direction_conflicts_with_reverse() {
        assert!(parse(&["g.json", "--reverse", "--direction", "forward"]).is_err());
        assert!(parse(&["g.json", "--direction", "sideways"]).is_err());
    }
}
