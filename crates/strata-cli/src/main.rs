#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "strata: dependency graph validation and layered layout",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (default: ./strata.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Check that a graph is acyclic",
        long_about = "Validate a graph: every edge target must be a node and the graph must be acyclic. On a cycle, report the shortest one.",
        after_help = "EXAMPLES:\n    # Validate a graph file\n    strata check deps.json\n\n    # Read from stdin\n    cat deps.json | strata check -"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        about = "Lay out a graph on a grid",
        long_about = "Assign every node a column (its layer) and a row, keeping critical edges straight where possible.",
        after_help = "EXAMPLES:\n    # Print the layout as a grid\n    strata layout deps.json --format pretty\n\n    # Pack nodes toward the sinks\n    strata layout deps.json --reverse --json\n\n    # Ignore a reverse direction set in strata.toml\n    strata layout deps.json --direction forward"
    )]
    Layout(cmd::layout::LayoutArgs),

    #[command(
        about = "Extract the sub-graph spanning some nodes",
        long_about = "Keep the named nodes and every node lying on a path between two of them.",
        after_help = "EXAMPLES:\n    # Everything between app and libc\n    strata closure deps.json app libc"
    )]
    Closure(cmd::closure::ClosureArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "strata=debug,info"
        } else {
            "strata=info,warn"
        })
    });

    let format = env::var("STRATA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // Logs go to stderr so stdout stays parseable.
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let cwd = env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;
    let output = resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());

    let command_result = match cli.command {
        Commands::Check(ref args) => cmd::check::run_check(args, output),
        Commands::Layout(ref args) => {
            cmd::layout::run_layout(args, config.layout_options(), output)
        }
        Commands::Closure(ref args) => cmd::closure::run_closure(args, output),
    };

    if let Err(err) = command_result {
        let cli_error = err
            .downcast_ref::<strata_core::Error>()
            .map_or_else(|| CliError::new(format!("{err:#}")), CliError::from);
        render_error(output, &cli_error)?;
        std::process::exit(1);
    }
    Ok(())
}
