use std::time::Instant;

use clap::Parser;
use clap::ValueEnum;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use cmgraph::CmgraphOptions;
use cmgraph::pipeline::{run_graph, run_setup};
use cmgraph::Result;
use cmgraph_graph::DEFAULT_FREQUENT_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Register the file-api query; re-run cmake afterwards
    Setup,
    /// Render the dependency graph from the file-api reply
    Graph,
}

#[derive(Parser, Debug)]
#[command(
    name = "cmgraph",
    about = "cmgraph: graph CMake targets using the file API",
    version
)]
pub struct Cli {
    /// Command to execute
    #[arg(value_enum)]
    command: Command,

    /// Build directory of a CMake project
    #[arg(
        short = 'B',
        long = "build",
        value_name = "DIR",
        default_value = "./build/"
    )]
    build: String,

    /// Usage-count cutoff for flagging frequent dependencies
    #[arg(long = "threshold", value_name = "N", default_value_t = DEFAULT_FREQUENT_THRESHOLD)]
    threshold: usize,

    /// Suppress targets whose type matches this pattern
    #[arg(long = "skip-types", value_name = "REGEX")]
    skip_types: Option<String>,

    /// Suppress targets whose name matches this pattern
    #[arg(long = "skip-names", value_name = "REGEX")]
    skip_names: Option<String>,

    /// Disable collapsing of whole-project dependencies
    #[arg(long = "no-per-project", default_value_t = false)]
    no_per_project: bool,

    /// Layout direction passed through to the renderer (TB, LR, ...)
    #[arg(long = "rankdir", value_name = "DIR")]
    rankdir: Option<String>,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,

    /// DEBUG level of logging
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    debug: bool,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    if args.command == Command::Setup {
        return run_setup(&args.build);
    }

    let opts = CmgraphOptions {
        build_dir: args.build.clone(),
        frequent_threshold: args.threshold,
        skip_types: args.skip_types.clone(),
        skip_names: args.skip_names.clone(),
        per_project: !args.no_per_project,
        rankdir: args.rankdir.clone(),
        output: args.output.clone(),
    };

    let rendered = run_graph(&opts)?;

    let multiple = rendered.len() > 1;
    for graph in &rendered {
        if let Some(path) = &opts.output {
            let path = if multiple {
                suffix_configuration(path, &graph.configuration)
            } else {
                path.clone()
            };
            std::fs::write(&path, &graph.dot)?;
            tracing::info!(path = %path, configuration = %graph.configuration, "output written");
        } else {
            println!("{}", graph.dot);
        }
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

/// `graph.dot` becomes `graph-Release.dot` when several configurations render.
fn suffix_configuration(path: &str, configuration: &str) -> String {
    match path.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}-{configuration}.{extension}"),
        None => format!("{path}-{configuration}"),
    }
}

pub fn main() {
    let args = Cli::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        tracing::error!(error = %e, "execution failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["cmgraph", "graph"]);
        assert_eq!(cli.command, Command::Graph);
        assert_eq!(cli.build, "./build/");
        assert_eq!(cli.threshold, 5);
        assert!(!cli.no_per_project);
        assert!(cli.rankdir.is_none());
    }

    #[test]
    fn test_cli_full_surface() {
        let cli = Cli::parse_from([
            "cmgraph",
            "graph",
            "-B",
            "out/",
            "--threshold",
            "3",
            "--skip-types",
            "UTILITY",
            "--skip-names",
            "^test_",
            "--no-per-project",
            "--rankdir",
            "LR",
            "-o",
            "graph.dot",
        ]);
        assert_eq!(cli.build, "out/");
        assert_eq!(cli.threshold, 3);
        assert_eq!(cli.skip_types.as_deref(), Some("UTILITY"));
        assert_eq!(cli.skip_names.as_deref(), Some("^test_"));
        assert!(cli.no_per_project);
        assert_eq!(cli.rankdir.as_deref(), Some("LR"));
        assert_eq!(cli.output.as_deref(), Some("graph.dot"));
    }

    #[test]
    fn test_suffix_configuration() {
        assert_eq!(suffix_configuration("graph.dot", "Release"), "graph-Release.dot");
        assert_eq!(suffix_configuration("out", "Debug"), "out-Debug");
    }
}
