//! Core processing pipeline: discover reply → load snapshots → reduce → render.

use std::path::Path;
use std::time::Instant;

use regex::Regex;
use tracing::info;

use cmgraph_dot::{RenderOptions, render_graph};
use cmgraph_error::{Error, Result};
use cmgraph_graph::{ReduceOptions, build_target_graph};
use cmgraph_model::snapshot::{SnapshotOptions, load_snapshots};
use cmgraph_model::api;

use crate::CmgraphOptions;

/// One rendered configuration graph.
#[derive(Debug)]
pub struct RenderedGraph {
    pub configuration: String,
    pub dot: String,
}

/// Register the file-API query in a build directory.
pub fn run_setup(build_dir: &str) -> Result<()> {
    let query_file = api::setup_query(Path::new(build_dir))?;
    info!(path = %query_file.display(), "file-api query registered");
    Ok(())
}

/// Render one DOT document per codemodel configuration.
///
/// This is the full pipeline:
/// 1. Discover the newest reply index and its codemodel document
/// 2. Load and assemble one snapshot per configuration
/// 3. Reduce each snapshot to an abstract target graph
/// 4. Serialize each graph to DOT
pub fn run_graph(opts: &CmgraphOptions) -> Result<Vec<RenderedGraph>> {
    let load_start = Instant::now();

    let snapshot_opts = SnapshotOptions::new()
        .with_per_project(opts.per_project)
        .with_skip_types(compile_pattern("skip-types", opts.skip_types.as_deref())?)
        .with_skip_names(compile_pattern("skip-names", opts.skip_names.as_deref())?);

    let mut snapshots = load_snapshots(Path::new(&opts.build_dir), &snapshot_opts)?;
    info!(
        configurations = snapshots.len(),
        "Snapshot loading: {:.2}s",
        load_start.elapsed().as_secs_f64()
    );

    let reduce_opts = ReduceOptions::new().with_frequent_threshold(opts.frequent_threshold);
    let render_opts = RenderOptions::new().with_rankdir(opts.rankdir.clone());

    let reduce_start = Instant::now();
    let mut rendered = Vec::with_capacity(snapshots.len());
    for snapshot in &mut snapshots {
        let graph = build_target_graph(snapshot, &reduce_opts)?;
        rendered.push(RenderedGraph {
            configuration: snapshot.name.clone(),
            dot: render_graph(&graph, &render_opts),
        });
    }
    info!(
        "Reduction & rendering: {:.2}s",
        reduce_start.elapsed().as_secs_f64()
    );

    Ok(rendered)
}

fn compile_pattern(flag: &'static str, pattern: Option<&str>) -> Result<Option<Regex>> {
    let Some(pattern) = pattern else {
        return Ok(None);
    };
    Regex::new(pattern).map(Some).map_err(|e| {
        Error::config_invalid(format!("invalid {flag} pattern"))
            .with_operation("pipeline::compile_pattern")
            .with_context("pattern", pattern)
            .set_source(e)
    })
}
