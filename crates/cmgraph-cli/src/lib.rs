//! cmgraph command-line interface.

pub mod pipeline;

pub use cmgraph_error::{Error, ErrorKind, Result};
pub use pipeline::{RenderedGraph, run_graph, run_setup};

use cmgraph_graph::DEFAULT_FREQUENT_THRESHOLD;

/// Options for running cmgraph.
#[derive(Debug, Clone)]
pub struct CmgraphOptions {
    /// Build directory of the CMake project.
    pub build_dir: String,
    /// Usage-count cutoff for flagging frequent dependencies.
    pub frequent_threshold: usize,
    /// Suppress targets whose type matches this pattern.
    pub skip_types: Option<String>,
    /// Suppress targets whose name matches this pattern.
    pub skip_names: Option<String>,
    /// Collapse dependencies covering a whole project onto that project.
    pub per_project: bool,
    /// Layout direction passed through to the renderer.
    pub rankdir: Option<String>,
    /// Output file path; stdout when absent.
    pub output: Option<String>,
}

impl Default for CmgraphOptions {
    fn default() -> Self {
        Self {
            build_dir: "./build/".to_string(),
            frequent_threshold: DEFAULT_FREQUENT_THRESHOLD,
            skip_types: None,
            skip_names: None,
            per_project: true,
            rankdir: None,
            output: None,
        }
    }
}
