//! DOT serialization for cmgraph target graphs.
//!
//! Transforms a [`cmgraph_graph::TargetGraph`] into the DOT language:
//! nested subgraph clusters for projects and directories, one node per
//! target (shaped by type), invisible anchor points for whole-project
//! edges, and the classified edge set with style/tooltip/lhead metadata.
//! Any conforming layout engine can consume the output.

mod dot;
mod render;

pub use dot::{escape_label, sanitize_id, shape_for_type};
pub use render::{RenderOptions, render_graph};
