//! Graph reduction engine for cmgraph.
//!
//! Turns one [`cmgraph_model::Snapshot`] into an abstract target graph:
//!
//! 1. [`markers`]: count incoming dependencies, flag frequent targets, and
//!    assign each a marker symbol from a bounded alphabet.
//! 2. [`hub`]: find the most recurring subset of frequent dependencies and,
//!    if large and common enough, collapse it into one synthetic hub node.
//! 3. [`classify`]: give every dependency record exactly one rendering
//!    disposition (hub redirect, label annotation, project collapse, direct).
//! 4. [`build`]: materialize scopes, nodes, anchor nodes, and edges into a
//!    [`types::TargetGraph`] in one explicit pass.
//!
//! Every step is a deterministic function of snapshot iteration order.

pub mod build;
pub mod classify;
pub mod hub;
pub mod markers;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use build::{DEFAULT_FREQUENT_THRESHOLD, ReduceOptions, build_target_graph};
pub use classify::{ClassifiedEdge, classify_edges};
pub use cmgraph_error::{Error, ErrorKind, Result};
pub use hub::{Hub, select_hub};
pub use markers::{FrequentSet, MARKER_SYMBOLS, MarkerAlphabet, detect_frequent};
pub use types::{
    Edge, EdgeStyle, Node, NodeId, NodeKind, Scope, ScopeId, ScopeKind, TargetGraph,
};
