//! Raw serde schema for the file-API documents this tool consumes.
//!
//! Only the fields the model reads are declared; CMake writes more, and
//! serde skips the rest. Index lists default to empty because the codemodel
//! omits them when a project or directory has no children/targets.

use std::collections::HashMap;

use serde::Deserialize;

/// Reply index document (`reply/index-*.json`).
///
/// The `reply` object maps client names to the documents written for their
/// queries; the shapes differ per query kind, so values stay untyped until
/// the relevant one is picked out.
#[derive(Debug, Deserialize)]
pub struct ReplyIndex {
    #[serde(default)]
    pub reply: HashMap<String, serde_json::Value>,
}

/// A `{"jsonFile": ...}` pointer to another reply document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub json_file: String,
}

/// Top-level codemodel document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Codemodel {
    #[serde(default)]
    pub configurations: Vec<Configuration>,
}

/// One build configuration (e.g. Debug) inside the codemodel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
    #[serde(default)]
    pub targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    pub parent_index: Option<usize>,
    #[serde(default)]
    pub child_indexes: Vec<usize>,
    #[serde(default)]
    pub target_indexes: Vec<usize>,
    #[serde(default)]
    pub directory_indexes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub source: String,
    pub project_index: usize,
    #[serde(default)]
    pub child_indexes: Vec<usize>,
    #[serde(default)]
    pub target_indexes: Vec<usize>,
    /// Pointer to the per-directory detail document.
    pub json_file: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntry {
    pub name: String,
    pub id: String,
    pub project_index: usize,
    pub directory_index: usize,
    /// Pointer to the per-target detail document.
    pub json_file: String,
}

/// Per-target detail document (`reply/target-*.json`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub target_type: String,
    #[serde(default)]
    pub backtrace_graph: BacktraceGraph,
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub compile_groups: Vec<CompileGroupEntry>,
    pub install: Option<InstallEntry>,
}

/// Provenance table: which command, in which file, at which line, declared
/// or touched the target.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktraceGraph {
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<BacktraceNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktraceNode {
    pub file: usize,
    pub line: Option<u64>,
    pub command: Option<usize>,
    pub parent: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEntry {
    pub id: String,
    pub backtrace: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub path: String,
    pub compile_group_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileGroupEntry {
    #[serde(default)]
    pub source_indexes: Vec<usize>,
    pub language: Option<String>,
    #[serde(default)]
    pub includes: Vec<IncludeEntry>,
    #[serde(default)]
    pub defines: Vec<DefineEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeEntry {
    pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineEntry {
    pub define: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallEntry {
    pub prefix: InstallPrefix,
    #[serde(default)]
    pub destinations: Vec<InstallDestination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPrefix {
    pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallDestination {
    pub path: String,
}

/// Per-directory detail document (`reply/directory-*.json`).
///
/// The model only existence-checks these; nothing beyond validity is read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryDocument {
    pub paths: Option<DirectoryPaths>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPaths {
    pub source: Option<String>,
    pub build: Option<String>,
}
