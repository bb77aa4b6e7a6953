//! Entity model over one codemodel snapshot.
//!
//! Entities are plain data holders; all derived analysis (usage counts,
//! markers, hubs, edge dispositions) lives in the graph layer. The only
//! mutable state here is a target's presentation fields, each written by at
//! most one graph component per run.

use std::collections::HashSet;
use std::fmt;

use strum_macros::{Display, IntoStaticStr};

/// Target kinds reported by the codemodel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TargetType {
    #[strum(serialize = "EXECUTABLE")]
    Executable,
    #[strum(serialize = "STATIC_LIBRARY")]
    StaticLibrary,
    #[strum(serialize = "SHARED_LIBRARY")]
    SharedLibrary,
    #[strum(serialize = "MODULE_LIBRARY")]
    ModuleLibrary,
    #[strum(serialize = "OBJECT_LIBRARY")]
    ObjectLibrary,
    #[strum(serialize = "INTERFACE_LIBRARY")]
    InterfaceLibrary,
    #[strum(serialize = "UTILITY")]
    Utility,
    #[strum(serialize = "UNKNOWN")]
    Unknown,
}

impl TargetType {
    /// Parse the codemodel's type string; unrecognized kinds map to Unknown
    /// rather than failing the load.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "EXECUTABLE" => Self::Executable,
            "STATIC_LIBRARY" => Self::StaticLibrary,
            "SHARED_LIBRARY" => Self::SharedLibrary,
            "MODULE_LIBRARY" => Self::ModuleLibrary,
            "OBJECT_LIBRARY" => Self::ObjectLibrary,
            "INTERFACE_LIBRARY" => Self::InterfaceLibrary,
            "UTILITY" => Self::Utility,
            _ => Self::Unknown,
        }
    }
}

/// Where a target was declared: the defining command and its file:line site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSite {
    pub command: String,
    pub file: String,
    pub line: Option<u64>,
}

impl fmt::Display for DefinitionSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.command, self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        Ok(())
    }
}

/// A project node in the build's project forest.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub parent_index: Option<usize>,
    pub child_indexes: Vec<usize>,
    pub target_indexes: Vec<usize>,
    pub directory_indexes: Vec<usize>,
}

impl Project {
    /// True iff every target of this project appears in `dep_indexes`.
    ///
    /// A project with no targets is covered vacuously by any set.
    pub fn full_dependence(&self, dep_indexes: &HashSet<usize>) -> bool {
        self.target_indexes
            .iter()
            .all(|index| dep_indexes.contains(index))
    }
}

/// A source directory, owned by exactly one project.
#[derive(Debug, Clone)]
pub struct Directory {
    pub source_path: String,
    pub project_index: usize,
    pub child_indexes: Vec<usize>,
    pub target_indexes: Vec<usize>,
}

/// Include/define/source grouping of a target's compile step.
#[derive(Debug, Clone, Default)]
pub struct CompileGroup {
    pub sources: Vec<String>,
    pub includes: Vec<String>,
    pub defines: Vec<String>,
}

/// Marker assigned to a frequent target: symbol plus its usage count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub symbol: &'static str,
    pub usage_count: usize,
}

/// One build target.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub ty: TargetType,
    pub project_index: usize,
    pub directory_index: usize,
    /// Raw dependency ids, order and duplicates preserved.
    pub dependency_ids: Vec<String>,
    pub sources: Vec<String>,
    pub install_paths: Option<Vec<String>>,
    pub compile_groups: Vec<CompileGroup>,
    pub definition: DefinitionSite,
    /// Suppressed by a skip-types/skip-names pattern; keeps its global index
    /// so index lists stay valid, but emits no node and no edges.
    pub skipped: bool,

    label: String,
    marker: Option<Marker>,
    dep_markers: Vec<&'static str>,
}

impl Target {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        name: String,
        ty: TargetType,
        project_index: usize,
        directory_index: usize,
        dependency_ids: Vec<String>,
        sources: Vec<String>,
        install_paths: Option<Vec<String>>,
        compile_groups: Vec<CompileGroup>,
        definition: DefinitionSite,
    ) -> Self {
        let label = name.clone();
        Self {
            id,
            name,
            ty,
            project_index,
            directory_index,
            dependency_ids,
            sources,
            install_paths,
            compile_groups,
            definition,
            skipped: false,
            label,
            marker: None,
            dep_markers: Vec::new(),
        }
    }

    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    pub fn dep_markers(&self) -> &[&'static str] {
        &self.dep_markers
    }

    /// Flag this target frequent. Write-once for the rest of the run.
    pub fn set_marker(&mut self, symbol: &'static str, usage_count: usize) {
        debug_assert!(self.marker.is_none(), "marker is write-once");
        self.marker = Some(Marker {
            symbol,
            usage_count,
        });
        self.label = format!("@{}({}) {}", symbol, usage_count, self.name);
    }

    /// Annotate a dependency marker onto this target's label.
    pub fn add_dep_marker(&mut self, symbol: &'static str) {
        self.dep_markers.push(symbol);
    }

    /// Label as rendered: marker-prefixed name, plus annotated dependency
    /// markers on a second line.
    pub fn display_label(&self) -> String {
        if self.dep_markers.is_empty() {
            self.label.clone()
        } else {
            format!("{}\n{}", self.label, self.dep_markers.join(" "))
        }
    }
}

/// One resolved dependency edge occurrence.
///
/// Duplicates in the raw dependency id list produce duplicate records; they
/// are not deduplicated at this stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub source: usize,
    pub dest: usize,
    /// Both endpoints belong to the same project (the edge draws inside that
    /// project's scope).
    pub same_project: bool,
    /// The destination's whole project is covered by the source's dependency
    /// set (and per-project collapsing is enabled).
    pub full_dep: bool,
}
