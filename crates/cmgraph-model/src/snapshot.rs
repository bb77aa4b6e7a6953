//! Snapshot assembly: entities plus derived dependency records for one
//! configuration.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use tracing::debug;

use cmgraph_error::{Error, Result};

use crate::api;
use crate::entity::{
    CompileGroup, DefinitionSite, Dependency, Directory, Project, Target, TargetType,
};
use crate::schema::{Codemodel, Configuration, DirectoryDocument, TargetDocument};

/// Commands that declare a target.
const DEFINE_COMMANDS: [&str; 2] = ["add_executable", "add_library"];

/// Options controlling snapshot assembly.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Collapse dependencies that cover a whole project onto that project.
    pub per_project: bool,
    /// Suppress targets whose type matches.
    pub skip_types: Option<Regex>,
    /// Suppress targets whose name matches.
    pub skip_names: Option<Regex>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            per_project: true,
            skip_types: None,
            skip_names: None,
        }
    }
}

impl SnapshotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_per_project(mut self, per_project: bool) -> Self {
        self.per_project = per_project;
        self
    }

    pub fn with_skip_types(mut self, skip_types: Option<Regex>) -> Self {
        self.skip_types = skip_types;
        self
    }

    pub fn with_skip_names(mut self, skip_names: Option<Regex>) -> Self {
        self.skip_names = skip_names;
        self
    }
}

/// Raw documents for one configuration, before entity assembly.
///
/// Loading is the only phase that touches the filesystem; every referenced
/// detail document is read here so a missing one fails the run up front.
#[derive(Debug)]
pub struct RawSnapshot {
    pub configuration: Configuration,
    pub target_documents: Vec<TargetDocument>,
    pub directory_documents: Vec<DirectoryDocument>,
}

impl RawSnapshot {
    /// Load every detail document referenced by a configuration.
    pub fn load(reply: &Path, configuration: Configuration) -> Result<Self> {
        let mut target_documents = Vec::with_capacity(configuration.targets.len());
        for entry in &configuration.targets {
            let doc: TargetDocument = api::read_json(&reply.join(&entry.json_file))
                .map_err(|e| e.with_operation("snapshot::load").with_context("target", &entry.name))?;
            target_documents.push(doc);
        }

        let mut directory_documents = Vec::with_capacity(configuration.directories.len());
        for entry in &configuration.directories {
            let doc: DirectoryDocument = api::read_json(&reply.join(&entry.json_file)).map_err(
                |e| {
                    e.with_operation("snapshot::load")
                        .with_context("directory", &entry.source)
                },
            )?;
            directory_documents.push(doc);
        }

        Ok(Self {
            configuration,
            target_documents,
            directory_documents,
        })
    }
}

/// One loaded configuration: entities plus derived dependency records.
#[derive(Debug)]
pub struct Snapshot {
    /// Configuration name (e.g. "Debug").
    pub name: String,
    pub projects: Vec<Project>,
    pub directories: Vec<Directory>,
    pub targets: Vec<Target>,
    /// Per-target resolved dependency indices, order and duplicates preserved.
    pub resolved: Vec<Vec<usize>>,
    /// Dependency records in creation order.
    pub dependencies: Vec<Dependency>,
}

impl Snapshot {
    /// Assemble entities and dependency records from raw documents.
    ///
    /// Pure transformation: no filesystem access. Fails on the first
    /// unresolved dependency id or ambiguous definition site.
    pub fn assemble(raw: RawSnapshot, opts: &SnapshotOptions) -> Result<Self> {
        let RawSnapshot {
            configuration,
            target_documents,
            // Existence-checked during load; content unused by the core.
            directory_documents: _,
        } = raw;

        let projects: Vec<Project> = configuration
            .projects
            .iter()
            .map(|entry| Project {
                name: entry.name.clone(),
                parent_index: entry.parent_index,
                child_indexes: entry.child_indexes.clone(),
                target_indexes: entry.target_indexes.clone(),
                directory_indexes: entry.directory_indexes.clone(),
            })
            .collect();

        let directories: Vec<Directory> = configuration
            .directories
            .iter()
            .map(|entry| Directory {
                source_path: entry.source.clone(),
                project_index: entry.project_index,
                child_indexes: entry.child_indexes.clone(),
                target_indexes: entry.target_indexes.clone(),
            })
            .collect();

        let mut targets = Vec::with_capacity(target_documents.len());
        for (entry, doc) in configuration.targets.iter().zip(target_documents) {
            let mut target = build_target(entry.project_index, entry.directory_index, doc)?;
            target.skipped = is_skipped(&target, opts);
            targets.push(target);
        }

        let resolved = resolve_dependency_indexes(&targets)?;
        let snapshot = Self::from_entities(
            configuration.name,
            projects,
            directories,
            targets,
            resolved,
            opts.per_project,
        );

        debug!(
            configuration = %snapshot.name,
            projects = snapshot.projects.len(),
            directories = snapshot.directories.len(),
            targets = snapshot.targets.len(),
            dependencies = snapshot.dependencies.len(),
            "snapshot assembled"
        );

        Ok(snapshot)
    }

    /// Construct a snapshot from pre-built entities and resolved dependency
    /// index lists, deriving dependency records the same way [`Self::assemble`]
    /// does. Useful for tests and tools that bypass the file API.
    pub fn from_entities(
        name: String,
        projects: Vec<Project>,
        directories: Vec<Directory>,
        targets: Vec<Target>,
        resolved: Vec<Vec<usize>>,
        per_project: bool,
    ) -> Self {
        let opts = SnapshotOptions::default().with_per_project(per_project);
        let dependencies = derive_dependencies(&projects, &targets, &resolved, &opts);
        Self {
            name,
            projects,
            directories,
            targets,
            resolved,
            dependencies,
        }
    }

}

/// Load every configuration snapshot from a build directory.
pub fn load_snapshots(build_dir: &Path, opts: &SnapshotOptions) -> Result<Vec<Snapshot>> {
    let reply = api::reply_dir(build_dir)?;
    let index_file = api::find_reply_index(&reply)?;
    let codemodel_file = api::codemodel_path(&reply, &index_file)?;
    let codemodel: Codemodel = api::read_json(&codemodel_file)?;

    let mut snapshots = Vec::with_capacity(codemodel.configurations.len());
    for configuration in codemodel.configurations {
        let raw = RawSnapshot::load(&reply, configuration)?;
        snapshots.push(Snapshot::assemble(raw, opts)?);
    }
    Ok(snapshots)
}

fn build_target(project_index: usize, directory_index: usize, doc: TargetDocument) -> Result<Target> {
    let definition = definition_site(&doc)?;
    let ty = TargetType::parse(&doc.target_type);

    let sources: Vec<String> = doc.sources.iter().map(|s| s.path.clone()).collect();

    let compile_groups: Vec<CompileGroup> = doc
        .compile_groups
        .iter()
        .map(|group| CompileGroup {
            sources: group
                .source_indexes
                .iter()
                .filter_map(|&index| sources.get(index).cloned())
                .collect(),
            includes: group.includes.iter().map(|i| i.path.clone()).collect(),
            defines: group.defines.iter().map(|d| d.define.clone()).collect(),
        })
        .collect();

    let install_paths = doc.install.as_ref().map(|install| {
        install
            .destinations
            .iter()
            .map(|dest| join_install_path(&install.prefix.path, &dest.path))
            .collect()
    });

    let dependency_ids = doc.dependencies.iter().map(|d| d.id.clone()).collect();

    Ok(Target::new(
        doc.id,
        doc.name,
        ty,
        project_index,
        directory_index,
        dependency_ids,
        sources,
        install_paths,
        compile_groups,
        definition,
    ))
}

/// Extract the single declaration site from a target's provenance table.
///
/// Exactly one declaring command must exist; zero or several is a
/// data-integrity error on the snapshot.
fn definition_site(doc: &TargetDocument) -> Result<DefinitionSite> {
    let graph = &doc.backtrace_graph;

    let definitions: Vec<usize> = graph
        .commands
        .iter()
        .enumerate()
        .filter(|(_, command)| DEFINE_COMMANDS.contains(&command.as_str()))
        .map(|(index, _)| index)
        .collect();

    if definitions.len() != 1 {
        return Err(Error::ambiguous_definition_site(&doc.name, definitions.len())
            .with_operation("snapshot::definition_site"));
    }
    let definition = definitions[0];
    let command = graph.commands[definition].clone();

    let node = graph
        .nodes
        .iter()
        .find(|node| node.command == Some(definition))
        .ok_or_else(|| {
            Error::ambiguous_definition_site(&doc.name, 0)
                .with_operation("snapshot::definition_site")
                .with_context("reason", "no provenance node references the declaration")
        })?;

    let file = graph.files.get(node.file).cloned().unwrap_or_default();

    Ok(DefinitionSite {
        command,
        file,
        line: node.line,
    })
}

/// Resolve every target's dependency ids to positions in the global target
/// sequence, preserving order and duplicates.
fn resolve_dependency_indexes(targets: &[Target]) -> Result<Vec<Vec<usize>>> {
    let by_id: HashMap<&str, usize> = targets
        .iter()
        .enumerate()
        .map(|(index, target)| (target.id.as_str(), index))
        .collect();

    let mut resolved = Vec::with_capacity(targets.len());
    for target in targets {
        let mut indexes = Vec::with_capacity(target.dependency_ids.len());
        for dep_id in &target.dependency_ids {
            let Some(&index) = by_id.get(dep_id.as_str()) else {
                return Err(Error::unresolved_dependency(&target.name, dep_id)
                    .with_operation("snapshot::resolve_dependencies"));
            };
            indexes.push(index);
        }
        resolved.push(indexes);
    }
    Ok(resolved)
}

/// Derive dependency records in creation order: source targets in sequence
/// order, each source's destinations in raw list order.
fn derive_dependencies(
    projects: &[Project],
    targets: &[Target],
    resolved: &[Vec<usize>],
    opts: &SnapshotOptions,
) -> Vec<Dependency> {
    let mut dependencies = Vec::new();

    for (source, indexes) in resolved.iter().enumerate() {
        if targets[source].skipped {
            continue;
        }
        let dep_set: HashSet<usize> = indexes.iter().copied().collect();

        for &dest in indexes {
            if targets[dest].skipped {
                continue;
            }
            let dest_project = &projects[targets[dest].project_index];
            let full_dep = opts.per_project && dest_project.full_dependence(&dep_set);
            let same_project = targets[source].project_index == targets[dest].project_index;
            dependencies.push(Dependency {
                source,
                dest,
                same_project,
                full_dep,
            });
        }
    }

    dependencies
}

fn is_skipped(target: &Target, opts: &SnapshotOptions) -> bool {
    let ty: &'static str = target.ty.into();
    if opts.skip_types.as_ref().is_some_and(|re| re.is_match(ty)) {
        return true;
    }
    opts.skip_names
        .as_ref()
        .is_some_and(|re| re.is_match(&target.name))
}

fn join_install_path(prefix: &str, destination: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), destination)
}
