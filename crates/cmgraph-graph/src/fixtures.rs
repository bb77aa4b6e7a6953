//! Shared snapshot fixtures for unit tests.

use cmgraph_model::{DefinitionSite, Directory, Project, Snapshot, Target, TargetType};

pub fn make_target(name: &str, project: usize, directory: usize) -> Target {
    Target::new(
        format!("{name}::@fx"),
        name.to_string(),
        TargetType::StaticLibrary,
        project,
        directory,
        Vec::new(),
        Vec::new(),
        None,
        Vec::new(),
        DefinitionSite {
            command: "add_library".to_string(),
            file: "CMakeLists.txt".to_string(),
            line: Some(1),
        },
    )
}

pub fn make_project(name: &str, target_indexes: Vec<usize>, directory_indexes: Vec<usize>) -> Project {
    Project {
        name: name.to_string(),
        parent_index: None,
        child_indexes: Vec::new(),
        target_indexes,
        directory_indexes,
    }
}

pub fn make_directory(source: &str, project: usize, target_indexes: Vec<usize>) -> Directory {
    Directory {
        source_path: source.to_string(),
        project_index: project,
        child_indexes: Vec::new(),
        target_indexes,
    }
}

/// Snapshot from entities plus per-target resolved dependency index lists.
pub fn make_snapshot(
    projects: Vec<Project>,
    directories: Vec<Directory>,
    targets: Vec<Target>,
    resolved: Vec<Vec<usize>>,
    per_project: bool,
) -> Snapshot {
    Snapshot::from_entities(
        "Debug".to_string(),
        projects,
        directories,
        targets,
        resolved,
        per_project,
    )
}
