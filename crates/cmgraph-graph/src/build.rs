//! Abstract graph assembly.
//!
//! Construction is two-phase: the snapshot's entities already exist when
//! this runs, the analysis passes (markers, hub, classification) decide what
//! to draw, and one explicit materialization pass then creates every scope,
//! node, and edge. No rendering handle is created lazily.

use tracing::info;

use cmgraph_error::Result;
use cmgraph_model::Snapshot;

use crate::classify::{ClassifiedEdge, classify_edges};
use crate::hub::{Hub, select_hub};
use crate::markers::{MarkerAlphabet, detect_frequent};
use crate::types::{Edge, EdgeStyle, NodeId, NodeKind, ScopeKind, TargetGraph};

/// Default usage-count cutoff for "frequent".
pub const DEFAULT_FREQUENT_THRESHOLD: usize = 5;

/// Options for graph reduction.
#[derive(Debug, Clone, Copy)]
pub struct ReduceOptions {
    /// Usage-count cutoff above which a dependency target counts as frequent.
    pub frequent_threshold: usize,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            frequent_threshold: DEFAULT_FREQUENT_THRESHOLD,
        }
    }
}

impl ReduceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frequent_threshold(mut self, threshold: usize) -> Self {
        self.frequent_threshold = threshold;
        self
    }
}

/// Build the abstract target graph for one snapshot.
///
/// Runs the analysis passes in order, then materializes the result. Every
/// step is deterministic given the snapshot's iteration order.
pub fn build_target_graph(snapshot: &mut Snapshot, opts: &ReduceOptions) -> Result<TargetGraph> {
    let mut alphabet = MarkerAlphabet::new();
    let frequent = detect_frequent(snapshot, opts.frequent_threshold, &mut alphabet)?;
    let hub = select_hub(snapshot, &frequent, opts.frequent_threshold);
    let classified = classify_edges(snapshot, &frequent, hub.as_ref());

    let graph = materialize(snapshot, hub.as_ref(), &classified);
    info!(
        configuration = %snapshot.name,
        frequent = frequent.len(),
        hub = hub.is_some(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "target graph built"
    );
    Ok(graph)
}

/// Materialize scopes, nodes, and edges in one explicit pass.
fn materialize(snapshot: &Snapshot, hub: Option<&Hub>, classified: &[ClassifiedEdge]) -> TargetGraph {
    let mut graph = TargetGraph::new(format!("targetgraph-{}", snapshot.name));

    // Project scopes, attached root-first so the forest mirrors the
    // codemodel's parent/child structure.
    let mut project_scopes = Vec::with_capacity(snapshot.projects.len());
    for (index, project) in snapshot.projects.iter().enumerate() {
        let sources: Vec<&str> = project
            .directory_indexes
            .iter()
            .filter_map(|&dir| snapshot.directories.get(dir))
            .map(|dir| dir.source_path.as_str())
            .collect();
        let tooltip = (!sources.is_empty()).then(|| sources.join("\n"));
        project_scopes.push(graph.add_scope(ScopeKind::Project(index), project.name.clone(), tooltip));
    }
    for (index, project) in snapshot.projects.iter().enumerate() {
        let parent = project
            .parent_index
            .map_or(TargetGraph::ROOT, |p| project_scopes[p]);
        graph.attach(parent, project_scopes[index]);
    }

    // One directory scope per directory, nested in its project's scope.
    let mut directory_scopes = Vec::with_capacity(snapshot.directories.len());
    for (index, directory) in snapshot.directories.iter().enumerate() {
        let scope = graph.add_scope(
            ScopeKind::Directory(index),
            format!("📁 {}", directory.source_path),
            None,
        );
        graph.attach(project_scopes[directory.project_index], scope);
        directory_scopes.push(scope);
    }

    // Every project gets an anchor node for whole-project edges.
    let mut anchor_nodes = Vec::with_capacity(snapshot.projects.len());
    for (index, project) in snapshot.projects.iter().enumerate() {
        anchor_nodes.push(graph.add_node(
            project_scopes[index],
            format!("anchor_p{index}"),
            NodeKind::ProjectAnchor(index),
            project.name.clone(),
            None,
            None,
        ));
    }

    // Target nodes, placed by directory.
    let mut target_nodes: Vec<Option<NodeId>> = vec![None; snapshot.targets.len()];
    for (index, target) in snapshot.targets.iter().enumerate() {
        if target.skipped {
            continue;
        }
        let scope = directory_scopes
            .get(target.directory_index)
            .copied()
            .unwrap_or(project_scopes[target.project_index]);
        target_nodes[index] = Some(graph.add_node(
            scope,
            format!("t{index}"),
            NodeKind::Target(index),
            target.display_label(),
            Some(target_tooltip(snapshot, index)),
            Some(target.ty),
        ));
    }

    // Hub node and its member edges live in the top-level scope.
    let hub_node = hub.map(|hub| {
        let node = graph.add_node(
            TargetGraph::ROOT,
            "hub",
            NodeKind::Hub,
            format!(
                "{} shared deps ({} dependents)",
                hub.members.len(),
                hub.recurrence
            ),
            Some(hub_tooltip(snapshot, hub)),
            None,
        );
        for &member in &hub.members {
            if let Some(to) = target_nodes[member] {
                graph.add_edge(Edge {
                    from: node,
                    to,
                    style: EdgeStyle::Dotted,
                    tooltip: None,
                    lhead: None,
                    scope: TargetGraph::ROOT,
                });
            }
        }
        node
    });

    for edge in classified {
        match *edge {
            ClassifiedEdge::Hub { source } => {
                let (Some(from), Some(to)) = (target_nodes[source], hub_node) else {
                    continue;
                };
                graph.add_edge(Edge {
                    from,
                    to,
                    style: EdgeStyle::Dotted,
                    tooltip: None,
                    lhead: None,
                    scope: TargetGraph::ROOT,
                });
            }
            ClassifiedEdge::Project {
                source,
                project,
                style,
                same_project,
            } => {
                let Some(from) = target_nodes[source] else {
                    continue;
                };
                let scope = if same_project {
                    project_scopes[snapshot.targets[source].project_index]
                } else {
                    TargetGraph::ROOT
                };
                graph.add_edge(Edge {
                    from,
                    to: anchor_nodes[project],
                    style,
                    tooltip: Some(format!(
                        "all targets from\n{}",
                        snapshot.projects[project].name
                    )),
                    lhead: Some(project_scopes[project]),
                    scope,
                });
            }
            ClassifiedEdge::Direct {
                source,
                dest,
                same_project,
            } => {
                let (Some(from), Some(to)) = (target_nodes[source], target_nodes[dest]) else {
                    continue;
                };
                let scope = if same_project {
                    project_scopes[snapshot.targets[source].project_index]
                } else {
                    TargetGraph::ROOT
                };
                graph.add_edge(Edge {
                    from,
                    to,
                    style: EdgeStyle::Dashed,
                    tooltip: None,
                    lhead: None,
                    scope,
                });
            }
        }
    }

    graph
}

/// Tooltip for a target node: type, definition site, and dependency detail.
fn target_tooltip(snapshot: &Snapshot, index: usize) -> String {
    let target = &snapshot.targets[index];
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("type={}", target.ty));
    lines.push(target.definition.to_string());
    lines.push(format!("len(depends)={}", snapshot.resolved[index].len()));

    let mut dep_lines: Vec<String> = snapshot.resolved[index]
        .iter()
        .map(|&dep| {
            let dep_target = &snapshot.targets[dep];
            format!(
                "{}: {}",
                snapshot.projects[dep_target.project_index].name, dep_target.name
            )
        })
        .collect();
    dep_lines.sort();
    lines.push(join_section("deps:", &dep_lines));

    if let Some(installs) = &target.install_paths {
        lines.push(join_section("installs:", installs));
    }

    if !target.compile_groups.is_empty() {
        lines.push("compile_groups:".to_string());
        for group in &target.compile_groups {
            lines.push(join_section("includes:", &group.includes));
            lines.push(join_section("defines:", &group.defines));
            lines.push(join_section("sources:", &group.sources));
        }
    }

    lines.join("\n")
}

/// Tooltip for the hub: members sorted by owning-project name.
fn hub_tooltip(snapshot: &Snapshot, hub: &Hub) -> String {
    let mut entries: Vec<(String, String)> = hub
        .members
        .iter()
        .map(|&member| {
            let target = &snapshot.targets[member];
            let project = snapshot.projects[target.project_index].name.clone();
            let marker = target.marker().map_or("?", |m| m.symbol);
            let line = format!("{}: {} @{}", project, target.name, marker);
            (project, line)
        })
        .collect();
    entries.sort();
    entries
        .into_iter()
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_section(header: &str, items: &[String]) -> String {
    let mut section = header.to_string();
    for item in items {
        section.push('\n');
        section.push_str(item);
    }
    section
}
