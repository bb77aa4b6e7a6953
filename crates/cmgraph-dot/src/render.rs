//! Renderer: abstract target graph to DOT text.
//!
//! Clusters nest top-level → project → directory. Edges are declared in the
//! scope the graph assigned them (an ancestor of both endpoints' clusters),
//! which Graphviz-family engines require for `compound` edges.

use std::fmt::Write;

use tracing::debug;

use cmgraph_graph::{Edge, Node, NodeKind, Scope, ScopeId, ScopeKind, TargetGraph};

use crate::dot::{escape_label, sanitize_id, shape_for_type, write_indent};

/// Options for DOT rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Layout direction passed through to the renderer (`rankdir`),
    /// uninterpreted by this crate.
    pub rankdir: Option<String>,
    /// Graph background color.
    pub bgcolor: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            rankdir: None,
            bgcolor: "white".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rankdir(mut self, rankdir: Option<String>) -> Self {
        self.rankdir = rankdir;
        self
    }
}

/// Render the target graph to DOT.
pub fn render_graph(graph: &TargetGraph, options: &RenderOptions) -> String {
    let estimated = graph.nodes.len() * 150 + graph.edges.len() * 80 + 256;
    let mut output = String::with_capacity(estimated);

    let _ = writeln!(output, "digraph {} {{", sanitize_id(&graph.name));
    output.push_str("  compound=true;\n");
    let _ = writeln!(output, "  bgcolor=\"{}\";", escape_label(&options.bgcolor));
    if let Some(rankdir) = &options.rankdir {
        let _ = writeln!(output, "  rankdir={};", sanitize_id(rankdir));
    }
    output.push('\n');

    render_scope_body(&mut output, graph, TargetGraph::ROOT, 1);

    // Top-level edges come last so every node is declared before use.
    for edge in graph.edges_in_scope(TargetGraph::ROOT) {
        render_edge(&mut output, graph, edge, 1);
    }

    output.push_str("}\n");
    debug!(bytes = output.len(), "dot rendered");
    output
}

/// Render a scope's child clusters and own nodes. Non-root scopes also
/// declare their edges here, inside the cluster block.
fn render_scope_body(output: &mut String, graph: &TargetGraph, scope_id: ScopeId, indent: usize) {
    let scope = &graph.scopes[scope_id];

    for &child in &scope.children {
        render_cluster(output, graph, child, indent);
    }

    for &node_id in &scope.nodes {
        render_node(output, &graph.nodes[node_id], indent);
    }

    if scope_id != TargetGraph::ROOT {
        for edge in graph.edges_in_scope(scope_id) {
            render_edge(output, graph, edge, indent);
        }
    }
}

fn render_cluster(output: &mut String, graph: &TargetGraph, scope_id: ScopeId, indent: usize) {
    let scope = &graph.scopes[scope_id];

    write_indent(output, indent);
    let _ = writeln!(output, "subgraph {} {{", cluster_id(scope_id, scope));
    let inner = indent + 1;

    write_indent(output, inner);
    let _ = writeln!(output, "label=\"{}\";", escape_label(&scope.label));

    match scope.kind {
        ScopeKind::Project(_) => {
            write_indent(output, inner);
            output.push_str("class=\"project\";\n");
            write_indent(output, inner);
            output.push_str("style=dotted;\n");
            if let Some(tooltip) = &scope.tooltip {
                write_indent(output, inner);
                let _ = writeln!(output, "tooltip=\"{}\";", escape_label(tooltip));
            }
        }
        ScopeKind::Directory(_) => {
            write_indent(output, inner);
            output.push_str("class=\"directory\";\n");
            write_indent(output, inner);
            output.push_str("labeljust=l;\n");
            write_indent(output, inner);
            output.push_str("style=dotted;\n");
            write_indent(output, inner);
            output.push_str("penwidth=0;\n");
        }
        ScopeKind::Root => {}
    }
    output.push('\n');

    render_scope_body(output, graph, scope_id, inner);

    write_indent(output, indent);
    output.push_str("}\n\n");
}

fn render_node(output: &mut String, node: &Node, indent: usize) {
    write_indent(output, indent);
    let _ = write!(output, "{}[label=\"{}\"", node.id, escape_label(&node.label));

    match node.kind {
        NodeKind::Target(_) => {
            if let Some(ty) = node.ty {
                let _ = write!(output, ", shape={}", shape_for_type(ty));
            }
            let _ = write!(output, ", class=\"node\"");
        }
        NodeKind::ProjectAnchor(_) => {
            let _ = write!(output, ", shape=point, style=invis");
        }
        NodeKind::Hub => {
            let _ = write!(output, ", shape=box3d, class=\"hub\"");
        }
    }

    if let Some(tooltip) = &node.tooltip {
        let _ = write!(output, ", tooltip=\"{}\"", escape_label(tooltip));
    }
    output.push_str("];\n");
}

fn render_edge(output: &mut String, graph: &TargetGraph, edge: &Edge, indent: usize) {
    write_indent(output, indent);
    let from = &graph.nodes[edge.from].id;
    let to = &graph.nodes[edge.to].id;
    let _ = write!(output, "{} -> {} [style={}", from, to, edge.style.as_str());

    if let Some(lhead) = edge.lhead {
        let _ = write!(output, ", lhead={}", cluster_id(lhead, &graph.scopes[lhead]));
    }
    if let Some(tooltip) = &edge.tooltip {
        let _ = write!(output, ", tooltip=\"{}\"", escape_label(tooltip));
    }
    output.push_str("];\n");
}

/// Cluster identifiers derive from scope indices, so they are unique even
/// when two projects or directories share a name.
fn cluster_id(scope_id: ScopeId, scope: &Scope) -> String {
    match scope.kind {
        ScopeKind::Project(index) => format!("cluster_p{index}"),
        ScopeKind::Directory(index) => format!("cluster_d{index}"),
        ScopeKind::Root => format!("cluster_s{scope_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmgraph_graph::{ReduceOptions, build_target_graph};
    use cmgraph_model::{
        DefinitionSite, Directory, Project, Snapshot, Target, TargetType,
    };
    use pretty_assertions::assert_eq;

    fn make_target(name: &str, ty: TargetType, project: usize, directory: usize) -> Target {
        Target::new(
            format!("{name}::@fx"),
            name.to_string(),
            ty,
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

    /// foo -> {bar, baz} in one project and directory.
    fn simple_snapshot() -> Snapshot {
        Snapshot::from_entities(
            "Debug".to_string(),
            vec![Project {
                name: "root".to_string(),
                parent_index: None,
                child_indexes: vec![],
                target_indexes: vec![0, 1, 2],
                directory_indexes: vec![0],
            }],
            vec![Directory {
                source_path: ".".to_string(),
                project_index: 0,
                child_indexes: vec![],
                target_indexes: vec![0, 1, 2],
            }],
            vec![
                make_target("foo", TargetType::Executable, 0, 0),
                make_target("bar", TargetType::StaticLibrary, 0, 0),
                make_target("baz", TargetType::Unknown, 0, 0),
            ],
            vec![vec![1, 2], vec![], vec![]],
            true,
        )
    }

    fn render_simple() -> String {
        let mut snapshot = simple_snapshot();
        let graph = build_target_graph(&mut snapshot, &ReduceOptions::default()).unwrap();
        render_graph(&graph, &RenderOptions::default())
    }

    #[test]
    fn test_render_structure() {
        let dot = render_simple();

        assert!(dot.starts_with("digraph targetgraph_Debug {\n"));
        assert!(dot.contains("compound=true;"));
        assert!(dot.contains("bgcolor=\"white\";"));
        assert!(dot.contains("subgraph cluster_p0 {"));
        assert!(dot.contains("subgraph cluster_d0 {"));
        assert!(dot.contains("label=\"📁 .\";"));

        // nodes carry type-derived shapes
        assert!(dot.contains("shape=egg"));
        assert!(dot.contains("shape=octagon"));
        assert!(dot.contains("shape=septagon"));

        // anchor point exists but is invisible
        assert!(dot.contains("anchor_p0[label=\"root\", shape=point, style=invis];"));

        // same-project edges live inside the project cluster
        assert!(dot.contains("t0 -> t1 [style=dashed];"));
        assert!(dot.contains("t0 -> t2 [style=dashed];"));
    }

    #[test]
    fn test_render_rankdir_pass_through() {
        let mut snapshot = simple_snapshot();
        let graph = build_target_graph(&mut snapshot, &ReduceOptions::default()).unwrap();
        let options = RenderOptions::new().with_rankdir(Some("LR".to_string()));

        let dot = render_graph(&graph, &options);
        assert!(dot.contains("rankdir=LR;"));
        assert!(!render_simple().contains("rankdir"));
    }

    #[test]
    fn test_render_full_project_edge_lhead() {
        let mut snapshot = Snapshot::from_entities(
            "Debug".to_string(),
            vec![
                Project {
                    name: "root".to_string(),
                    parent_index: None,
                    child_indexes: vec![],
                    target_indexes: vec![0],
                    directory_indexes: vec![0],
                },
                Project {
                    name: "q".to_string(),
                    parent_index: Some(0),
                    child_indexes: vec![],
                    target_indexes: vec![1],
                    directory_indexes: vec![1],
                },
            ],
            vec![
                Directory {
                    source_path: ".".to_string(),
                    project_index: 0,
                    child_indexes: vec![],
                    target_indexes: vec![0],
                },
                Directory {
                    source_path: "q".to_string(),
                    project_index: 1,
                    child_indexes: vec![],
                    target_indexes: vec![1],
                },
            ],
            vec![
                make_target("x", TargetType::Executable, 0, 0),
                make_target("q_core", TargetType::StaticLibrary, 1, 1),
            ],
            vec![vec![1], vec![]],
            true,
        );
        let graph = build_target_graph(&mut snapshot, &ReduceOptions::default()).unwrap();
        let dot = render_graph(&graph, &RenderOptions::default());

        assert!(dot.contains(
            "t0 -> anchor_p1 [style=dashed, lhead=cluster_p1, tooltip=\"all targets from\\nq\"];"
        ));
    }

    /// Re-running the full transform on an identical snapshot reproduces an
    /// identical document.
    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render_simple(), render_simple());

        let hub_render = || {
            let mut targets = Vec::new();
            for i in 0..6 {
                targets.push(make_target(&format!("lib{i}"), TargetType::StaticLibrary, 0, 0));
            }
            for i in 0..12 {
                targets.push(make_target(&format!("user{i}"), TargetType::Executable, 0, 1));
            }
            let mut resolved = vec![vec![]; 6];
            resolved.extend(std::iter::repeat_n((0..6).collect::<Vec<_>>(), 12));

            let mut snapshot = Snapshot::from_entities(
                "Debug".to_string(),
                vec![Project {
                    name: "root".to_string(),
                    parent_index: None,
                    child_indexes: vec![],
                    target_indexes: (0..18).collect(),
                    directory_indexes: vec![0, 1],
                }],
                vec![
                    Directory {
                        source_path: "libs".to_string(),
                        project_index: 0,
                        child_indexes: vec![],
                        target_indexes: (0..6).collect(),
                    },
                    Directory {
                        source_path: "apps".to_string(),
                        project_index: 0,
                        child_indexes: vec![],
                        target_indexes: (6..18).collect(),
                    },
                ],
                targets,
                resolved,
                false,
            );
            let graph = build_target_graph(&mut snapshot, &ReduceOptions::default()).unwrap();
            render_graph(&graph, &RenderOptions::default())
        };

        let first = hub_render();
        assert_eq!(first, hub_render());
        assert!(first.contains("hub[label=\"6 shared deps (12 dependents)\""));
        assert!(first.contains("hub -> t0 [style=dotted];"));
        assert!(first.contains("t6 -> hub [style=dotted];"));
    }
}
