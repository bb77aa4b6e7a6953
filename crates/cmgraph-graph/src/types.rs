//! Core types for the abstract target graph.
//!
//! The graph is an arena of scopes, nodes, and edges. Scopes nest
//! (top-level → project → directory) and own the nodes drawn inside them;
//! edges carry the style/tooltip/cluster metadata the renderer needs and
//! name the scope they are declared in, which must be an ancestor of both
//! endpoints' scopes.

use cmgraph_model::TargetType;

/// Index of a scope in [`TargetGraph::scopes`].
pub type ScopeId = usize;

/// Index of a node in [`TargetGraph::nodes`].
pub type NodeId = usize;

/// Rendering style of a drawn edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    /// Ordinary dependency edge.
    Dashed,
    /// Hub membership or hub redirect.
    Dotted,
    /// Present for layout purposes, not visible.
    Invis,
}

impl EdgeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStyle::Dashed => "dashed",
            EdgeStyle::Dotted => "dotted",
            EdgeStyle::Invis => "invis",
        }
    }
}

/// What a scope represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The outermost graph scope.
    Root,
    /// A project cluster (index into the snapshot's project sequence).
    Project(usize),
    /// A directory cluster (index into the snapshot's directory sequence).
    Directory(usize),
}

/// A nested visual grouping region.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub label: String,
    pub tooltip: Option<String>,
    pub children: Vec<ScopeId>,
    pub nodes: Vec<NodeId>,
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A build target (index into the snapshot's target sequence).
    Target(usize),
    /// The invisible anchor point of a project cluster, for edges that mean
    /// "the whole project".
    ProjectAnchor(usize),
    /// The synthetic shared-dependency hub.
    Hub,
}

/// A drawable node.
#[derive(Debug)]
pub struct Node {
    /// Renderer-safe identifier, unique within the graph.
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub tooltip: Option<String>,
    /// Shape source for target nodes; anchors and hubs have none.
    pub ty: Option<TargetType>,
}

/// A drawable edge.
#[derive(Debug)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub style: EdgeStyle,
    pub tooltip: Option<String>,
    /// Cluster the edge visually terminates at (full-project edges).
    pub lhead: Option<ScopeId>,
    /// Scope the edge is declared in.
    pub scope: ScopeId,
}

/// The abstract graph handed to the renderer.
#[derive(Debug)]
pub struct TargetGraph {
    pub name: String,
    /// Scope arena; `scopes[ROOT]` is the top-level scope.
    pub scopes: Vec<Scope>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl TargetGraph {
    pub const ROOT: ScopeId = 0;

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Scope {
            kind: ScopeKind::Root,
            label: name.clone(),
            tooltip: None,
            children: Vec::new(),
            nodes: Vec::new(),
        };
        Self {
            name,
            scopes: vec![root],
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add an unattached scope; wire it to a parent with [`Self::attach`].
    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        label: impl Into<String>,
        tooltip: Option<String>,
    ) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            kind,
            label: label.into(),
            tooltip,
            children: Vec::new(),
            nodes: Vec::new(),
        });
        id
    }

    /// Attach `child` under `parent` in the scope tree.
    pub fn attach(&mut self, parent: ScopeId, child: ScopeId) {
        self.scopes[parent].children.push(child);
    }

    /// Add a node inside `scope`.
    pub fn add_node(
        &mut self,
        scope: ScopeId,
        id: impl Into<String>,
        kind: NodeKind,
        label: impl Into<String>,
        tooltip: Option<String>,
        ty: Option<TargetType>,
    ) -> NodeId {
        let node_id = self.nodes.len();
        self.nodes.push(Node {
            id: id.into(),
            kind,
            label: label.into(),
            tooltip,
            ty,
        });
        self.scopes[scope].nodes.push(node_id);
        node_id
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// The node representing the hub, if one was created.
    pub fn hub_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Hub)
    }

    /// Edges declared in a given scope, in creation order.
    pub fn edges_in_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.scope == scope)
    }
}
