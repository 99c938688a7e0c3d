use std::collections::{BTreeMap, HashMap};
use std::fmt;

use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::object::{ObjectId, ObjectKind};

/// Semantic kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Relation {
    /// Commit to its root tree, or tree to one of its entries.
    Tree,
    /// Commit to a parent commit.
    Parent,
    /// Annotated tag to the object it names.
    #[strum(to_string = "object")]
    TagTarget,
    /// Tree entry pointing at a commit of another repository (gitlink).
    Submodule,
    /// Local branch to its tip commit.
    Local,
    /// Remote-tracking branch to its tip commit.
    Remote,
    /// Local branch to the branch it follows.
    Tracks,
    /// HEAD to the checked-out branch, or to a commit when detached.
    Head,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BranchScope {
    Local,
    Remote,
}

/// Identity of a node in the model.
///
/// Branch keys carry their scope, so `main` and `origin/main` and a local
/// branch literally named `origin/main` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Object(ObjectId),
    Branch(BranchScope, String),
    Head,
}

impl NodeKey {
    pub fn local(name: impl Into<String>) -> Self {
        NodeKey::Branch(BranchScope::Local, name.into())
    }

    pub fn remote(name: impl Into<String>) -> Self {
        NodeKey::Branch(BranchScope::Remote, name.into())
    }

    pub fn object_id(&self) -> Option<&ObjectId> {
        match self {
            NodeKey::Object(id) => Some(id),
            _ => None,
        }
    }
}

impl From<ObjectId> for NodeKey {
    fn from(id: ObjectId) -> Self {
        NodeKey::Object(id)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Object(id) => write!(f, "{id}"),
            NodeKey::Branch(scope, name) => write!(f, "{scope}:{name}"),
            NodeKey::Head => f.write_str("HEAD"),
        }
    }
}

/// Visual role of a synthetic branch node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BranchRole {
    Local,
    Remote,
    Head,
    /// Placeholder for a branch HEAD names but that has no commits yet.
    Missing,
}

impl From<BranchScope> for BranchRole {
    fn from(scope: BranchScope) -> Self {
        match scope {
            BranchScope::Local => BranchRole::Local,
            BranchScope::Remote => BranchRole::Remote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object(ObjectKind),
    Branch(BranchRole),
}

impl NodeKind {
    pub fn group(&self) -> NodeGroup {
        match self {
            NodeKind::Branch(_) => NodeGroup::Branch,
            NodeKind::Object(ObjectKind::Commit) => NodeGroup::Commit,
            NodeKind::Object(ObjectKind::Tree) => NodeGroup::Tree,
            NodeKind::Object(ObjectKind::Blob) => NodeGroup::Blob,
            NodeKind::Object(ObjectKind::Tag) => NodeGroup::Tag,
            NodeKind::Object(ObjectKind::Unknown) => NodeGroup::Unknown,
        }
    }
}

/// Output grouping of nodes. Declaration order is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum NodeGroup {
    Branch,
    Commit,
    Tree,
    Blob,
    Tag,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub key: NodeKey,
    pub kind: NodeKind,
    /// Human-readable name: tree entry name, tag name or branch name.
    pub name: Option<String>,
}

impl GraphNode {
    pub fn object(id: ObjectId, kind: ObjectKind, name: Option<String>) -> Self {
        Self {
            key: NodeKey::Object(id),
            kind: NodeKind::Object(kind),
            name,
        }
    }

    pub fn branch(key: NodeKey, role: BranchRole, name: impl Into<String>) -> Self {
        Self {
            key,
            kind: NodeKind::Branch(role),
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphEdge {
    pub from: NodeKey,
    pub to: NodeKey,
    pub relation: Relation,
    /// Child kind recorded by a tree entry; `None` for every other edge.
    pub entry_kind: Option<ObjectKind>,
}

impl GraphEdge {
    /// Tree entries are labelled by the kind the entry declares (`blob`,
    /// `tree`); every other edge by its relation.
    pub fn label(&self) -> &'static str {
        match (self.relation, self.entry_kind) {
            (Relation::Tree, Some(kind)) => kind.as_str(),
            (relation, _) => relation.as_str(),
        }
    }
}

/// The node/edge model of one run.
///
/// Append-only: a node, once added, is never replaced, and edges are kept
/// in insertion order including duplicates.
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<NodeKey, usize>,
    edges: Vec<GraphEdge>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless one with the same key exists. Returns whether it was added.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.key) {
            return false;
        }
        self.index.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, from: NodeKey, to: NodeKey, relation: Relation) {
        self.add_entry_edge(from, to, relation, None);
    }

    /// Add an edge that also records the child kind a tree entry declares.
    pub fn add_entry_edge(
        &mut self,
        from: NodeKey,
        to: NodeKey,
        relation: Relation,
        entry_kind: Option<ObjectKind>,
    ) {
        self.edges.push(GraphEdge {
            from,
            to,
            relation,
            entry_kind,
        });
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    pub fn object(&self, id: &ObjectId) -> Option<&GraphNode> {
        self.node(&NodeKey::Object(id.clone()))
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes of one output group, in insertion order.
    pub fn nodes_in_group(&self, group: NodeGroup) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind.group() == group)
    }

    /// Outgoing edges of `key` with the given relation.
    pub fn targets(&self, key: &NodeKey, relation: Relation) -> Vec<&NodeKey> {
        self.edges
            .iter()
            .filter(|e| &e.from == key && e.relation == relation)
            .map(|e| &e.to)
            .collect()
    }

    /// Edges with an endpoint that has no node. Empty for a finished model.
    pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
        self.edges
            .iter()
            .filter(|e| !self.contains(&e.from) || !self.contains(&e.to))
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let mut per_group = BTreeMap::new();
        for node in &self.nodes {
            *per_group.entry(node.kind.group()).or_insert(0) += 1;
        }
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            per_group,
        }
    }
}

/// Node and edge counts of a model, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub per_group: BTreeMap<NodeGroup, usize>,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes and {} edges", self.nodes, self.edges)?;
        if !self.per_group.is_empty() {
            f.write_str(" (")?;
            for (i, (group, count)) in self.per_group.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{group}: {count}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
