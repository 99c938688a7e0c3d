use std::time::Instant;

use gitviz_core::{BranchScope, GraphNode, NodeGroup, NodeKey, ObjectGraph};
use strum::IntoEnumIterator;
use tracing::info;

use crate::dot::{DotBuilder, escape_id};
use crate::style::{EDGE_DEFAULTS, GRAPH_ATTRS, NODE_DEFAULTS, edge_attrs, node_attrs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub graph_name: String,
    /// Label each edge with its relation name, or the child kind for tree entries.
    pub edge_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::repository()
    }
}

impl RenderOptions {
    /// Whole-repository graph.
    pub fn repository() -> Self {
        Self {
            graph_name: "gitobjects".to_string(),
            edge_labels: true,
        }
    }

    /// Graph of a single tree and its descendants.
    pub fn tree() -> Self {
        Self {
            graph_name: "gittree".to_string(),
            edge_labels: true,
        }
    }

    pub fn with_edge_labels(mut self, edge_labels: bool) -> Self {
        self.edge_labels = edge_labels;
        self
    }
}

/// DOT identifier of a node.
pub fn node_id(key: &NodeKey) -> String {
    match key {
        NodeKey::Object(id) => format!("obj_{}", id.as_str()),
        NodeKey::Branch(BranchScope::Local, name) => format!("branch_local_{}", escape_id(name)),
        NodeKey::Branch(BranchScope::Remote, name) => format!("branch_remote_{}", escape_id(name)),
        NodeKey::Head => "branch_head_HEAD".to_string(),
    }
}

/// Display label: short id plus name for objects, the name for branches.
pub fn node_label(node: &GraphNode) -> String {
    match (&node.key, node.name.as_deref()) {
        (NodeKey::Object(id), Some(name)) => format!("{}\n{}", id.short(), name),
        (NodeKey::Object(id), None) => id.short().to_string(),
        (NodeKey::Head, _) => "HEAD".to_string(),
        (NodeKey::Branch(_, branch), name) => name.unwrap_or(branch).to_string(),
    }
}

fn group_title(group: NodeGroup) -> &'static str {
    match group {
        NodeGroup::Branch => "Branches",
        NodeGroup::Commit => "Commits",
        NodeGroup::Tree => "Trees",
        NodeGroup::Blob => "Blobs",
        NodeGroup::Tag => "Tags",
        NodeGroup::Unknown => "Unknown objects",
    }
}

/// Render the model to DOT text.
///
/// Output is a pure function of the model: groups in fixed order, nodes in
/// insertion order within a group, edges in insertion order.
pub fn render_graph(graph: &ObjectGraph, options: &RenderOptions) -> String {
    let start = Instant::now();
    let mut dot = DotBuilder::new(&options.graph_name);
    for (key, value) in GRAPH_ATTRS {
        dot.attr(key, value);
    }
    dot.node_style(NODE_DEFAULTS).edge_style(EDGE_DEFAULTS);

    for group in NodeGroup::iter() {
        let mut nodes = graph.nodes_in_group(group).peekable();
        if nodes.peek().is_none() {
            continue;
        }
        dot.blank().comment(group_title(group));
        for node in nodes {
            let label = node_label(node);
            let mut attrs = vec![("label", label.as_str())];
            attrs.extend_from_slice(node_attrs(node.kind));
            dot.node_full(&node_id(&node.key), &attrs);
        }
    }

    if graph.edge_count() > 0 {
        dot.blank().comment("Edges");
    }
    for edge in graph.edges() {
        let mut attrs = Vec::with_capacity(3);
        if options.edge_labels {
            attrs.push(("label", edge.label()));
        }
        if let Some(style) = edge_attrs(edge.relation) {
            attrs.extend_from_slice(style);
        }
        dot.edge_with_attrs(&node_id(&edge.from), &node_id(&edge.to), &attrs);
    }

    let output = dot.build();
    info!(
        "DOT rendering: {:.2}s ({} bytes)",
        start.elapsed().as_secs_f64(),
        output.len()
    );
    output
}
