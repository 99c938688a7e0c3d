//! Fixed style table per node kind and edge relation.

use gitviz_core::{BranchRole, NodeKind, ObjectKind, Relation};

type Attrs = &'static [(&'static str, &'static str)];

/// Graph-wide defaults written before any node.
pub(crate) const GRAPH_ATTRS: Attrs = &[("rankdir", "LR"), ("splines", "line")];
pub(crate) const NODE_DEFAULTS: Attrs = &[("shape", "box"), ("style", "rounded,filled")];
pub(crate) const EDGE_DEFAULTS: Attrs = &[("color", "gray")];

/// Style attributes for a node of `kind`, excluding its label.
pub fn node_attrs(kind: NodeKind) -> Attrs {
    match kind {
        NodeKind::Branch(BranchRole::Local) => &[("fillcolor", "pink"), ("shape", "cds")],
        NodeKind::Branch(BranchRole::Remote) => &[("fillcolor", "plum"), ("shape", "cds")],
        NodeKind::Branch(BranchRole::Head) => &[
            ("fillcolor", "tomato"),
            ("shape", "cds"),
            ("style", "filled,bold"),
        ],
        NodeKind::Branch(BranchRole::Missing) => &[("shape", "cds"), ("style", "dashed")],
        NodeKind::Object(ObjectKind::Commit) => &[("fillcolor", "#FFD700"), ("shape", "ellipse")],
        NodeKind::Object(ObjectKind::Tree) => &[("fillcolor", "#90EE90"), ("shape", "folder")],
        NodeKind::Object(ObjectKind::Blob) => &[("fillcolor", "#87CEEB"), ("shape", "note")],
        NodeKind::Object(ObjectKind::Tag) => &[("fillcolor", "#FF69B4"), ("shape", "diamond")],
        NodeKind::Object(ObjectKind::Unknown) => &[
            ("fillcolor", "#D3D3D3"),
            ("style", "rounded,filled,dashed"),
        ],
    }
}

/// Style attributes for an edge, excluding its label.
///
/// `None` means the relation has no entry and renders with the defaults.
pub fn edge_attrs(relation: Relation) -> Option<Attrs> {
    match relation {
        Relation::Parent => Some(&[("color", "red")]),
        Relation::Tree => Some(&[("color", "green")]),
        Relation::TagTarget => Some(&[("color", "purple")]),
        Relation::Local => Some(&[("color", "orange")]),
        Relation::Remote => Some(&[("color", "brown")]),
        Relation::Tracks => Some(&[("color", "black"), ("style", "dashed")]),
        Relation::Head => Some(&[("color", "red"), ("style", "bold")]),
        Relation::Submodule => None,
    }
}
