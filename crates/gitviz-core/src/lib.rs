//! Object-graph discovery and construction.
//!
//! Pipeline: enumerate objects → name pass → depth-first build → branch/HEAD
//! fold-in. The backend is reached only through [`ObjectStore`] and
//! [`RefStore`]; rendering lives in `gitviz-dot`.
//!
//! # Module Structure
//!
//! - [`object`]: object ids and kinds
//! - [`store`]: backend traits and the per-run kind cache
//! - [`parse`]: per-kind body parsers
//! - [`names`]: display-name pre-pass
//! - [`graph`]: node/edge model
//! - [`builder`]: traversal and the whole-repository / tree-mode entry points
//! - [`branches`]: branch, upstream and HEAD fold-in
//! - [`memory`]: in-memory repository

pub mod branches;
pub mod builder;
pub mod graph;
pub mod memory;
pub mod names;
pub mod object;
pub mod parse;
pub mod store;

pub use branches::{BranchLayout, BranchRef, HeadRef, TrackingRelation};
pub use builder::{
    BuildOption, GraphBuilder, build_object_graph, build_repository_graph, build_tree_graph,
};
pub use gitviz_error::{Error, ErrorKind, Result};
pub use graph::{
    BranchRole, BranchScope, GraphEdge, GraphNode, GraphStats, NodeGroup, NodeKey, NodeKind,
    ObjectGraph, Relation,
};
pub use memory::{MemoryRepo, label_id};
pub use names::NameTable;
pub use object::{ObjectId, ObjectKind};
pub use store::{ObjectCatalog, ObjectStore, RefStore};
