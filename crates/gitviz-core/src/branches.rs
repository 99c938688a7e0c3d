//! Branch, remote-tracking branch, upstream and HEAD fold-in.
//!
//! Querying and folding are separate steps. [`BranchLayout::query`] asks the
//! backend and drops whatever fails to resolve; [`BranchLayout::fold_into`]
//! only appends to the graph and never touches existing nodes.

use tracing::{debug, info, warn};

use crate::graph::{BranchRole, BranchScope, GraphNode, NodeKey, ObjectGraph, Relation};
use crate::object::{ObjectId, ObjectKind};
use crate::store::RefStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub scope: BranchScope,
    pub target: ObjectId,
}

impl BranchRef {
    pub fn key(&self) -> NodeKey {
        NodeKey::Branch(self.scope, self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// HEAD names a local branch, which may have no commits yet.
    Branch(String),
    /// Detached HEAD.
    Commit(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRelation {
    pub local: String,
    pub upstream: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchLayout {
    pub branches: Vec<BranchRef>,
    pub head: Option<HeadRef>,
    pub tracking: Vec<TrackingRelation>,
}

impl BranchLayout {
    /// Collect branch information. Every failure is logged and skipped.
    pub fn query<R: RefStore + ?Sized>(refs: &R) -> Self {
        let mut layout = Self::default();

        let locals = list_or_empty(refs.local_branches(), BranchScope::Local);
        let remotes = list_or_empty(refs.remote_branches(), BranchScope::Remote);
        layout.branches.extend(resolve_tips(refs, &locals, BranchScope::Local));
        layout.branches.extend(resolve_tips(refs, &remotes, BranchScope::Remote));

        layout.head = resolve_head(refs);

        for local in &locals {
            match refs.upstream_of(local) {
                Ok(Some(upstream)) => layout.tracking.push(TrackingRelation {
                    local: local.clone(),
                    upstream,
                }),
                Ok(None) => {}
                Err(err) => debug!(branch = %local, error = %err, "upstream lookup failed"),
            }
        }

        info!(
            "Branches: {} local/remote, {} tracking, head {}",
            layout.branches.len(),
            layout.tracking.len(),
            if layout.head.is_some() { "resolved" } else { "unresolved" }
        );
        layout
    }

    /// Append branch nodes, HEAD and their edges to `graph`.
    ///
    /// Afterwards every edge added here has both endpoints in the graph:
    /// branch tips missing from the object graph are added as commit nodes,
    /// and a HEAD branch without a node gets a placeholder tagged missing.
    pub fn fold_into(&self, graph: &mut ObjectGraph) {
        for branch in &self.branches {
            let key = branch.key();
            graph.add_node(GraphNode::branch(
                key.clone(),
                branch.scope.into(),
                branch.name.clone(),
            ));
            let relation = match branch.scope {
                BranchScope::Local => Relation::Local,
                BranchScope::Remote => Relation::Remote,
            };
            let tip = ensure_commit(graph, &branch.target);
            graph.add_edge(key, tip, relation);
        }

        if let Some(head) = &self.head {
            graph.add_node(GraphNode::branch(NodeKey::Head, BranchRole::Head, "HEAD"));
            let target = match head {
                HeadRef::Branch(name) => {
                    let key = NodeKey::local(name.clone());
                    if graph.add_node(GraphNode::branch(
                        key.clone(),
                        BranchRole::Missing,
                        name.clone(),
                    )) {
                        debug!(branch = %name, "HEAD names a branch without commits");
                    }
                    key
                }
                HeadRef::Commit(id) => ensure_commit(graph, id),
            };
            graph.add_edge(NodeKey::Head, target, Relation::Head);
        }

        for tracking in &self.tracking {
            let from = NodeKey::local(tracking.local.clone());
            if !graph.contains(&from) {
                continue;
            }
            let to = [
                NodeKey::remote(tracking.upstream.clone()),
                NodeKey::local(tracking.upstream.clone()),
            ]
            .into_iter()
            .find(|key| graph.contains(key));
            match to {
                Some(to) => graph.add_edge(from, to, Relation::Tracks),
                None => debug!(
                    branch = %tracking.local,
                    upstream = %tracking.upstream,
                    "upstream has no node, skipping"
                ),
            }
        }
    }
}

fn list_or_empty(listed: gitviz_error::Result<Vec<String>>, scope: BranchScope) -> Vec<String> {
    listed.unwrap_or_else(|err| {
        warn!(%scope, error = %err, "branch listing failed");
        Vec::new()
    })
}

fn resolve_tips<R: RefStore + ?Sized>(
    refs: &R,
    names: &[String],
    scope: BranchScope,
) -> Vec<BranchRef> {
    let prefix = match scope {
        BranchScope::Local => "refs/heads",
        BranchScope::Remote => "refs/remotes",
    };
    names
        .iter()
        .filter_map(|name| match refs.resolve_ref(&format!("{prefix}/{name}")) {
            Ok(target) => Some(BranchRef {
                name: name.clone(),
                scope,
                target,
            }),
            Err(err) => {
                debug!(branch = %name, %scope, error = %err, "branch tip unresolved");
                None
            }
        })
        .collect()
}

fn resolve_head<R: RefStore + ?Sized>(refs: &R) -> Option<HeadRef> {
    match refs.head_symbolic_target() {
        Ok(Some(branch)) => return Some(HeadRef::Branch(branch)),
        Ok(None) => {}
        Err(err) => debug!(error = %err, "symbolic HEAD lookup failed"),
    }
    match refs.resolve_ref("HEAD") {
        Ok(id) => Some(HeadRef::Commit(id)),
        Err(err) => {
            warn!(error = %err, "HEAD does not resolve");
            None
        }
    }
}

fn ensure_commit(graph: &mut ObjectGraph, id: &ObjectId) -> NodeKey {
    let key = NodeKey::Object(id.clone());
    if !graph.contains(&key) {
        graph.add_node(GraphNode::object(id.clone(), ObjectKind::Commit, None));
    }
    key
}
