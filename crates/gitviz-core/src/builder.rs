use std::collections::HashSet;
use std::time::Instant;

use gitviz_error::{Error, Result};
use tracing::{debug, info};

use crate::branches::BranchLayout;
use crate::graph::{GraphNode, NodeKey, ObjectGraph};
use crate::names::{NameTable, reachable_trees, resolve_names};
use crate::object::{ObjectId, ObjectKind};
use crate::store::{ObjectCatalog, ObjectStore, RefStore, enumerate_objects};

const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct BuildOption {
    /// Fold branches, remote-tracking branches and HEAD into the graph.
    pub branches: bool,
}

impl Default for BuildOption {
    fn default() -> Self {
        Self { branches: true }
    }
}

impl BuildOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branches(mut self, branches: bool) -> Self {
        self.branches = branches;
        self
    }
}

/// Depth-first, visited-set guarded traversal materializing one node per
/// object and one edge per reference.
///
/// Uses an explicit LIFO work stack; child references are pushed in reverse
/// so objects are visited in the same preorder a recursive walk would give.
pub struct GraphBuilder<'s, S: ObjectStore + ?Sized> {
    catalog: ObjectCatalog<'s, S>,
    names: NameTable,
    graph: ObjectGraph,
    visited: HashSet<ObjectId>,
    stack: Vec<ObjectId>,
}

impl<'s, S: ObjectStore + ?Sized> GraphBuilder<'s, S> {
    pub fn new(catalog: ObjectCatalog<'s, S>, names: NameTable) -> Self {
        Self {
            catalog,
            names,
            graph: ObjectGraph::new(),
            visited: HashSet::new(),
            stack: Vec::new(),
        }
    }

    /// Visit every seed in order, and everything reachable from each.
    pub fn visit_all(&mut self, seeds: &[ObjectId]) {
        for (i, seed) in seeds.iter().enumerate() {
            if (i + 1) % PROGRESS_EVERY == 0 {
                debug!("Processed {}/{} objects", i + 1, seeds.len());
            }
            self.visit(seed);
        }
    }

    /// Visit `seed` and everything reachable from it. Already visited ids are skipped.
    pub fn visit(&mut self, seed: &ObjectId) {
        self.stack.push(seed.clone());
        while let Some(id) = self.stack.pop() {
            if !self.visited.insert(id.clone()) {
                continue;
            }
            self.materialize(id);
        }
    }

    fn materialize(&mut self, id: ObjectId) {
        let kind = self.catalog.kind(&id);
        let name = self.names.get(&id).map(str::to_string);
        self.graph.add_node(GraphNode::object(id.clone(), kind, name));

        let parsed = self.catalog.take_parsed(&id, kind);
        let from = NodeKey::Object(id);
        for reference in &parsed.references {
            self.graph.add_entry_edge(
                from.clone(),
                NodeKey::Object(reference.target.clone()),
                reference.relation,
                reference.entry_kind,
            );
        }
        self.stack
            .extend(parsed.references.into_iter().rev().map(|r| r.target));
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn finish(self) -> ObjectGraph {
        self.graph
    }
}

/// Whole-repository mode: every enumerated object and everything it
/// references, optionally with branches and HEAD folded in.
pub fn build_repository_graph<R>(repo: &R, option: &BuildOption) -> Result<ObjectGraph>
where
    R: ObjectStore + RefStore + ?Sized,
{
    let mut graph = build_object_graph(repo)?;
    if option.branches {
        let start = Instant::now();
        BranchLayout::query(repo).fold_into(&mut graph);
        info!("Branch fold-in: {:.2}s", start.elapsed().as_secs_f64());
    }
    info!("Graph contains {}", graph.stats());
    Ok(graph)
}

/// Object graph of every enumerated object, without branch information.
pub fn build_object_graph<S>(store: &S) -> Result<ObjectGraph>
where
    S: ObjectStore + ?Sized,
{
    let ids = enumerate_objects(store)?;
    let mut catalog = ObjectCatalog::new(store);
    let names = resolve_names(&mut catalog, &ids);

    let start = Instant::now();
    let mut builder = GraphBuilder::new(catalog, names);
    builder.visit_all(&ids);
    info!(
        "Graph building: {:.2}s ({} objects visited)",
        start.elapsed().as_secs_f64(),
        builder.visited_count()
    );
    Ok(builder.finish())
}

/// Tree mode: the tree `reference` resolves to and everything below it.
///
/// Fails when the reference does not resolve or names anything but a tree.
pub fn build_tree_graph<R>(repo: &R, reference: &str) -> Result<ObjectGraph>
where
    R: ObjectStore + RefStore + ?Sized,
{
    let root = repo.resolve_ref(reference).map_err(|err| {
        Error::reference_not_found(reference)
            .with_operation("core::build_tree_graph")
            .set_source(err)
    })?;

    let mut catalog = ObjectCatalog::new(repo);
    let kind = catalog.kind(&root);
    if kind != ObjectKind::Tree {
        return Err(Error::unexpected_kind(reference, kind.as_str(), "tree")
            .with_operation("core::build_tree_graph")
            .with_context("object", root.as_str()));
    }

    let trees = reachable_trees(&mut catalog, &root);
    let names = resolve_names(&mut catalog, &trees);

    let mut builder = GraphBuilder::new(catalog, names);
    builder.visit(&root);
    let graph = builder.finish();
    info!("Graph contains {}", graph.stats());
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Relation;
    use crate::memory::{MemoryRepo, label_id};

    #[test]
    fn test_preorder_visit_order() {
        let c2 = label_id("c2");
        let c1 = label_id("c1");
        let t2 = label_id("t2");
        let t1 = label_id("t1");
        let b1 = label_id("b1");
        let repo = MemoryRepo::new()
            .commit(&c2, &t2, &[&c1])
            .commit(&c1, &t1, &[])
            .tree(&t2, &[(ObjectKind::Blob, &b1, "a")])
            .tree(&t1, &[(ObjectKind::Blob, &b1, "a")])
            .blob(&b1);

        let mut builder = GraphBuilder::new(ObjectCatalog::new(&repo), NameTable::new());
        builder.visit(&c2);
        let graph = builder.finish();

        let order: Vec<NodeKey> = graph.nodes().iter().map(|n| n.key.clone()).collect();
        let expected: Vec<NodeKey> = [&c2, &t2, &b1, &c1, &t1]
            .into_iter()
            .map(|id| NodeKey::Object(id.clone()))
            .collect();
        assert_eq!(order, expected);
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_revisit_is_noop() {
        let b1 = label_id("b1");
        let repo = MemoryRepo::new().blob(&b1);
        let mut builder = GraphBuilder::new(ObjectCatalog::new(&repo), NameTable::new());
        builder.visit(&b1);
        builder.visit(&b1);
        assert_eq!(builder.visited_count(), 1);
        assert_eq!(builder.finish().node_count(), 1);
    }

    #[test]
    fn test_dangling_reference_becomes_unknown_node() {
        let t1 = label_id("t1");
        let sub = label_id("sub");
        let repo = MemoryRepo::new().tree(&t1, &[(ObjectKind::Commit, &sub, "vendor")]);
        let graph = build_object_graph(&repo).unwrap();

        let node = graph.object(&sub).unwrap();
        assert_eq!(node.kind, crate::graph::NodeKind::Object(ObjectKind::Unknown));
        assert_eq!(node.name.as_deref(), Some("vendor"));
        assert_eq!(graph.edges()[0].relation, Relation::Submodule);
        assert!(graph.dangling_edges().is_empty());
    }
}
