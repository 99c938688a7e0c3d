use std::collections::BTreeSet;

use gitviz_core::{
    BranchRole, BuildOption, ErrorKind, GraphEdge, MemoryRepo, NodeKey, NodeKind, ObjectGraph,
    ObjectId, ObjectKind, Relation, build_object_graph, build_repository_graph, build_tree_graph,
    label_id,
};
use pretty_assertions::assert_eq;

/// Order-free view of a model: nodes with kind and name, edges as a multiset key.
fn snapshot(graph: &ObjectGraph) -> (BTreeSet<String>, Vec<GraphEdge>) {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| format!("{} {:?} {:?}", n.key, n.kind, n.name))
        .collect();
    let mut edges = graph.edges().to_vec();
    edges.sort();
    (nodes, edges)
}

/// All permutations of `items` (Heap's algorithm).
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
            heap(k - 1, items, out);
        }
    }
    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

fn history_repo() -> MemoryRepo {
    let c1 = label_id("c1");
    let c2 = label_id("c2");
    let t1 = label_id("t1");
    let t2 = label_id("t2");
    let b1 = label_id("b1");
    let b2 = label_id("b2");
    let v1 = label_id("v1");
    MemoryRepo::new()
        .commit(&c1, &t1, &[])
        .commit(&c2, &t2, &[&c1])
        .tree(&t1, &[(ObjectKind::Blob, &b1, "readme.txt")])
        .tree(
            &t2,
            &[
                (ObjectKind::Blob, &b1, "readme.txt"),
                (ObjectKind::Blob, &b2, "main.rs"),
            ],
        )
        .blob(&b1)
        .blob(&b2)
        .tag(&v1, &c2, "v1")
}

#[test]
fn model_is_independent_of_enumeration_order() {
    let repo = history_repo();
    let baseline = snapshot(&build_object_graph(&repo).unwrap());

    let ids = repo.object_ids();
    let all = permutations(&ids);
    assert_eq!(all.len(), 5040);
    for order in all.into_iter().step_by(7) {
        let permuted = repo.clone().with_order(order);
        let graph = build_object_graph(&permuted).unwrap();
        assert_eq!(snapshot(&graph), baseline);
    }
}

#[test]
fn every_enumerated_object_gets_a_node() {
    let orphan = label_id("orphan");
    let repo = history_repo().blob(&orphan);
    let graph = build_object_graph(&repo).unwrap();
    assert_eq!(graph.node_count(), 8);
    let node = graph.object(&orphan).unwrap();
    assert_eq!(node.kind, NodeKind::Object(ObjectKind::Blob));
    assert_eq!(node.name, None);
}

#[test]
fn cyclic_references_terminate_with_one_node_per_id() {
    let ta = label_id("ta");
    let tb = label_id("tb");
    let ba = label_id("ba");
    let bb = label_id("bb");
    // Two trees that reference each other and each other's blob under the
    // same name; impossible in a real repository but constructible here.
    let repo = MemoryRepo::new()
        .tree(
            &ta,
            &[
                (ObjectKind::Blob, &ba, "shared"),
                (ObjectKind::Blob, &bb, "shared"),
                (ObjectKind::Tree, &tb, "b"),
            ],
        )
        .tree(
            &tb,
            &[
                (ObjectKind::Blob, &bb, "shared"),
                (ObjectKind::Blob, &ba, "shared"),
                (ObjectKind::Tree, &ta, "a"),
            ],
        )
        .blob(&ba)
        .blob(&bb);

    let graph = build_object_graph(&repo).unwrap();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 6);
    let unique: BTreeSet<&NodeKey> = graph.nodes().iter().map(|n| &n.key).collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn first_enumerated_tree_names_shared_blob() {
    let ta = label_id("ta");
    let tb = label_id("tb");
    let x = label_id("x");
    let repo = MemoryRepo::new()
        .tree(&ta, &[(ObjectKind::Blob, &x, "foo.txt")])
        .tree(&tb, &[(ObjectKind::Blob, &x, "bar.txt")])
        .blob(&x);

    let graph = build_object_graph(&repo).unwrap();
    assert_eq!(graph.object(&x).unwrap().name.as_deref(), Some("foo.txt"));

    // Enumerate the blob first: naming still comes from the first tree.
    let reordered = repo.clone().with_order(vec![x.clone(), ta.clone(), tb.clone()]);
    let graph = build_object_graph(&reordered).unwrap();
    assert_eq!(graph.object(&x).unwrap().name.as_deref(), Some("foo.txt"));

    let swapped = repo.with_order(vec![tb, ta, x.clone()]);
    let graph = build_object_graph(&swapped).unwrap();
    assert_eq!(graph.object(&x).unwrap().name.as_deref(), Some("bar.txt"));
}

#[test]
fn head_on_unborn_branch_gets_missing_placeholder() {
    let c1 = label_id("c1");
    let t1 = label_id("t1");
    let repo = MemoryRepo::new()
        .commit(&c1, &t1, &[])
        .tree(&t1, &[])
        .local_branch("main", &c1)
        .head_to_branch("feature");

    let graph = build_repository_graph(&repo, &BuildOption::new()).unwrap();
    let feature = NodeKey::local("feature");
    let node = graph.node(&feature).expect("placeholder node");
    assert_eq!(node.kind, NodeKind::Branch(BranchRole::Missing));
    assert_eq!(node.name.as_deref(), Some("feature"));
    assert_eq!(graph.targets(&NodeKey::Head, Relation::Head), vec![&feature]);
}

#[test]
fn every_edge_has_both_endpoints_after_fold_in() {
    let c1 = label_id("c1");
    let c9 = label_id("c9");
    let repo = history_repo()
        .local_branch("main", &label_id("c2"))
        .local_branch("old", &c1)
        // points at a commit the object enumeration never reported
        .remote_branch("origin/stale", &c9)
        .upstream("main", "origin/main")
        .upstream("old", "main")
        .head_to_branch("main");

    let graph = build_repository_graph(&repo, &BuildOption::new()).unwrap();
    assert!(graph.dangling_edges().is_empty(), "{:?}", graph.dangling_edges());
    assert_eq!(
        graph.object(&c9).unwrap().kind,
        NodeKind::Object(ObjectKind::Commit)
    );
    assert_eq!(
        graph.targets(&NodeKey::local("old"), Relation::Tracks),
        vec![&NodeKey::local("main")]
    );
    assert!(graph.targets(&NodeKey::local("main"), Relation::Tracks).is_empty());
}

#[test]
fn single_commit_scenario() {
    let c1 = label_id("c1");
    let t1 = label_id("t1");
    let b1 = label_id("b1");
    let repo = MemoryRepo::new()
        .commit(&c1, &t1, &[])
        .tree(&t1, &[(ObjectKind::Blob, &b1, "readme.txt")])
        .blob(&b1)
        .local_branch("main", &c1)
        .head_to_branch("main");

    let graph = build_repository_graph(&repo, &BuildOption::new()).unwrap();

    let keys: BTreeSet<NodeKey> = graph.nodes().iter().map(|n| n.key.clone()).collect();
    let expected: BTreeSet<NodeKey> = [
        NodeKey::Object(c1.clone()),
        NodeKey::Object(t1.clone()),
        NodeKey::Object(b1.clone()),
        NodeKey::local("main"),
        NodeKey::Head,
    ]
    .into_iter()
    .collect();
    assert_eq!(keys, expected);

    let edges: BTreeSet<(NodeKey, NodeKey, Relation)> = graph
        .edges()
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), e.relation))
        .collect();
    let expected: BTreeSet<(NodeKey, NodeKey, Relation)> = [
        (c1.clone().into(), t1.clone().into(), Relation::Tree),
        (t1.clone().into(), b1.clone().into(), Relation::Tree),
        (NodeKey::local("main"), c1.clone().into(), Relation::Local),
        (NodeKey::Head, NodeKey::local("main"), Relation::Head),
    ]
    .into_iter()
    .collect();
    assert_eq!(edges, expected);
    assert_eq!(graph.edge_count(), 4);

    assert_eq!(graph.object(&b1).unwrap().name.as_deref(), Some("readme.txt"));
    assert_eq!(graph.object(&c1).unwrap().name, None);
    assert_eq!(
        graph.node(&NodeKey::local("main")).unwrap().kind,
        NodeKind::Branch(BranchRole::Local)
    );
}

#[test]
fn tag_scenario() {
    let c1 = label_id("c1");
    let t1 = label_id("t1");
    let v1 = label_id("v1");
    let repo = MemoryRepo::new()
        .commit(&c1, &t1, &[])
        .tree(&t1, &[])
        .tag(&v1, &c1, "v1");

    let graph = build_object_graph(&repo).unwrap();
    let tag = graph.object(&v1).unwrap();
    assert_eq!(tag.kind, NodeKind::Object(ObjectKind::Tag));
    assert_eq!(tag.name.as_deref(), Some("v1"));

    let tag_key = NodeKey::Object(v1);
    assert_eq!(
        graph.targets(&tag_key, Relation::TagTarget),
        vec![&NodeKey::Object(c1)]
    );
    assert_eq!(graph.edges().iter().filter(|e| e.from == tag_key).count(), 1);
}

#[test]
fn branch_stage_can_be_disabled() {
    let c1 = label_id("c1");
    let repo = history_repo().local_branch("main", &c1).head_to_branch("main");
    let graph = build_repository_graph(&repo, &BuildOption::new().with_branches(false)).unwrap();
    assert!(!graph.contains(&NodeKey::Head));
    assert!(!graph.contains(&NodeKey::local("main")));
}

#[test]
fn unparseable_object_keeps_its_node_without_edges() {
    let c1 = label_id("c1");
    let t1 = label_id("t1");
    let repo = MemoryRepo::new()
        .raw(&c1, ObjectKind::Commit, "this is not a commit header\n")
        .tree(&t1, &[]);
    let graph = build_object_graph(&repo).unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn empty_repository_fails() {
    let err = build_repository_graph(&MemoryRepo::new(), &BuildOption::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyRepository);
}

#[test]
fn tree_mode_walks_below_the_root() {
    let c1 = label_id("c1");
    let root = label_id("root");
    let src = label_id("src");
    let b1 = label_id("b1");
    let b2 = label_id("b2");
    let unrelated = label_id("other");
    let repo = MemoryRepo::new()
        .commit(&c1, &root, &[])
        .tree(
            &root,
            &[
                (ObjectKind::Blob, &b1, "readme.txt"),
                (ObjectKind::Tree, &src, "src"),
            ],
        )
        .tree(&src, &[(ObjectKind::Blob, &b2, "lib.rs")])
        .blob(&b1)
        .blob(&b2)
        .blob(&unrelated)
        .reference("refs/tags/snapshot", &root)
        .local_branch("main", &c1)
        .head_to_branch("main");

    let graph = build_tree_graph(&repo, "snapshot").unwrap();
    assert_eq!(graph.node_count(), 4);
    assert!(graph.object(&c1).is_none());
    assert!(graph.object(&unrelated).is_none());
    assert!(!graph.contains(&NodeKey::Head));
    assert_eq!(graph.object(&root).unwrap().name, None);
    assert_eq!(graph.object(&src).unwrap().name.as_deref(), Some("src"));
    assert_eq!(graph.object(&b2).unwrap().name.as_deref(), Some("lib.rs"));
}

#[test]
fn tree_mode_rejects_blob_reference() {
    let b1 = label_id("b1");
    let repo = MemoryRepo::new().blob(&b1).reference("refs/tags/readme", &b1);
    let err = build_tree_graph(&repo, "readme").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedObjectKind);
    assert!(err.message().contains("'readme'"), "{err}");
    assert!(err.message().contains("blob"), "{err}");
    assert_eq!(err.context_value("kind"), Some("blob"));
}

#[test]
fn tree_mode_rejects_unresolvable_reference() {
    let repo = MemoryRepo::new().blob(&label_id("b1"));
    let err = build_tree_graph(&repo, "no-such-ref").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
    assert_eq!(err.context_value("reference"), Some("no-such-ref"));
}

#[test]
fn deep_history_does_not_exhaust_the_stack() {
    let tree = label_id("tree");
    let mut repo = MemoryRepo::new().tree(&tree, &[]);
    let ids: Vec<ObjectId> = (0..50_000u32)
        .map(|n| ObjectId::parse(&format!("{n:040x}")).unwrap())
        .collect();
    repo = repo.commit(&ids[0], &tree, &[]);
    for pair in ids.windows(2) {
        repo = repo.commit(&pair[1], &tree, &[&pair[0]]);
    }
    // newest first, so the whole chain is discovered from one seed
    let mut order = ids.clone();
    order.reverse();
    order.push(tree);
    let graph = build_object_graph(&repo.with_order(order)).unwrap();
    assert_eq!(graph.node_count(), 50_001);
}
