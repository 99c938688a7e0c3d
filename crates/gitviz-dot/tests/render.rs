use std::process::Command;

use gitviz_core::{
    BuildOption, MemoryRepo, NodeKey, ObjectKind, build_repository_graph, label_id,
};
use gitviz_dot::{Rasterizer, RenderOptions, node_id, render_graph};
use pretty_assertions::assert_eq;

fn scenario() -> MemoryRepo {
    let c1 = label_id("c1");
    let t1 = label_id("t1");
    let t2 = label_id("t2");
    let b1 = label_id("b1");
    let sub = label_id("sub");
    let v1 = label_id("v1");
    MemoryRepo::new()
        .commit(&c1, &t1, &[])
        .tree(
            &t1,
            &[
                (ObjectKind::Blob, &b1, "readme.txt"),
                (ObjectKind::Tree, &t2, "src"),
                (ObjectKind::Commit, &sub, "vendor"),
            ],
        )
        .tree(&t2, &[])
        .blob(&b1)
        .tag(&v1, &c1, "v1")
        .local_branch("main", &c1)
        .remote_branch("origin/main", &c1)
        .upstream("main", "origin/main")
        .head_to_branch("main")
}

fn dot_available() -> bool {
    Command::new("dot").arg("-V").output().is_ok()
}

#[test]
fn renders_every_node_and_edge_once() {
    let graph = build_repository_graph(&scenario(), &BuildOption::new()).unwrap();
    let out = render_graph(&graph, &RenderOptions::repository());

    assert!(out.starts_with("digraph gitobjects {\n"));
    assert!(out.ends_with("}\n"));
    assert!(out.contains("  rankdir=\"LR\";\n"));
    assert!(out.contains("  splines=\"line\";\n"));
    assert!(out.contains("  node [shape=\"box\", style=\"rounded,filled\"];\n"));
    assert!(out.contains("  edge [color=\"gray\"];\n"));

    for node in graph.nodes() {
        let statement = format!("  {} [", node_id(&node.key));
        assert_eq!(out.matches(&statement).count(), 1, "{statement}");
    }
    let edge_lines = out.lines().filter(|line| line.contains(" -> ")).count();
    assert_eq!(edge_lines, graph.edge_count());
}

#[test]
fn styles_follow_kind_and_relation() {
    let graph = build_repository_graph(&scenario(), &BuildOption::new()).unwrap();
    let out = render_graph(&graph, &RenderOptions::repository());

    let c1 = node_id(&label_id("c1").into());
    let t1 = node_id(&label_id("t1").into());
    let t2 = node_id(&label_id("t2").into());
    let b1 = node_id(&label_id("b1").into());
    let sub = node_id(&label_id("sub").into());
    let v1 = node_id(&label_id("v1").into());
    let main = node_id(&NodeKey::local("main"));
    let origin = node_id(&NodeKey::remote("origin/main"));
    let head = node_id(&NodeKey::Head);

    let short = |label: &str| label_id(label).short().to_string();
    assert!(out.contains(&format!(
        "  {b1} [label=\"{}\\nreadme.txt\", fillcolor=\"#87CEEB\", shape=\"note\"];",
        short("b1")
    )));
    assert!(out.contains(&format!(
        "  {c1} [label=\"{}\", fillcolor=\"#FFD700\", shape=\"ellipse\"];",
        short("c1")
    )));
    assert!(out.contains(&format!(
        "  {head} [label=\"HEAD\", fillcolor=\"tomato\", shape=\"cds\", style=\"filled,bold\"];"
    )));
    assert!(out.contains(&format!("  {c1} -> {t1} [label=\"tree\", color=\"green\"];")));
    // tree entries carry the child kind as their label
    assert!(out.contains(&format!("  {t1} -> {b1} [label=\"blob\", color=\"green\"];")));
    assert!(out.contains(&format!("  {t1} -> {t2} [label=\"tree\", color=\"green\"];")));
    assert!(out.contains(&format!("  {v1} -> {c1} [label=\"object\", color=\"purple\"];")));
    assert!(out.contains(&format!("  {main} -> {c1} [label=\"local\", color=\"orange\"];")));
    assert!(out.contains(&format!("  {origin} -> {c1} [label=\"remote\", color=\"brown\"];")));
    assert!(out.contains(&format!(
        "  {main} -> {origin} [label=\"tracks\", color=\"black\", style=\"dashed\"];"
    )));
    assert!(out.contains(&format!(
        "  {head} -> {main} [label=\"head\", color=\"red\", style=\"bold\"];"
    )));
    // gitlink: default edge, unknown target still declared
    assert!(out.contains(&format!("  {t1} -> {sub} [label=\"submodule\"];")));
    assert!(out.contains(&format!("  {sub} [label=\"{}\\nvendor\"", short("sub"))));
}

#[test]
fn output_is_deterministic_for_the_same_model() {
    let graph = build_repository_graph(&scenario(), &BuildOption::new()).unwrap();
    let first = render_graph(&graph, &RenderOptions::repository());
    let second = render_graph(&graph, &RenderOptions::repository());
    assert_eq!(first, second);
}

#[test]
fn rasterizes_with_real_renderer() {
    if !dot_available() {
        eprintln!("skipping: dot not installed");
        return;
    }
    let graph = build_repository_graph(&scenario(), &BuildOption::new()).unwrap();
    let text = render_graph(&graph, &RenderOptions::repository());
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("objects.svg");
    Rasterizer::new("dot", "svg").rasterize(&text, &image).unwrap();
    let svg = std::fs::read_to_string(&image).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn renderer_rejects_malformed_input() {
    if !dot_available() {
        eprintln!("skipping: dot not installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let err = Rasterizer::new("dot", "svg")
        .rasterize("digraph {", &dir.path().join("broken.svg"))
        .unwrap_err();
    assert_eq!(err.kind(), gitviz_core::ErrorKind::RendererFailed);
}
