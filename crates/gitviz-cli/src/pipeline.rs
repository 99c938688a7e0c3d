//! Core pipeline: open repository → build object graph → render DOT.

use std::time::Instant;

use tracing::info;

use gitviz_core::{BuildOption, ObjectGraph, build_repository_graph, build_tree_graph};
use gitviz_dot::{RenderOptions, render_graph};
use gitviz_error::Result;
use gitviz_git::{GitCommand, GitRepo};

use crate::GitvizOptions;
use crate::profile::profile_phase;

/// Build the model for the mode `opts` selects.
///
/// With a reference, the tree it names and everything below it; otherwise
/// every object in the repository, plus branches and HEAD unless disabled.
pub fn build_graph(opts: &GitvizOptions) -> Result<ObjectGraph> {
    let open_start = Instant::now();
    let command =
        GitCommand::new(opts.repo.repo.clone()).with_binary(opts.repo.git_binary.clone());
    let repo = GitRepo::open_with(command)?;
    info!(
        "Opening repository: {:.2}s ({})",
        open_start.elapsed().as_secs_f64(),
        opts.repo.repo.display()
    );

    let graph = match &opts.reference {
        Some(reference) => {
            info!("Drawing tree {reference}");
            profile_phase("tree_graph", || build_tree_graph(&repo, reference))?
        }
        None => {
            let option = BuildOption::new().with_branches(!opts.repo.no_branches);
            profile_phase("repository_graph", || {
                build_repository_graph(&repo, &option)
            })?
        }
    };
    info!("Kinds known from enumeration: {}", repo.cached_kinds());
    Ok(graph)
}

/// Render the model with the graph name of the selected mode.
pub fn render_dot(opts: &GitvizOptions, graph: &ObjectGraph) -> String {
    let options = if opts.is_tree_mode() {
        RenderOptions::tree()
    } else {
        RenderOptions::repository()
    };
    profile_phase("render", || render_graph(graph, &options))
}
