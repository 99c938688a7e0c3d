//! gitviz command-line interface.
//!
pub mod options;
pub mod output;
pub mod pipeline;
pub mod profile;

use std::path::PathBuf;

use gitviz_error::Result;

pub use options::{RenderArgs, RepoArgs};
pub use output::{default_image_path, emit};
pub use pipeline::{build_graph, render_dot};
pub use profile::profile_phase;

/// Options for one gitviz run.
#[derive(Debug, Clone, Default)]
pub struct GitvizOptions {
    /// Tree to draw; `None` draws the whole repository.
    pub reference: Option<String>,
    /// DOT text destination; `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub repo: RepoArgs,
    pub render: RenderArgs,
}

impl GitvizOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_repo(mut self, repo: RepoArgs) -> Self {
        self.repo = repo;
        self
    }

    pub fn with_render(mut self, render: RenderArgs) -> Self {
        self.render = render;
        self
    }

    pub fn is_tree_mode(&self) -> bool {
        self.reference.is_some()
    }
}

/// Main entry point: build the graph and return its DOT text.
pub fn run_main(opts: &GitvizOptions) -> Result<String> {
    let graph = build_graph(opts)?;
    Ok(render_dot(opts, &graph))
}
