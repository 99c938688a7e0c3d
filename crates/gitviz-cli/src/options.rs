//! Command-line option groups shared by the binary and the library entry point.

use std::path::PathBuf;

use clap::Args;
use gitviz_dot::{DEFAULT_DOT_BINARY, DEFAULT_FORMAT};
use gitviz_git::DEFAULT_GIT_BINARY;

/// Where the repository lives and how much of it to draw.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Run as if started in DIR.
    #[arg(short = 'C', long = "repo", value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// git executable to run.
    #[arg(long = "git-binary", value_name = "BIN", default_value = DEFAULT_GIT_BINARY)]
    pub git_binary: String,

    /// Leave branches, remote-tracking branches and HEAD out of the graph.
    #[arg(long = "no-branches")]
    pub no_branches: bool,
}

impl Default for RepoArgs {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            git_binary: DEFAULT_GIT_BINARY.to_string(),
            no_branches: false,
        }
    }
}

impl RepoArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, repo: impl Into<PathBuf>) -> Self {
        self.repo = repo.into();
        self
    }

    pub fn with_git_binary(mut self, binary: impl Into<String>) -> Self {
        self.git_binary = binary.into();
        self
    }

    pub fn with_no_branches(mut self, no_branches: bool) -> Self {
        self.no_branches = no_branches;
        self
    }
}

/// Raster image generation through the external layout renderer.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Only write the DOT text; do not run the layout renderer.
    #[arg(long = "no-render")]
    pub no_render: bool,

    /// Image path. Defaults to the output path with the format as extension.
    #[arg(long = "image", value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Image format passed to the renderer as -T<FMT>.
    #[arg(long = "format", value_name = "FMT", default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Layout renderer executable.
    #[arg(long = "dot-binary", value_name = "BIN", default_value = DEFAULT_DOT_BINARY)]
    pub dot_binary: String,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            no_render: false,
            image: None,
            format: DEFAULT_FORMAT.to_string(),
            dot_binary: DEFAULT_DOT_BINARY.to_string(),
        }
    }
}

impl RenderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_no_render(mut self, no_render: bool) -> Self {
        self.no_render = no_render;
        self
    }

    pub fn with_image(mut self, image: Option<PathBuf>) -> Self {
        self.image = image;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_dot_binary(mut self, binary: impl Into<String>) -> Self {
        self.dot_binary = binary.into();
        self
    }
}
