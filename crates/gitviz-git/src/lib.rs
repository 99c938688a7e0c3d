//! Object and reference store backed by the `git` command-line tool.
//!
//! Every query is one blocking `git` invocation run in the repository
//! directory. Object kinds learned during enumeration are cached so the
//! graph builder never asks `git` for the type of an enumerated object.

mod command;
mod repo;

pub use command::{DEFAULT_GIT_BINARY, GitCommand};
pub use repo::GitRepo;
