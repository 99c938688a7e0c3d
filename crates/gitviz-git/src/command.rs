use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use gitviz_error::{Error, Result};
use tracing::trace;

pub const DEFAULT_GIT_BINARY: &str = "git";

/// Runs `git` subcommands in one repository directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    binary: String,
    dir: PathBuf,
}

impl GitCommand {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: DEFAULT_GIT_BINARY.to_string(),
            dir: dir.into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run `git <args>` and return its raw output, whatever the exit status.
    pub fn output(&self, args: &[&str]) -> Result<Output> {
        trace!(binary = %self.binary, ?args, "git");
        Command::new(&self.binary)
            .current_dir(&self.dir)
            .args(["-c", "core.quotepath=false"])
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                let message = match err.kind() {
                    IoErrorKind::NotFound => format!("'{}' not found", self.binary),
                    _ => format!("failed to run '{}'", self.binary),
                };
                Error::backend_failed(message)
                    .with_operation("git::output")
                    .with_context("command", args.join(" "))
                    .set_source(err)
            })
    }

    /// Run `git <args>` and return stdout; a non-zero exit is an error
    /// carrying git's stderr.
    pub fn stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Error for a `git` invocation that exited unsuccessfully.
pub(crate) fn failure(args: &[&str], output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr);
    Error::backend_failed(format!("git exited with {}: {}", output.status, stderr.trim()))
        .with_operation("git::stdout")
        .with_context("command", args.join(" "))
}
