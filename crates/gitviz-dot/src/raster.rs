//! Invocation of the external `dot` layout renderer.

use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use gitviz_error::{Error, Result};
use tracing::{debug, info};

pub const DEFAULT_DOT_BINARY: &str = "dot";
pub const DEFAULT_FORMAT: &str = "png";

/// Feeds DOT text to the layout renderer and writes the image it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rasterizer {
    binary: String,
    format: String,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_DOT_BINARY, DEFAULT_FORMAT)
    }
}

impl Rasterizer {
    pub fn new(binary: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            format: format.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Run `<binary> -T<format> -o <output>` with `dot` on stdin.
    pub fn rasterize(&self, dot: &str, output: &Path) -> Result<()> {
        let start = Instant::now();
        debug!(binary = %self.binary, format = %self.format, output = %output.display(), "starting renderer");

        let mut child = Command::new(&self.binary)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(output.as_os_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                IoErrorKind::NotFound | IoErrorKind::PermissionDenied => {
                    Error::renderer_missing(&self.binary)
                        .with_operation("dot::rasterize")
                        .set_source(err)
                }
                _ => Error::renderer_failed(format!("failed to start '{}'", self.binary))
                    .with_operation("dot::rasterize")
                    .set_source(err),
            })?;

        // A renderer that exits early closes its stdin; its exit status and
        // stderr describe the failure better than the broken pipe does.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };

        let result = child.wait_with_output().map_err(|err| {
            Error::renderer_failed(format!("failed to wait for '{}'", self.binary))
                .with_operation("dot::rasterize")
                .set_source(err)
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::renderer_failed(format!(
                "'{}' exited with {}: {}",
                self.binary,
                result.status,
                stderr.trim()
            ))
            .with_operation("dot::rasterize")
            .with_context("output", output.display().to_string()));
        }
        written.map_err(|err| {
            Error::renderer_failed(format!("failed to write to '{}'", self.binary))
                .with_operation("dot::rasterize")
                .set_source(err)
        })?;

        info!(
            "Rasterization: {:.2}s ({})",
            start.elapsed().as_secs_f64(),
            output.display()
        );
        Ok(())
    }
}
