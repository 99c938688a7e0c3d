//! Output generation: DOT text first, then the optional raster image.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use gitviz_dot::Rasterizer;
use gitviz_error::{Error, Result};

use crate::GitvizOptions;

/// Image path used when `--image` is not given.
///
/// The output path with its extension replaced by the format, or
/// `git-objects.<fmt>` / `git-tree.<fmt>` when the text goes to stdout.
/// An output that already ends in `.<fmt>` gets the format appended, so the
/// image never lands on the text.
pub fn default_image_path(opts: &GitvizOptions) -> PathBuf {
    let format = &opts.render.format;
    match &opts.output {
        Some(output) => {
            let image = output.with_extension(format);
            if image != *output {
                return image;
            }
            let mut appended = output.clone().into_os_string();
            appended.push(format!(".{format}"));
            PathBuf::from(appended)
        }
        None if opts.is_tree_mode() => PathBuf::from(format!("git-tree.{format}")),
        None => PathBuf::from(format!("git-objects.{format}")),
    }
}

/// Write `dot` to the output file or stdout, then rasterize it unless
/// disabled.
///
/// The text is complete before the renderer starts, so a renderer failure
/// leaves a valid text artifact behind.
pub fn emit(opts: &GitvizOptions, dot: &str) -> Result<()> {
    if let (Some(output), Some(image)) = (&opts.output, &opts.render.image) {
        if output == image {
            return Err(Error::invalid_argument("image path must differ from the output path")
                .with_operation("cli::emit")
                .with_context("path", output.display().to_string()));
        }
    }
    match &opts.output {
        Some(path) => {
            std::fs::write(path, dot).map_err(|err| {
                Error::from(err)
                    .with_operation("cli::emit")
                    .with_context("path", path.display().to_string())
            })?;
            info!(path = %path.display(), "DOT written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(dot.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|err| Error::from(err).with_operation("cli::emit"))?;
        }
    }

    if opts.render.no_render {
        return Ok(());
    }
    let image = opts
        .render
        .image
        .clone()
        .unwrap_or_else(|| default_image_path(opts));
    Rasterizer::new(&opts.render.dot_binary, &opts.render.format).rasterize(dot, &image)?;
    info!(path = %image.display(), "Image written");
    Ok(())
}
