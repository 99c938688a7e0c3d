//! # gitviz-error
//!
//! Unified error handling for gitviz.
//!
//! - **ErrorKind**: what went wrong (e.g. `EnumerationFailed`, `RendererMissing`)
//! - **Operation**: where it went wrong (`git::enumerate_objects`, `dot::rasterize`)
//! - **Context**: key/value pairs that help locate the cause (object id, reference, path)
//! - **Source**: the underlying error, wrapped instead of leaked
//!
//! ```rust
//! use gitviz_error::{Error, ErrorKind};
//!
//! fn example() -> gitviz_error::Result<()> {
//!     Err(Error::new(ErrorKind::ReferenceNotFound, "no such ref")
//!         .with_operation("git::resolve_ref")
//!         .with_context("reference", "refs/heads/missing"))
//! }
//! ```

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the gitviz [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
