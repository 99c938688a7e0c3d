//! Error kinds for gitviz operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Recovery is decided at the call site: the graph builders log and skip
/// per-object and per-branch failures, everything else propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid argument or option combination
    InvalidArgument,

    // =========================================================================
    // Object store errors
    // =========================================================================
    /// Listing the objects of the repository failed
    EnumerationFailed,

    /// The repository exposes no objects at all
    EmptyRepository,

    /// An object id is not known to the store
    ObjectNotFound,

    /// An object resolved to a kind the operation cannot work with
    UnexpectedObjectKind,

    /// A reference (branch, HEAD, user-supplied name) did not resolve
    ReferenceNotFound,

    /// The backend command ran but reported failure
    BackendFailed,

    /// Backend output could not be parsed
    ParseFailed,

    // =========================================================================
    // Layout renderer errors
    // =========================================================================
    /// The external layout renderer binary could not be started
    RendererMissing,

    /// The external layout renderer exited with a failure status
    RendererFailed,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
