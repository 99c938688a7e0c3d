//! The main Error type for gitviz.

use crate::ErrorKind;
use std::fmt;

/// Unified error type for all gitviz operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up a context value by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the source error (if any).
    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_ref().map(|e| e.as_ref())
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}: {value}")?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.kind, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {key}: {value}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {source:?}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl Error {
    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create an EnumerationFailed error
    pub fn enumeration_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EnumerationFailed, message)
    }

    /// Create an EmptyRepository error
    pub fn empty_repository() -> Self {
        Self::new(ErrorKind::EmptyRepository, "no objects found in repository")
    }

    /// Create an ObjectNotFound error
    pub fn object_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(ErrorKind::ObjectNotFound, format!("object '{id}' not found"))
            .with_context("object", id)
    }

    /// Create a ReferenceNotFound error
    pub fn reference_not_found(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self::new(
            ErrorKind::ReferenceNotFound,
            format!("reference '{reference}' does not resolve"),
        )
        .with_context("reference", reference)
    }

    /// Create an UnexpectedObjectKind error for a reference resolving to the
    /// wrong kind of object.
    pub fn unexpected_kind(
        reference: impl Into<String>,
        actual: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        let reference = reference.into();
        let actual = actual.into();
        Self::new(
            ErrorKind::UnexpectedObjectKind,
            format!("'{reference}' resolves to a {actual} object, not a {expected}"),
        )
        .with_context("reference", reference)
        .with_context("kind", actual)
    }

    /// Create a BackendFailed error
    pub fn backend_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendFailed, message)
    }

    /// Create a ParseFailed error
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// Create a RendererMissing error
    pub fn renderer_missing(binary: impl Into<String>) -> Self {
        let binary = binary.into();
        Self::new(
            ErrorKind::RendererMissing,
            format!("layout renderer '{binary}' could not be started"),
        )
        .with_context("binary", binary)
    }

    /// Create a RendererFailed error
    pub fn renderer_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RendererFailed, message)
    }
}
