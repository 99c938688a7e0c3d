use std::fmt;
use std::str::FromStr;

use gitviz_error::{Error, Result};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Number of hex digits shown when an object id is abbreviated in labels.
pub const SHORT_ID_LEN: usize = 8;

/// Content address of a repository object.
///
/// The id is kept exactly as the backend printed it; equality is byte
/// equality. Only hex digits are accepted so the id can be embedded in
/// generated identifiers without escaping.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse a hex object id, returning `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(text.to_string()))
    }

    pub(crate) fn from_hex_unchecked(hex: String) -> Self {
        debug_assert!(Self::parse(&hex).is_some(), "not a hex id: {hex}");
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in node labels.
    pub fn short(&self) -> &str {
        // ids are ASCII hex, so byte slicing is safe
        &self.0[..self.0.len().min(SHORT_ID_LEN)]
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::parse_failed(format!("'{s}' is not a hex object id"))
                .with_operation("core::ObjectId::from_str")
        })
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short())
    }
}

/// Type tag of a repository object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
    Unknown,
}

impl ObjectKind {
    /// Map a backend type tag to a kind; unrecognized tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        tag.trim().parse().unwrap_or(ObjectKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// File mode a tree entry of this kind carries.
    pub fn tree_mode(&self) -> &'static str {
        match self {
            ObjectKind::Tree => "040000",
            ObjectKind::Commit => "160000",
            _ => "100644",
        }
    }
}
