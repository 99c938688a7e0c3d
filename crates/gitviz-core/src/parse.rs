//! Line-oriented parsers for pretty-printed object bodies.
//!
//! Grammar per kind:
//!
//! ```text
//! commit:  tree <id>                  (header, exactly one)
//!          parent <id>                (header, zero or more)
//! tree:    <mode> <kind> <id>\t<name> (one line per entry)
//! tag:     object <id>                (header)
//!          tag <name>                 (header)
//! ```
//!
//! Commit and tag headers end at the first blank line; the message after it
//! is never interpreted. Lines that do not fit the grammar are skipped.

use crate::graph::Relation;
use crate::object::{ObjectId, ObjectKind};

/// One outgoing reference of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub relation: Relation,
    pub target: ObjectId,
    /// Name the referencing object gives the target (tree entries only).
    pub name: Option<String>,
    /// Kind the referencing tree records for the target (tree entries only).
    pub entry_kind: Option<ObjectKind>,
}

impl Reference {
    fn new(relation: Relation, target: ObjectId) -> Self {
        Self {
            relation,
            target,
            name: None,
            entry_kind: None,
        }
    }
}

/// References of an object plus the name it declares for itself (tags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedObject {
    pub references: Vec<Reference>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String,
    pub kind: ObjectKind,
    pub id: ObjectId,
    pub name: String,
}

/// Parse an object body according to its kind. Blobs and unknown objects
/// have no references.
pub fn parse_object(kind: ObjectKind, body: &str) -> ParsedObject {
    match kind {
        ObjectKind::Commit => ParsedObject {
            references: parse_commit(body),
            name: None,
        },
        ObjectKind::Tree => ParsedObject {
            references: parse_tree(body),
            name: None,
        },
        ObjectKind::Tag => parse_tag(body),
        ObjectKind::Blob | ObjectKind::Unknown => ParsedObject::default(),
    }
}

pub fn parse_commit(body: &str) -> Vec<Reference> {
    header_fields(body)
        .filter_map(|(key, value)| {
            let relation = match key {
                "tree" => Relation::Tree,
                "parent" => Relation::Parent,
                _ => return None,
            };
            ObjectId::parse(value).map(|id| Reference::new(relation, id))
        })
        .collect()
}

pub fn parse_tree(body: &str) -> Vec<Reference> {
    parse_tree_entries(body)
        .into_iter()
        .map(|entry| {
            let relation = match entry.kind {
                ObjectKind::Commit => Relation::Submodule,
                _ => Relation::Tree,
            };
            Reference {
                relation,
                target: entry.id,
                name: Some(entry.name),
                entry_kind: Some(entry.kind),
            }
        })
        .collect()
}

pub fn parse_tree_entries(body: &str) -> Vec<TreeEntry> {
    body.lines().filter_map(parse_tree_line).collect()
}

fn parse_tree_line(line: &str) -> Option<TreeEntry> {
    let (meta, name) = line.split_once('\t')?;
    if name.is_empty() {
        return None;
    }
    let mut tokens = meta.split_ascii_whitespace();
    let mode = tokens.next()?;
    let kind = tokens.next()?;
    let id = tokens.next()?;
    if tokens.next().is_some() || !mode.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return None;
    }
    Some(TreeEntry {
        mode: mode.to_string(),
        kind: ObjectKind::from_tag(kind),
        id: ObjectId::parse(id)?,
        name: unquote_name(name)?,
    })
}

/// Undo the C-style quoting git applies to names holding `"`, `\`, or
/// control bytes. Unquoted names pass through; a bad escape rejects the line.
fn unquote_name(name: &str) -> Option<String> {
    let Some(inner) = name
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return Some(name.to_string());
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut iter = inner.bytes();
    while let Some(b) = iter.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        let escaped = match iter.next()? {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            b'"' => b'"',
            b'\\' => b'\\',
            d @ b'0'..=b'3' => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    let next = iter.next()?;
                    if !(b'0'..=b'7').contains(&next) {
                        return None;
                    }
                    value = value * 8 + u32::from(next - b'0');
                }
                u8::try_from(value).ok()?
            }
            _ => return None,
        };
        bytes.push(escaped);
    }
    if bytes.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn parse_tag(body: &str) -> ParsedObject {
    let mut parsed = ParsedObject::default();
    for (key, value) in header_fields(body) {
        match key {
            "object" if parsed.references.is_empty() => {
                if let Some(id) = ObjectId::parse(value) {
                    parsed.references.push(Reference::new(Relation::TagTarget, id));
                }
            }
            "tag" if parsed.name.is_none() && !value.is_empty() => {
                parsed.name = Some(value.to_string());
            }
            _ => {}
        }
    }
    parsed
}

/// `(key, value)` pairs of the header block; the value is the rest of the
/// line after the first space.
fn header_fields(body: &str) -> impl Iterator<Item = (&str, &str)> {
    body.lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(' '))
}
