//! Backend interfaces and the per-run object catalog.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use gitviz_error::{Error, Result};
use tracing::{info, warn};

use crate::object::{ObjectId, ObjectKind};
use crate::parse::{ParsedObject, parse_object};

/// Supplies objects: enumeration, type tags and pretty-printed bodies.
pub trait ObjectStore {
    /// Every object id known to the repository.
    fn enumerate_objects(&self) -> Result<Vec<ObjectId>>;

    fn object_kind(&self, id: &ObjectId) -> Result<ObjectKind>;

    /// Pretty-printed body in the grammar understood by [`crate::parse`].
    fn object_body(&self, id: &ObjectId) -> Result<String>;
}

/// Supplies references: branches, upstream configuration and HEAD.
pub trait RefStore {
    /// Resolve a reference name (full ref, short name or hex id) to an id.
    fn resolve_ref(&self, name: &str) -> Result<ObjectId>;

    /// Short names of local branches (`main`, `feature/x`).
    fn local_branches(&self) -> Result<Vec<String>>;

    /// Short names of remote-tracking branches (`origin/main`).
    fn remote_branches(&self) -> Result<Vec<String>>;

    /// Short name of the branch `local` follows, if configured.
    fn upstream_of(&self, local: &str) -> Result<Option<String>>;

    /// Branch HEAD points at, or `None` when HEAD is detached.
    fn head_symbolic_target(&self) -> Result<Option<String>>;
}

/// Enumerate all objects, keeping first-seen order and dropping duplicates.
///
/// Fails with `EnumerationFailed` when the backend errors and with
/// `EmptyRepository` when there is nothing to draw.
pub fn enumerate_objects<S>(store: &S) -> Result<Vec<ObjectId>>
where
    S: ObjectStore + ?Sized,
{
    let start = Instant::now();
    let listed = store.enumerate_objects().map_err(|err| {
        Error::enumeration_failed("listing repository objects failed")
            .with_operation("core::enumerate_objects")
            .set_source(err)
    })?;

    let mut seen = HashSet::with_capacity(listed.len());
    let ids: Vec<ObjectId> = listed
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();

    if ids.is_empty() {
        return Err(Error::empty_repository().with_operation("core::enumerate_objects"));
    }

    info!(
        "Object enumeration: {:.2}s ({} objects)",
        start.elapsed().as_secs_f64(),
        ids.len()
    );
    Ok(ids)
}

/// Kind cache and parse front-end over an [`ObjectStore`] for one run.
///
/// Kinds are fetched at most once per id. Bodies parsed during the name pass
/// are kept until the traversal consumes them, so each body is fetched once.
pub struct ObjectCatalog<'s, S: ObjectStore + ?Sized> {
    store: &'s S,
    kinds: HashMap<ObjectId, ObjectKind>,
    parsed: HashMap<ObjectId, ParsedObject>,
}

impl<'s, S: ObjectStore + ?Sized> ObjectCatalog<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            kinds: HashMap::new(),
            parsed: HashMap::new(),
        }
    }

    /// Kind of `id`; a failed lookup is logged and cached as `Unknown`.
    pub fn kind(&mut self, id: &ObjectId) -> ObjectKind {
        if let Some(kind) = self.kinds.get(id) {
            return *kind;
        }
        let kind = match self.store.object_kind(id) {
            Ok(kind) => kind,
            Err(err) => {
                warn!(object = %id, error = %err, "object kind lookup failed");
                ObjectKind::Unknown
            }
        };
        self.kinds.insert(id.clone(), kind);
        kind
    }

    /// Parse `id` and keep the result for a later [`Self::take_parsed`].
    pub fn parse_and_keep(&mut self, id: &ObjectId, kind: ObjectKind) -> &ParsedObject {
        if !self.parsed.contains_key(id) {
            let parsed = self.load(id, kind);
            self.parsed.insert(id.clone(), parsed);
        }
        &self.parsed[id]
    }

    /// Parsed references of `id`, from the kept results or freshly loaded.
    pub fn take_parsed(&mut self, id: &ObjectId, kind: ObjectKind) -> ParsedObject {
        match self.parsed.remove(id) {
            Some(parsed) => parsed,
            None => self.load(id, kind),
        }
    }

    /// Fetch and parse; an unreadable body yields no references.
    fn load(&self, id: &ObjectId, kind: ObjectKind) -> ParsedObject {
        if matches!(kind, ObjectKind::Blob | ObjectKind::Unknown) {
            return ParsedObject::default();
        }
        match self.store.object_body(id) {
            Ok(body) => parse_object(kind, &body),
            Err(err) => {
                warn!(object = %id, %kind, error = %err, "object body unavailable");
                ParsedObject::default()
            }
        }
    }
}
