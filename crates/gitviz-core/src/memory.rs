//! In-memory repository implementing both store traits.
//!
//! Bodies are stored in the pretty-printed grammar, so everything read
//! through a `MemoryRepo` goes through the same parsers as a real backend.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write;

use gitviz_error::{Error, Result};

use crate::object::{ObjectId, ObjectKind};
use crate::store::{ObjectStore, RefStore};

const SIGNATURE: &str = "Fixture <fixture@example.com> 1700000000 +0000";

/// Deterministic hex id derived from a short label, for fixtures.
///
/// Labels up to 20 bytes map to distinct 40-digit ids.
pub fn label_id(label: &str) -> ObjectId {
    let mut hex = String::with_capacity(40);
    for byte in label.bytes() {
        let _ = write!(hex, "{byte:02x}");
    }
    while hex.len() < 40 {
        hex.push('0');
    }
    ObjectId::from_hex_unchecked(hex)
}

#[derive(Debug, Clone)]
struct StoredObject {
    kind: ObjectKind,
    body: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRepo {
    objects: HashMap<ObjectId, StoredObject>,
    order: Vec<ObjectId>,
    refs: BTreeMap<String, ObjectId>,
    upstreams: HashMap<String, String>,
    head: Option<String>,
    detached_head: Option<ObjectId>,
    unreadable: HashSet<ObjectId>,
    fail_enumeration: bool,
    fail_branch_queries: bool,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object with a raw body. Later inserts of the same id are ignored.
    pub fn raw(mut self, id: &ObjectId, kind: ObjectKind, body: impl Into<String>) -> Self {
        if !self.objects.contains_key(id) {
            self.order.push(id.clone());
            self.objects.insert(
                id.clone(),
                StoredObject {
                    kind,
                    body: body.into(),
                },
            );
        }
        self
    }

    pub fn commit(self, id: &ObjectId, tree: &ObjectId, parents: &[&ObjectId]) -> Self {
        let mut body = format!("tree {tree}\n");
        for parent in parents {
            let _ = writeln!(body, "parent {parent}");
        }
        let _ = write!(body, "author {SIGNATURE}\ncommitter {SIGNATURE}\n\ncommit\n");
        self.raw(id, ObjectKind::Commit, body)
    }

    pub fn tree(self, id: &ObjectId, entries: &[(ObjectKind, &ObjectId, &str)]) -> Self {
        let mut body = String::new();
        for (kind, target, name) in entries {
            let _ = writeln!(body, "{} {kind} {target}\t{name}", kind.tree_mode());
        }
        self.raw(id, ObjectKind::Tree, body)
    }

    pub fn blob(self, id: &ObjectId) -> Self {
        self.raw(id, ObjectKind::Blob, "")
    }

    /// Annotated tag `name` pointing at a commit.
    pub fn tag(self, id: &ObjectId, target: &ObjectId, name: &str) -> Self {
        let body = format!(
            "object {target}\ntype commit\ntag {name}\ntagger {SIGNATURE}\n\nrelease {name}\n"
        );
        self.raw(id, ObjectKind::Tag, body)
    }

    /// Replace the enumeration order. Ids may repeat; unknown ids are kept
    /// and surface as objects the store cannot describe.
    pub fn with_order(mut self, order: Vec<ObjectId>) -> Self {
        self.order = order;
        self
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    pub fn reference(mut self, full_name: &str, target: &ObjectId) -> Self {
        self.refs.insert(full_name.to_string(), target.clone());
        self
    }

    pub fn local_branch(self, name: &str, target: &ObjectId) -> Self {
        self.reference(&format!("refs/heads/{name}"), target)
    }

    pub fn remote_branch(self, name: &str, target: &ObjectId) -> Self {
        self.reference(&format!("refs/remotes/{name}"), target)
    }

    pub fn upstream(mut self, local: &str, upstream: &str) -> Self {
        self.upstreams.insert(local.to_string(), upstream.to_string());
        self
    }

    /// HEAD names `branch`, which may not exist yet.
    pub fn head_to_branch(mut self, branch: &str) -> Self {
        self.head = Some(branch.to_string());
        self.detached_head = None;
        self
    }

    pub fn detached_head(mut self, target: &ObjectId) -> Self {
        self.head = None;
        self.detached_head = Some(target.clone());
        self
    }

    /// Make the body of `id` unreadable while keeping its kind.
    pub fn unreadable(mut self, id: &ObjectId) -> Self {
        self.unreadable.insert(id.clone());
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// Make every branch listing and HEAD query fail.
    pub fn failing_branch_queries(mut self) -> Self {
        self.fail_branch_queries = true;
        self
    }

    fn branch_names(&self, prefix: &str) -> Result<Vec<String>> {
        if self.fail_branch_queries {
            return Err(Error::backend_failed("branch listing disabled")
                .with_operation("memory::branch_names"));
        }
        Ok(self
            .refs
            .keys()
            .filter_map(|name| name.strip_prefix(prefix))
            .map(str::to_string)
            .collect())
    }
}

impl ObjectStore for MemoryRepo {
    fn enumerate_objects(&self) -> Result<Vec<ObjectId>> {
        if self.fail_enumeration {
            return Err(Error::backend_failed("enumeration disabled")
                .with_operation("memory::enumerate_objects"));
        }
        Ok(self.order.clone())
    }

    fn object_kind(&self, id: &ObjectId) -> Result<ObjectKind> {
        self.objects
            .get(id)
            .map(|object| object.kind)
            .ok_or_else(|| Error::object_not_found(id.as_str()).with_operation("memory::object_kind"))
    }

    fn object_body(&self, id: &ObjectId) -> Result<String> {
        if self.unreadable.contains(id) {
            return Err(Error::backend_failed("object body unreadable")
                .with_operation("memory::object_body")
                .with_context("object", id.as_str()));
        }
        self.objects
            .get(id)
            .map(|object| object.body.clone())
            .ok_or_else(|| Error::object_not_found(id.as_str()).with_operation("memory::object_body"))
    }
}

impl RefStore for MemoryRepo {
    fn resolve_ref(&self, name: &str) -> Result<ObjectId> {
        if name == "HEAD" {
            let resolved = match &self.head {
                Some(branch) => self.refs.get(&format!("refs/heads/{branch}")).cloned(),
                None => self.detached_head.clone(),
            };
            return resolved.ok_or_else(|| {
                Error::reference_not_found(name).with_operation("memory::resolve_ref")
            });
        }

        let candidates = [
            name.to_string(),
            format!("refs/heads/{name}"),
            format!("refs/remotes/{name}"),
            format!("refs/tags/{name}"),
        ];
        if let Some(id) = candidates.iter().find_map(|c| self.refs.get(c)) {
            return Ok(id.clone());
        }
        match ObjectId::parse(name) {
            Some(id) if self.objects.contains_key(&id) => Ok(id),
            _ => Err(Error::reference_not_found(name).with_operation("memory::resolve_ref")),
        }
    }

    fn local_branches(&self) -> Result<Vec<String>> {
        self.branch_names("refs/heads/")
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        self.branch_names("refs/remotes/")
    }

    fn upstream_of(&self, local: &str) -> Result<Option<String>> {
        Ok(self.upstreams.get(local).cloned())
    }

    fn head_symbolic_target(&self) -> Result<Option<String>> {
        if self.fail_branch_queries {
            return Err(Error::backend_failed("HEAD query disabled")
                .with_operation("memory::head_symbolic_target"));
        }
        Ok(self.head.clone())
    }
}
