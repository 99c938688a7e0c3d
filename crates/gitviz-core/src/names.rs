//! Display-name discovery ahead of graph construction.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::{debug, info};

use crate::object::{ObjectId, ObjectKind};
use crate::store::{ObjectCatalog, ObjectStore};

const PROGRESS_EVERY: usize = 100;

/// Object id to display name. The first name recorded for an id is kept.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: HashMap<ObjectId, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` for `id` unless it already has one. Returns whether it was recorded.
    pub fn record(&mut self, id: &ObjectId, name: &str) -> bool {
        if self.names.contains_key(id) {
            return false;
        }
        self.names.insert(id.clone(), name.to_string());
        true
    }

    pub fn get(&self, id: &ObjectId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Scan `ids` in order and collect names from tree entries and tag headers.
///
/// Runs before any node exists so labels never depend on traversal order.
pub fn resolve_names<S>(catalog: &mut ObjectCatalog<'_, S>, ids: &[ObjectId]) -> NameTable
where
    S: ObjectStore + ?Sized,
{
    let start = Instant::now();
    let mut names = NameTable::new();

    for (i, id) in ids.iter().enumerate() {
        if (i + 1) % PROGRESS_EVERY == 0 {
            debug!("Scanned {}/{} objects for names", i + 1, ids.len());
        }

        match catalog.kind(id) {
            ObjectKind::Tree => {
                let parsed = catalog.parse_and_keep(id, ObjectKind::Tree);
                for reference in &parsed.references {
                    if let Some(name) = &reference.name {
                        names.record(&reference.target, name);
                    }
                }
            }
            ObjectKind::Tag => {
                let parsed = catalog.parse_and_keep(id, ObjectKind::Tag);
                if let Some(name) = &parsed.name {
                    names.record(id, name);
                }
            }
            _ => {}
        }
    }

    info!(
        "Name resolution: {:.2}s ({} names)",
        start.elapsed().as_secs_f64(),
        names.len()
    );
    names
}

/// Trees reachable from `root` through tree entries, in depth-first preorder.
pub fn reachable_trees<S>(catalog: &mut ObjectCatalog<'_, S>, root: &ObjectId) -> Vec<ObjectId>
where
    S: ObjectStore + ?Sized,
{
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![root.clone()];

    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) || catalog.kind(&id) != ObjectKind::Tree {
            continue;
        }
        let parsed = catalog.parse_and_keep(&id, ObjectKind::Tree);
        stack.extend(parsed.references.iter().rev().map(|r| r.target.clone()));
        order.push(id);
    }
    order
}
