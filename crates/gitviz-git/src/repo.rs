use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use gitviz_core::{ObjectId, ObjectKind, ObjectStore, RefStore};
use gitviz_error::{Error, Result};
use tracing::debug;

use crate::command::{GitCommand, failure};

const LOCAL_PREFIX: &str = "refs/heads/";
const REMOTE_PREFIX: &str = "refs/remotes/";

/// A repository reached through the `git` binary.
pub struct GitRepo {
    git: GitCommand,
    kinds: RefCell<HashMap<ObjectId, ObjectKind>>,
}

impl GitRepo {
    /// Open the repository containing `dir`.
    ///
    /// Fails with `InvalidArgument` when `dir` is not inside a repository.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(GitCommand::new(dir))
    }

    pub fn open_with(git: GitCommand) -> Result<Self> {
        let output = git.output(&["rev-parse", "--git-dir"])?;
        if !output.status.success() {
            return Err(Error::invalid_argument(format!(
                "'{}' is not a git repository",
                git.dir().display()
            ))
            .with_operation("git::open")
            .set_source(failure(&["rev-parse", "--git-dir"], &output)));
        }
        debug!(dir = %git.dir().display(), "opened repository");
        Ok(Self {
            git,
            kinds: RefCell::new(HashMap::new()),
        })
    }

    pub fn command(&self) -> &GitCommand {
        &self.git
    }

    /// Number of object kinds known without a per-object query.
    pub fn cached_kinds(&self) -> usize {
        self.kinds.borrow().len()
    }

    fn ref_names(&self, prefix: &str) -> Result<Vec<String>> {
        let listed = self.git.stdout(&[
            "for-each-ref",
            "--format=%(refname) %(symref)",
            prefix.trim_end_matches('/'),
        ])?;
        Ok(listed
            .lines()
            .filter_map(|line| parse_ref_line(line, prefix))
            .collect())
    }
}

/// Parse one `for-each-ref` line: `<refname> <symref>`.
///
/// Symbolic refs such as `refs/remotes/origin/HEAD` are not branches and
/// yield `None`.
pub(crate) fn parse_ref_line(line: &str, prefix: &str) -> Option<String> {
    let (refname, symref) = line.split_once(' ').unwrap_or((line, ""));
    if !symref.trim().is_empty() {
        return None;
    }
    let name = refname.strip_prefix(prefix)?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Branch name of a full ref HEAD points at.
pub(crate) fn head_branch(full: &str) -> Option<String> {
    let full = full.trim();
    let branch = full.strip_prefix(LOCAL_PREFIX).unwrap_or(full);
    (!branch.is_empty()).then(|| branch.to_string())
}

/// Parse one `cat-file --batch-check` line: `<id> <type> <size>`.
///
/// Lines reporting a missing object (`<name> missing`) yield `None`.
pub(crate) fn parse_batch_check_line(line: &str) -> Option<(ObjectId, ObjectKind)> {
    let mut fields = line.split_whitespace();
    let id = ObjectId::parse(fields.next()?)?;
    let kind = match fields.next()? {
        "missing" | "ambiguous" => return None,
        tag => ObjectKind::from_tag(tag),
    };
    Some((id, kind))
}

/// Short branch name of an upstream ref, `None` when unset.
pub(crate) fn short_upstream(full: &str) -> Option<String> {
    let full = full.trim();
    if full.is_empty() {
        return None;
    }
    let short = full
        .strip_prefix(REMOTE_PREFIX)
        .or_else(|| full.strip_prefix(LOCAL_PREFIX))
        .unwrap_or(full);
    Some(short.to_string())
}

impl ObjectStore for GitRepo {
    fn enumerate_objects(&self) -> Result<Vec<ObjectId>> {
        let listed = self
            .git
            .stdout(&["cat-file", "--batch-check", "--batch-all-objects"])?;
        let mut kinds = self.kinds.borrow_mut();
        let mut ids = Vec::new();
        for line in listed.lines() {
            match parse_batch_check_line(line) {
                Some((id, kind)) => {
                    kinds.insert(id.clone(), kind);
                    ids.push(id);
                }
                None => debug!(line, "skipping batch-check line"),
            }
        }
        Ok(ids)
    }

    fn object_kind(&self, id: &ObjectId) -> Result<ObjectKind> {
        if let Some(kind) = self.kinds.borrow().get(id) {
            return Ok(*kind);
        }
        let output = self.git.output(&["cat-file", "-t", id.as_str()])?;
        if !output.status.success() {
            return Err(Error::object_not_found(id.as_str())
                .with_operation("git::object_kind")
                .set_source(failure(&["cat-file", "-t", id.as_str()], &output)));
        }
        let kind = ObjectKind::from_tag(&String::from_utf8_lossy(&output.stdout));
        self.kinds.borrow_mut().insert(id.clone(), kind);
        Ok(kind)
    }

    fn object_body(&self, id: &ObjectId) -> Result<String> {
        self.git
            .stdout(&["cat-file", "-p", id.as_str()])
            .map_err(|err| err.with_operation("git::object_body"))
    }
}

impl RefStore for GitRepo {
    fn resolve_ref(&self, name: &str) -> Result<ObjectId> {
        let output = self.git.output(&["rev-parse", "--verify", "-q", name])?;
        if !output.status.success() {
            return Err(Error::reference_not_found(name).with_operation("git::resolve_ref"));
        }
        let text = String::from_utf8_lossy(&output.stdout);
        ObjectId::parse(text.trim()).ok_or_else(|| {
            Error::parse_failed(format!("unexpected rev-parse output '{}'", text.trim()))
                .with_operation("git::resolve_ref")
                .with_context("reference", name)
        })
    }

    fn local_branches(&self) -> Result<Vec<String>> {
        self.ref_names(LOCAL_PREFIX)
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        self.ref_names(REMOTE_PREFIX)
    }

    fn upstream_of(&self, local: &str) -> Result<Option<String>> {
        let full = format!("{LOCAL_PREFIX}{local}");
        let upstream = self
            .git
            .stdout(&["for-each-ref", "--format=%(upstream)", &full])?;
        Ok(upstream.lines().next().and_then(short_upstream))
    }

    fn head_symbolic_target(&self) -> Result<Option<String>> {
        let args = ["symbolic-ref", "-q", "HEAD"];
        let output = self.git.output(&args)?;
        if output.status.success() {
            return Ok(head_branch(&String::from_utf8_lossy(&output.stdout)));
        }
        // exit 1 without stderr: HEAD is detached
        if output.status.code() == Some(1) && output.stderr.is_empty() {
            return Ok(None);
        }
        Err(failure(&args, &output).with_operation("git::head_symbolic_target"))
    }
}
