//! Repository discovery and ownership lookup.
//!
//! [`discover`] walks configured roots with a bounded depth to find git
//! repositories; [`find_owning`] walks ancestors of a navigation path to
//! find the repository that owns it. Both probe for a `.git` entry on the
//! filesystem only — no git invocation, no object-model library.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::remote::is_github_host;

/// Default nesting depth for [`discover`]. Two levels below each root
/// finds nested project repositories without descending into deep
/// non-repo trees such as dependency caches.
pub const DEFAULT_DISCOVERY_DEPTH: usize = 2;

/// A discovered git repository.
///
/// `RepoDescriptor` is immutable — enriching one with branch and remote
/// information produces a new value via [`RepoDescriptor::with_remote_info`]
/// rather than mutating in place. A branch change therefore requires
/// re-resolving, never patching a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    root: PathBuf,
    branch: Option<String>,
    remote_url: Option<String>,
    is_github: bool,
}

impl RepoDescriptor {
    /// Creates a descriptor for the repository rooted at `root`.
    ///
    /// The root must contain a `.git` entry (directory, or file for
    /// worktrees); [`discover`] and [`find_owning`] guarantee this for
    /// the descriptors they hand out.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            branch: None,
            remote_url: None,
            is_github: false,
        }
    }

    /// Returns a new descriptor carrying the given branch and remote URL.
    ///
    /// The GitHub flag is derived from the remote URL.
    #[must_use]
    pub fn with_remote_info(self, branch: Option<String>, remote_url: Option<String>) -> Self {
        let is_github = remote_url.as_deref().map(is_github_host).unwrap_or(false);
        Self {
            branch,
            remote_url,
            is_github,
            ..self
        }
    }

    /// Returns the repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the current branch name, if resolved and not detached.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Returns the `origin` remote URL, if one is configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    /// Returns `true` when the remote points at github.com.
    pub fn is_github(&self) -> bool {
        self.is_github
    }

    /// Returns the canonical GitHub web URL for this repository, if the
    /// remote is a recognized GitHub remote.
    pub fn web_url(&self) -> Option<String> {
        self.remote_url
            .as_deref()
            .and_then(crate::remote::canonical_web_url)
    }
}

/// Returns `true` when `dir` contains a `.git` entry (file or directory).
fn has_git_entry(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Discovers git repositories under the given roots.
///
/// Each root is walked up to `max_depth` nesting levels. A directory
/// containing a `.git` entry is recorded and not recursed into further;
/// its siblings are still scanned. Hidden entries are skipped. Absent
/// roots and unreadable directories are treated as empty — one
/// inaccessible subtree never aborts the traversal.
///
/// Results are de-duplicated by root path (overlapping roots are legal)
/// and returned in discovery order, unsorted.
pub fn discover(roots: &[PathBuf], max_depth: usize) -> Vec<RepoDescriptor> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for root in roots {
        if !root.is_dir() {
            tracing::debug!("skipping absent discovery root {}", root.display());
            continue;
        }
        scan_directory(root, 0, max_depth, &mut seen, &mut found);
    }

    found
}

fn scan_directory(
    dir: &Path,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<PathBuf>,
    found: &mut Vec<RepoDescriptor>,
) {
    if has_git_entry(dir) {
        if seen.insert(dir.to_path_buf()) {
            found.push(RepoDescriptor::new(dir));
        }
        return;
    }
    if depth >= max_depth {
        return;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("unreadable directory {}: {e}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            scan_directory(&entry.path(), depth + 1, max_depth, seen, found);
        }
    }
}

/// Finds the repository owning `path`.
///
/// Walks `path`, then each ancestor, up to the filesystem root, and
/// returns a descriptor for the first directory containing a `.git`
/// entry. Unlike [`discover`] this walk has no depth bound other than
/// the root itself.
pub fn find_owning(path: &Path) -> Option<RepoDescriptor> {
    path.ancestors()
        .find(|dir| has_git_entry(dir))
        .map(RepoDescriptor::new)
}

/// Returns `true` if the given path is inside a git repository.
pub fn is_inside_repository(path: &Path) -> bool {
    find_owning(path).is_some()
}
