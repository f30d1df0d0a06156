//! Branch and remote resolution.
//!
//! Derives the current branch name and the `origin` remote URL from git
//! configuration, and canonicalizes GitHub remotes into web URLs. A
//! repository without a branch (detached HEAD) or without a remote is
//! valid — both resolve to `None`, never to an error.

use std::path::Path;

use crate::process::CommandRunner;

/// Returns the current branch name via `git branch --show-current`.
///
/// Empty output (detached HEAD) and command failures both yield `None`.
pub async fn current_branch(runner: &dyn CommandRunner, cwd: &Path) -> Option<String> {
    let output = runner.run(&["branch", "--show-current"], cwd).await.ok()?;
    let name = output.stdout.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Returns the URL of the `origin` remote via `git remote get-url origin`.
///
/// A non-zero exit (no remote configured) yields `None` — remoteless
/// repositories are valid.
pub async fn remote_url(runner: &dyn CommandRunner, cwd: &Path) -> Option<String> {
    let output = runner.run(&["remote", "get-url", "origin"], cwd).await.ok()?;
    let url = output.stdout.trim();
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Resolves `(branch, remote_url)` for a repository in one call.
pub async fn resolve_remote_info(
    runner: &dyn CommandRunner,
    cwd: &Path,
) -> (Option<String>, Option<String>) {
    let branch = current_branch(runner, cwd).await;
    let url = remote_url(runner, cwd).await;
    (branch, url)
}

/// Returns `true` when the remote URL points at github.com.
pub fn is_github_host(url: &str) -> bool {
    url.contains("github.com")
}

/// Rewrites a GitHub remote URL into its canonical web URL.
///
/// `git@github.com:org/repo[.git]` and `https://github.com/org/repo[.git]`
/// both become `https://github.com/org/repo`. Any other host or format
/// yields `None`, even when a remote exists; only GitHub remotes are
/// canonicalized.
pub fn canonical_web_url(url: &str) -> Option<String> {
    let rest = if let Some(rest) = url.strip_prefix("git@github.com:") {
        rest
    } else if let Some(rest) = url.strip_prefix("https://github.com/") {
        rest
    } else {
        return None;
    };

    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        return None;
    }
    Some(format!("https://github.com/{rest}"))
}
