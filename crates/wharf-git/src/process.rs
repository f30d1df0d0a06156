//! Child-process execution for the `git` binary.
//!
//! [`GitCli`] spawns git asynchronously and captures its full output.
//! The [`CommandRunner`] trait is the seam every other component goes
//! through, so tests can substitute a fake runner and never touch a
//! real git installation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{GitError, GitResult};

/// The captured outcome of one git invocation.
///
/// Ephemeral — produced, inspected, and dropped; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code (`-1` when terminated by a signal).
    pub exit_code: i32,
    /// Captured standard output, decoded lossily.
    pub stdout: String,
    /// Captured standard error, decoded lossily.
    pub stderr: String,
}

/// Executes a git subcommand in a given working directory.
///
/// Implementations must be safe to call from any task; callers compose
/// the returned future rather than coordinating via callbacks.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `git <args>` in `cwd` and returns its captured output.
    ///
    /// # Errors
    ///
    /// - [`GitError::SpawnFailed`] — the process could not be started.
    /// - [`GitError::NonZeroExit`] — git ran and reported failure.
    /// - [`GitError::TimedOut`] — the configured time limit elapsed.
    async fn run(&self, args: &[&str], cwd: &Path) -> GitResult<CommandOutput>;
}

/// Production [`CommandRunner`] backed by the real `git` executable.
///
/// No retries, no output streaming: git's status-sized output is bounded,
/// so stdout and stderr are captured whole. There is no time limit unless
/// one is set with [`GitCli::with_timeout`] — a hung invocation stalls
/// only the one operation that issued it.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl GitCli {
    /// Creates a runner that invokes `git` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_binary("git")
    }

    /// Creates a runner that invokes the given executable instead of `git`.
    ///
    /// Used when the host configures an explicit git path, and by tests
    /// that substitute a plain shell binary.
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Returns a copy of this runner with a per-invocation time limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GitCli {
    async fn run(&self, args: &[&str], cwd: &Path) -> GitResult<CommandOutput> {
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match self.timeout {
            Some(limit) => {
                // Reap the child if the time limit wins the race.
                command.kill_on_drop(true);
                tokio::time::timeout(limit, command.output())
                    .await
                    .map_err(|_| GitError::TimedOut(limit.as_secs()))?
            }
            None => command.output().await,
        }
        .map_err(|e| GitError::SpawnFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr)
            .trim_end()
            .to_string();
        let exit_code = output.status.code().unwrap_or(-1);

        if output.status.success() {
            Ok(CommandOutput {
                exit_code,
                stdout,
                stderr,
            })
        } else {
            tracing::debug!(
                "git {} exited with status {exit_code}",
                args.first().copied().unwrap_or_default()
            );
            Err(GitError::NonZeroExit {
                code: exit_code,
                stderr,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // --- success path ---

    #[cfg(unix)]
    #[tokio::test]
    async fn run_captures_stdout_on_success() {
        let tmp = TempDir::new().unwrap();
        let runner = GitCli::with_binary("sh");

        let output = runner
            .run(&["-c", "printf hello"], tmp.path())
            .await
            .unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr, "");
    }

    // --- non-zero exit ---

    #[cfg(unix)]
    #[tokio::test]
    async fn run_non_zero_exit_carries_code_and_stderr() {
        let tmp = TempDir::new().unwrap();
        let runner = GitCli::with_binary("sh");

        let err = runner
            .run(&["-c", "printf broken >&2; exit 3"], tmp.path())
            .await
            .unwrap_err();
        match err {
            GitError::NonZeroExit { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("expected NonZeroExit, got: {other:?}"),
        }
    }

    // --- spawn failures ---

    #[tokio::test]
    async fn run_missing_binary_is_spawn_failed() {
        let tmp = TempDir::new().unwrap();
        let runner = GitCli::with_binary("wharf-definitely-not-a-binary");

        let err = runner.run(&["status"], tmp.path()).await.unwrap_err();
        assert!(matches!(err, GitError::SpawnFailed(_)));
    }

    #[tokio::test]
    async fn run_invalid_cwd_is_spawn_failed() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("nonexistent");
        let runner = GitCli::with_binary("sh");

        let err = runner.run(&["-c", "true"], &gone).await.unwrap_err();
        assert!(matches!(err, GitError::SpawnFailed(_)));
    }

    // --- timeout ---

    #[cfg(unix)]
    #[tokio::test]
    async fn run_times_out_when_limit_elapses() {
        let tmp = TempDir::new().unwrap();
        let runner = GitCli::with_binary("sleep").with_timeout(Duration::from_millis(50));

        let err = runner.run(&["5"], tmp.path()).await.unwrap_err();
        assert!(matches!(err, GitError::TimedOut(_)));
    }

    // --- constructors ---

    #[test]
    fn default_runner_uses_git() {
        let runner = GitCli::default();
        assert_eq!(runner.binary, PathBuf::from("git"));
        assert!(runner.timeout.is_none());
    }

    #[test]
    fn command_output_clone_and_eq() {
        let output = CommandOutput {
            exit_code: 0,
            stdout: "out".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.clone(), output);
    }
}
