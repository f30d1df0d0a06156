//! Error types for `wharf-git`.
//!
//! All fallible operations in the engine return [`GitResult<T>`],
//! which is an alias for `Result<T, GitError>`.

use std::path::PathBuf;

/// Unified error type for all engine operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action. Failures of the `git`
/// child process are split into the two cases callers treat differently:
/// the process could not be started at all ([`GitError::SpawnFailed`]),
/// or it ran and reported failure ([`GitError::NonZeroExit`]).
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// The `git` process could not be started (missing binary, invalid
    /// working directory).
    #[error("failed to launch git: {0}")]
    SpawnFailed(String),

    /// `git` ran and exited with a non-zero status. `stderr` is carried
    /// verbatim since it is the only explanation git provides.
    #[error("git exited with status {code}: {stderr}")]
    NonZeroExit {
        /// The process exit code.
        code: i32,
        /// Captured standard error, trimmed of trailing whitespace.
        stderr: String,
    },

    /// `git` did not finish within the configured time limit.
    #[error("git did not finish within {0}s")]
    TimedOut(u64),

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `wharf-git`.
pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn spawn_failed_displays_reason() {
        let err = GitError::SpawnFailed("No such file or directory".to_string());
        assert_eq!(
            err.to_string(),
            "failed to launch git: No such file or directory"
        );
    }

    #[test]
    fn non_zero_exit_displays_code_and_stderr() {
        let err = GitError::NonZeroExit {
            code: 128,
            stderr: "fatal: not a git repository".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git exited with status 128: fatal: not a git repository"
        );
    }

    #[test]
    fn timed_out_displays_limit() {
        let err = GitError::TimedOut(30);
        assert_eq!(err.to_string(), "git did not finish within 30s");
    }

    #[test]
    fn not_found_displays_path() {
        let err = GitError::NotFound(PathBuf::from("/missing/config.toml"));
        assert_eq!(err.to_string(), "path not found: /missing/config.toml");
    }

    #[test]
    fn permission_denied_displays_path() {
        let err = GitError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = GitError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GitError = io_err.into();
        assert!(matches!(err, GitError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn git_result_ok() {
        let result: GitResult<i32> = Ok(42);
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn error_is_debug() {
        let err = GitError::TimedOut(5);
        let debug = format!("{:?}", err);
        assert!(debug.contains("TimedOut"));
    }
}
