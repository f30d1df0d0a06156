//! Engine configuration loaded from a TOML file.
//!
//! All fields have defaults so the engine works without a config file.
//! Whether the host application exposes this file to end users is its
//! own concern; the engine only consumes the values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GitError, GitResult};
use crate::locate::DEFAULT_DISCOVERY_DEPTH;
use crate::process::GitCli;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub command: CommandConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotFound`] if the file does not exist.
    /// - [`GitError::PermissionDenied`] if the file is not readable.
    /// - [`GitError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> GitResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GitError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => GitError::PermissionDenied(path.to_path_buf()),
            _ => GitError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| GitError::ConfigParse(e.to_string()))
    }

    /// Builds a [`GitCli`] runner from the command section.
    #[must_use]
    pub fn runner(&self) -> GitCli {
        let cli = GitCli::with_binary(self.command.git_binary.as_str());
        if self.command.timeout_secs > 0 {
            cli.with_timeout(Duration::from_secs(self.command.timeout_secs))
        } else {
            cli
        }
    }
}

/// Repository discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Root directories scanned by discovery. Stored verbatim; any
    /// expansion (`~`, environment variables) is the host's job.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Nesting depth below each root.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            max_depth: default_max_depth(),
        }
    }
}

/// git invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Executable to invoke; a bare name is resolved via `PATH`.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
    /// Per-invocation time limit in seconds. `0` disables the limit.
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            timeout_secs: 0,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_DISCOVERY_DEPTH
}

fn default_git_binary() -> String {
    "git".to_string()
}
