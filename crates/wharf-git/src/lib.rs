//! Wharf git engine — repository discovery and status for the Wharf file browser.
//!
//! `wharf-git` locates git repositories under configured roots, tracks the
//! repository owning the user's current directory, and maintains a live
//! view of its working-tree changes by shelling out to the `git` binary
//! and parsing its porcelain output. It is intentionally decoupled from
//! any UI framework: frontends observe a published snapshot and issue
//! stage/unstage/commit requests, nothing more.
//!
//! # Modules
//!
//! - [`locate`] — Repository discovery under roots and ownership lookup for a path.
//! - [`process`] — Async execution of `git` subcommands via [`CommandRunner`].
//! - [`status`] — Porcelain status parsing into [`FileChange`] records.
//! - [`remote`] — Branch name, remote URL, and GitHub web-URL canonicalization.
//! - [`store`] — The observable [`RepoStatusStore`] state machine.
//! - [`telemetry`] — Best-effort analytics events behind a sink trait.
//! - [`config`] — TOML engine configuration ([`EngineConfig`]).
//! - [`error`] — Unified error type ([`GitError`]) and result alias ([`GitResult`]).
//!
//! Nothing here persists between runs: every process start re-discovers
//! and re-queries from scratch.

pub mod config;
pub mod error;
pub mod locate;
pub mod process;
pub mod remote;
pub mod status;
pub mod store;
pub mod telemetry;

pub use config::EngineConfig;
pub use error::{GitError, GitResult};
pub use locate::{discover, find_owning, is_inside_repository, RepoDescriptor, DEFAULT_DISCOVERY_DEPTH};
pub use process::{CommandOutput, CommandRunner, GitCli};
pub use remote::{canonical_web_url, is_github_host};
pub use status::{parse_porcelain, ChangeStatus, FileChange};
pub use store::{LoadState, RepoStatusStore, StatusSnapshot};
pub use telemetry::{EngineEvent, EventSink, NullSink, TracingSink};
