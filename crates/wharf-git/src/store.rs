//! The repository status store.
//!
//! [`RepoStatusStore`] owns the active repository and its file-change
//! list, drives status loads through a [`CommandRunner`], and exposes
//! stage/unstage/commit as a small state machine. It is an explicitly
//! constructed, injected service — never a global — so multiple isolated
//! instances can coexist in tests.
//!
//! All mutation is serialized through one async mutex, and every status
//! fetch carries the generation current when it was issued. A completion
//! whose generation no longer matches is discarded: the child process is
//! allowed to finish naturally, but its result has no effect
//! (soft cancellation). UI-facing code only reads the published
//! [`StatusSnapshot`], via [`RepoStatusStore::subscribe`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::locate::RepoDescriptor;
use crate::process::CommandRunner;
use crate::remote;
use crate::status::{parse_porcelain, FileChange};
use crate::telemetry::{EngineEvent, EventSink, NullSink};

/// Where the store is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No repository selected.
    Idle,
    /// A status fetch is in flight.
    Loading,
    /// The file list reflects the last successful load (possibly empty).
    Ready,
    /// The last load failed; the prior file list is retained unchanged.
    Error,
}

/// The published view of the store, read by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub state: LoadState,
    pub repository: Option<RepoDescriptor>,
    pub files: Vec<FileChange>,
    pub error: Option<String>,
}

impl StatusSnapshot {
    fn idle() -> Self {
        Self {
            state: LoadState::Idle,
            repository: None,
            files: Vec::new(),
            error: None,
        }
    }
}

struct StoreInner {
    repository: Option<RepoDescriptor>,
    files: Vec<FileChange>,
    state: LoadState,
    error: Option<String>,
    /// Bumped on every repository change; fetch results carrying an
    /// older generation are discarded at completion time.
    generation: u64,
    /// At most one status fetch runs at a time.
    fetch_in_flight: bool,
    /// Set when the active repository changed mid-flight; the stale
    /// fetch relaunches once for the new generation when it completes.
    relaunch_pending: bool,
}

/// Stateful orchestrator for the active repository's git status.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct RepoStatusStore {
    inner: Arc<Mutex<StoreInner>>,
    publisher: Arc<watch::Sender<StatusSnapshot>>,
    runner: Arc<dyn CommandRunner>,
    sink: Arc<dyn EventSink>,
}

impl RepoStatusStore {
    /// Creates a store with no telemetry sink.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_sink(runner, Arc::new(NullSink))
    }

    /// Creates a store that reports outcomes to the given sink.
    #[must_use]
    pub fn with_sink(runner: Arc<dyn CommandRunner>, sink: Arc<dyn EventSink>) -> Self {
        let (publisher, _) = watch::channel(StatusSnapshot::idle());
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                repository: None,
                files: Vec::new(),
                state: LoadState::Idle,
                error: None,
                generation: 0,
                fetch_in_flight: false,
                relaunch_pending: false,
            })),
            publisher: Arc::new(publisher),
            runner,
            sink,
        }
    }

    /// Returns a receiver for published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.publisher.subscribe()
    }

    /// Returns the current snapshot directly.
    pub async fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.lock().await;
        snapshot_of(&inner)
    }

    /// Runs repository discovery and reports the count to telemetry.
    ///
    /// Thin wrapper over [`crate::locate::discover`]; discovery failures
    /// are swallowed inside the walk and never surface here.
    pub fn discover_repositories(&self, roots: &[PathBuf], max_depth: usize) -> Vec<RepoDescriptor> {
        let found = crate::locate::discover(roots, max_depth);
        self.sink.record(EngineEvent::RepositoriesDiscovered { count: found.len() });
        found
    }

    /// Makes `repository` the active repository and starts a status load.
    ///
    /// Branch and remote information are resolved first, so the published
    /// descriptor is complete when the `Loading` state appears. The file
    /// list is cleared immediately — entries from the previous repository
    /// never show against the new one.
    pub async fn select_repository(&self, repository: RepoDescriptor) {
        let (branch, url) = remote::resolve_remote_info(self.runner.as_ref(), repository.root()).await;
        let repository = repository.with_remote_info(branch, url);

        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        let generation = inner.generation;
        inner.repository = Some(repository);
        inner.files = Vec::new();
        inner.error = None;
        inner.state = LoadState::Loading;

        if inner.fetch_in_flight {
            inner.relaunch_pending = true;
            self.publish(&inner);
        } else {
            inner.fetch_in_flight = true;
            self.publish(&inner);
            drop(inner);
            self.spawn_fetch(generation);
        }
    }

    /// Convenience for the navigation signal: selects the repository
    /// owning `path`, or clears the store when there is none. Navigating
    /// within the already-active repository is a no-op.
    pub async fn navigate_to(&self, path: &Path) {
        match crate::locate::find_owning(path) {
            Some(repository) => {
                let already_active = {
                    let inner = self.inner.lock().await;
                    inner
                        .repository
                        .as_ref()
                        .is_some_and(|active| active.root() == repository.root())
                };
                if !already_active {
                    self.select_repository(repository).await;
                }
            }
            None => self.clear().await,
        }
    }

    /// Clears the active repository and returns to `Idle`.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.repository = None;
        inner.files = Vec::new();
        inner.error = None;
        inner.state = LoadState::Idle;
        self.publish(&inner);
    }

    /// Re-enters `Loading` and fetches a fresh file list.
    ///
    /// On success the list is replaced wholesale; on failure the store
    /// enters `Error` with the prior list untouched, so a transient
    /// failure never flashes the UI to empty. A refresh requested while
    /// a fetch is already in flight is coalesced into it — no second
    /// `git status` process is spawned.
    pub async fn refresh(&self) {
        let mut inner = self.inner.lock().await;
        if inner.repository.is_none() {
            return;
        }
        let generation = inner.generation;
        inner.state = LoadState::Loading;
        if inner.fetch_in_flight {
            self.publish(&inner);
            return;
        }
        inner.fetch_in_flight = true;
        self.publish(&inner);
        drop(inner);
        self.spawn_fetch(generation);
    }

    /// Stages a file with `git add`.
    ///
    /// Success triggers a [`RepoStatusStore::refresh`]; failure enters
    /// `Error` with the file list and staging intent unchanged.
    pub async fn stage(&self, path: &Path) {
        let ok = self.run_tree_mutation(&["add"], path).await;
        self.sink.record(EngineEvent::FileStaged { ok });
        if ok {
            self.refresh().await;
        }
    }

    /// Unstages a file with `git reset HEAD`.
    ///
    /// Same outcome handling as [`RepoStatusStore::stage`].
    pub async fn unstage(&self, path: &Path) {
        let ok = self.run_tree_mutation(&["reset", "HEAD"], path).await;
        self.sink.record(EngineEvent::FileUnstaged { ok });
        if ok {
            self.refresh().await;
        }
    }

    /// Stages the given files and commits them with `message`.
    ///
    /// Files are staged sequentially; the first stage failure aborts the
    /// whole operation. Returns whether the commit happened. A failed
    /// commit is reported only through this return value and never sets
    /// the store-wide `Error` state; that state is reserved for passive
    /// load failures.
    pub async fn commit(&self, message: &str, files: &[PathBuf]) -> bool {
        let Some(cwd) = self.active_root().await else {
            return false;
        };

        for file in files {
            let file_arg = file.to_string_lossy();
            if let Err(e) = self.runner.run(&["add", file_arg.as_ref()], &cwd).await {
                tracing::warn!("staging {} for commit failed: {e}", file.display());
                self.sink.record(EngineEvent::CommitFinished { ok: false });
                return false;
            }
        }

        match self.runner.run(&["commit", "-m", message], &cwd).await {
            Ok(_) => {
                self.sink.record(EngineEvent::CommitFinished { ok: true });
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::warn!("commit failed: {e}");
                self.sink.record(EngineEvent::CommitFinished { ok: false });
                false
            }
        }
    }

    async fn active_root(&self) -> Option<PathBuf> {
        let inner = self.inner.lock().await;
        inner.repository.as_ref().map(|r| r.root().to_path_buf())
    }

    /// Runs `git <prefix> <path>` in the active repository. On failure
    /// the store enters `Error`; the file list is never touched here.
    async fn run_tree_mutation(&self, prefix: &[&str], path: &Path) -> bool {
        let Some(cwd) = self.active_root().await else {
            return false;
        };

        let path_arg = path.to_string_lossy();
        let mut args: Vec<&str> = prefix.to_vec();
        args.push(path_arg.as_ref());

        match self.runner.run(&args, &cwd).await {
            Ok(_) => true,
            Err(e) => {
                let mut inner = self.inner.lock().await;
                inner.state = LoadState::Error;
                inner.error = Some(e.to_string());
                self.publish(&inner);
                false
            }
        }
    }

    fn spawn_fetch(&self, generation: u64) {
        let store = self.clone();
        tokio::spawn(async move {
            store.run_fetch(generation).await;
        });
    }

    /// Fetch loop. Applies the result only when its generation is still
    /// current; a repository switch mid-flight relaunches the loop once
    /// for the new generation instead of spawning a second task.
    async fn run_fetch(&self, mut generation: u64) {
        loop {
            let cwd = {
                let mut inner = self.inner.lock().await;
                match inner.repository.as_ref().map(|r| r.root().to_path_buf()) {
                    Some(root) => root,
                    None => {
                        inner.fetch_in_flight = false;
                        return;
                    }
                }
            };

            let result = self.runner.run(&["status", "--porcelain"], &cwd).await;

            let mut inner = self.inner.lock().await;
            if inner.generation == generation {
                match result {
                    Ok(output) => {
                        inner.files = parse_porcelain(&output.stdout);
                        inner.state = LoadState::Ready;
                        inner.error = None;
                        self.sink.record(EngineEvent::StatusLoaded {
                            repository: cwd,
                            changes: inner.files.len(),
                        });
                    }
                    Err(e) => {
                        inner.state = LoadState::Error;
                        inner.error = Some(e.to_string());
                        self.sink.record(EngineEvent::StatusLoadFailed { repository: cwd });
                    }
                }
            } else {
                tracing::debug!("discarding stale status result for {}", cwd.display());
            }

            if inner.relaunch_pending {
                inner.relaunch_pending = false;
                generation = inner.generation;
                self.publish(&inner);
                drop(inner);
                continue;
            }

            inner.fetch_in_flight = false;
            self.publish(&inner);
            return;
        }
    }

    fn publish(&self, inner: &StoreInner) {
        let _ = self.publisher.send_replace(snapshot_of(inner));
    }
}

fn snapshot_of(inner: &StoreInner) -> StatusSnapshot {
    StatusSnapshot {
        state: inner.state,
        repository: inner.repository.clone(),
        files: inner.files.clone(),
        error: inner.error.clone(),
    }
}
