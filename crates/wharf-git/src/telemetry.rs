//! Best-effort analytics events.
//!
//! The engine describes what happened through [`EngineEvent`] values and
//! hands them to an injected [`EventSink`]. The real sink lives in the
//! host application; recording is fire-and-forget and must never block
//! or fail the operation it describes.

use std::path::PathBuf;

/// An analytics event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A discovery pass finished.
    RepositoriesDiscovered { count: usize },
    /// A status load succeeded.
    StatusLoaded { repository: PathBuf, changes: usize },
    /// A status load failed.
    StatusLoadFailed { repository: PathBuf },
    /// A stage operation finished.
    FileStaged { ok: bool },
    /// An unstage operation finished.
    FileUnstaged { ok: bool },
    /// A commit (including its staging pass) finished.
    CommitFinished { ok: bool },
}

/// Receives engine events. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn record(&self, event: EngineEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: EngineEvent) {}
}

/// Sink that logs events at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: EngineEvent) {
        tracing::debug!("engine event: {event:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_events() {
        NullSink.record(EngineEvent::RepositoriesDiscovered { count: 3 });
    }

    #[test]
    fn tracing_sink_accepts_events() {
        TracingSink.record(EngineEvent::CommitFinished { ok: true });
    }

    #[test]
    fn events_compare_by_content() {
        assert_eq!(
            EngineEvent::FileStaged { ok: true },
            EngineEvent::FileStaged { ok: true }
        );
        assert_ne!(
            EngineEvent::FileStaged { ok: true },
            EngineEvent::FileUnstaged { ok: true }
        );
    }
}
