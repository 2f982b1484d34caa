//! Queues between the build side and the broadcaster.
//!
//! The watcher thread appends; the broadcaster drains once per tick. Both
//! queues sit behind one lock so a tick never sees half of a build's
//! outcome (its error without its change, or the reverse).

use crate::dev::message::EncodedError;
use parking_lot::Mutex;
use std::path::PathBuf;

/// What one broadcaster tick should announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickSignal {
    /// Nothing happened since the last tick
    Idle,
    /// The newest build failed; show these errors and do not reload
    Errors(Vec<EncodedError>),
    /// The newest build succeeded; reload
    Refresh,
}

#[derive(Debug, Default)]
struct Pending {
    errors: Vec<EncodedError>,
    changes: Vec<PathBuf>,
}

/// The error buffer and the changed-path buffer.
#[derive(Debug, Default)]
pub struct ReloadBuffers {
    pending: Mutex<Pending>,
}

impl ReloadBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a build error.
    pub fn push_error(&self, error: EncodedError) {
        self.pending.lock().errors.push(error);
    }

    /// Queue a changed path.
    pub fn push_change(&self, path: PathBuf) {
        self.pending.lock().changes.push(path);
    }

    /// Record a watch-triggered build outcome for `path`.
    ///
    /// A failed build queues its error; a successful one supersedes errors
    /// still queued from an older failed build. The path is queued either way.
    pub fn record(&self, path: PathBuf, error: Option<EncodedError>) {
        let mut pending = self.pending.lock();
        match error {
            Some(error) => pending.errors.push(error),
            None => pending.errors.clear(),
        }
        pending.changes.push(path);
    }

    /// Drain queued errors.
    pub fn drain_errors(&self) -> Vec<EncodedError> {
        std::mem::take(&mut self.pending.lock().errors)
    }

    /// Drain queued change paths.
    pub fn drain_changes(&self) -> Vec<PathBuf> {
        std::mem::take(&mut self.pending.lock().changes)
    }

    /// Drain both queues and decide what this tick announces.
    ///
    /// Errors win: when any are queued the change paths are dropped with
    /// them, since no successful build has happened since the failure.
    pub fn take_tick(&self) -> TickSignal {
        let mut pending = self.pending.lock();
        let errors = std::mem::take(&mut pending.errors);
        let changes = std::mem::take(&mut pending.changes);

        if !errors.is_empty() {
            TickSignal::Errors(errors)
        } else if !changes.is_empty() {
            TickSignal::Refresh
        } else {
            TickSignal::Idle
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.pending.lock().errors.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.lock().changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_drain_is_destructive() {
        let buffers = ReloadBuffers::new();
        buffers.push_change(PathBuf::from("/assets/a.js"));
        buffers.push_change(PathBuf::from("/assets/b.js"));

        assert_eq!(
            buffers.drain_changes(),
            vec![PathBuf::from("/assets/a.js"), PathBuf::from("/assets/b.js")]
        );
        assert!(buffers.drain_changes().is_empty());
    }

    #[test]
    fn test_concurrent_drains_never_duplicate() {
        let buffers = Arc::new(ReloadBuffers::new());
        for i in 0..1000 {
            buffers.push_change(PathBuf::from(format!("/assets/{i}.js")));
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let buffers = Arc::clone(&buffers);
                std::thread::spawn(move || buffers.drain_changes())
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap().len()).sum();
        assert_eq!(total, 1000);
        assert!(!buffers.has_changes());
    }

    #[test]
    fn test_successful_build_refreshes() {
        let buffers = ReloadBuffers::new();
        buffers.record(PathBuf::from("/assets/js/app.js"), None);

        assert_eq!(buffers.take_tick(), TickSignal::Refresh);
        assert_eq!(buffers.take_tick(), TickSignal::Idle);
    }

    #[test]
    fn test_failed_build_reports_errors_without_refresh() {
        let buffers = ReloadBuffers::new();
        let error = EncodedError::encode("[ERROR] unexpected token");
        buffers.record(PathBuf::from("/assets/js/app.js"), Some(error.clone()));

        assert_eq!(buffers.take_tick(), TickSignal::Errors(vec![error]));
        assert!(!buffers.has_changes());
        assert_eq!(buffers.take_tick(), TickSignal::Idle);
    }

    #[test]
    fn test_later_success_supersedes_queued_error() {
        let buffers = ReloadBuffers::new();
        buffers.record(
            PathBuf::from("/assets/js/app.js"),
            Some(EncodedError::encode("[ERROR] first")),
        );
        buffers.record(PathBuf::from("/assets/js/app.js"), None);

        assert_eq!(buffers.take_tick(), TickSignal::Refresh);
    }

    #[test]
    fn test_drain_errors() {
        let buffers = ReloadBuffers::new();
        buffers.push_error(EncodedError::encode("x"));
        buffers.push_change(PathBuf::from("/a.js"));
        assert!(buffers.has_errors());

        assert_eq!(buffers.drain_errors().len(), 1);
        assert!(buffers.drain_errors().is_empty());
        assert_eq!(buffers.drain_changes(), vec![PathBuf::from("/a.js")]);
        assert!(buffers.drain_changes().is_empty());
    }
}
