//! Filters raw file changes and debounces them per path.
//!
//! Editors and the OS often report one save as several events (truncate,
//! write, rename). The tracker lets the first one through and drops the
//! rest for the debounce window, so one save costs one bundler run.

use crate::dev::event::ChangeEvent;
use crate::dev::invoker::{BuildInvoker, BuildReport};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why an event was dropped before reaching the debounce table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not inside the watched assets tree
    OutsideWatchRoot,
    /// Inside the bundler's output tree
    BuildOutput,
    /// Editor or OS temp file
    TempFile,
    /// Extension not in the allow-list
    Extension,
}

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Ignored(IgnoreReason),
    /// Same path was accepted less than one window ago
    Debounced,
    Rebuilt(BuildReport),
}

/// Which paths count as source changes.
#[derive(Debug, Clone)]
pub struct TrackerPolicy {
    pub watch_root: PathBuf,
    pub output_root: PathBuf,
    /// Lowercase, without the dot
    pub extensions: Vec<String>,
    /// Lowercase
    pub ignore_prefixes: Vec<String>,
    /// Lowercase
    pub ignore_suffixes: Vec<String>,
    pub debounce: Duration,
}

impl TrackerPolicy {
    pub fn new(
        watch_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        extensions: &[String],
        ignore_prefixes: &[String],
        ignore_suffixes: &[String],
        debounce: Duration,
    ) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items.iter().map(|s| s.to_lowercase()).collect()
        };
        Self {
            watch_root: watch_root.into(),
            output_root: output_root.into(),
            extensions: lower(extensions),
            ignore_prefixes: lower(ignore_prefixes),
            ignore_suffixes: lower(ignore_suffixes),
            debounce,
        }
    }

    /// Reason to drop `path`, or `None` if it is a relevant source file.
    pub fn ignore_reason(&self, path: &Path) -> Option<IgnoreReason> {
        if path.starts_with(&self.output_root) {
            return Some(IgnoreReason::BuildOutput);
        }
        if !path.starts_with(&self.watch_root) {
            return Some(IgnoreReason::OutsideWatchRoot);
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            return Some(IgnoreReason::Extension);
        };

        if self.ignore_prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.ignore_suffixes.iter().any(|s| name.ends_with(s.as_str()))
        {
            return Some(IgnoreReason::TempFile);
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !self.extensions.contains(&extension) {
            return Some(IgnoreReason::Extension);
        }

        None
    }
}

/// Last accepted time per path. Entries are never removed.
#[derive(Debug)]
pub struct DebounceTable {
    window: Duration,
    accepted: Mutex<HashMap<PathBuf, Instant>>,
}

impl DebounceTable {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            accepted: Mutex::new(HashMap::new()),
        }
    }

    /// Accept `path` at `now` unless it was accepted less than one window ago.
    ///
    /// A `now` earlier than the stored time counts as inside the window, so
    /// stored times never go backwards.
    pub fn try_accept(&self, path: &Path, now: Instant) -> bool {
        let mut accepted = self.accepted.lock();
        if let Some(last) = accepted.get(path) {
            match now.checked_duration_since(*last) {
                Some(elapsed) if elapsed >= self.window => {}
                _ => return false,
            }
        }
        accepted.insert(path.to_path_buf(), now);
        true
    }

    pub fn last_accepted(&self, path: &Path) -> Option<Instant> {
        self.accepted.lock().get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.accepted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.lock().is_empty()
    }
}

/// Turns file events into at most one rebuild per path per window.
pub struct ChangeTracker {
    policy: TrackerPolicy,
    table: DebounceTable,
    invoker: Arc<BuildInvoker>,
}

impl ChangeTracker {
    pub fn new(policy: TrackerPolicy, invoker: Arc<BuildInvoker>) -> Self {
        let table = DebounceTable::new(policy.debounce);
        Self {
            policy,
            table,
            invoker,
        }
    }

    pub fn policy(&self) -> &TrackerPolicy {
        &self.policy
    }

    pub fn table(&self) -> &DebounceTable {
        &self.table
    }

    /// Handle one event; blocks for the duration of a rebuild.
    pub fn on_file_event(&self, event: &ChangeEvent) -> TrackOutcome {
        self.on_file_event_at(event, Instant::now())
    }

    /// [`on_file_event`](Self::on_file_event) with an explicit clock.
    pub fn on_file_event_at(&self, event: &ChangeEvent, now: Instant) -> TrackOutcome {
        let path = event.path();

        if let Some(reason) = self.policy.ignore_reason(path) {
            tracing::trace!("Ignoring {} ({:?})", path.display(), reason);
            return TrackOutcome::Ignored(reason);
        }

        if !self.table.try_accept(path, now) {
            tracing::trace!("Debounced {}", path.display());
            return TrackOutcome::Debounced;
        }

        let shown = path.strip_prefix(&self.policy.watch_root).unwrap_or(path);
        tracing::info!("{:?} {}, rebuilding", event.kind, shown.display());

        let report = self.invoker.rebuild_for(path);
        if report.succeeded() {
            tracing::info!("Rebuilt in {}ms", report.duration.as_millis());
        }
        TrackOutcome::Rebuilt(report)
    }
}
