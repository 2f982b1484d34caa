//! OS file watching for the assets tree.
//!
//! notify delivers events on its own thread; each path is handed to the
//! [`ChangeTracker`] there, so a rebuild blocks that thread and nothing
//! else.

use crate::dev::event::ChangeEvent;
use crate::dev::tracker::ChangeTracker;
use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recursive watcher on the assets root. Watching stops when dropped.
pub struct AssetWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl AssetWatcher {
    /// Start watching `root` and feed every change to `tracker`.
    ///
    /// # Errors
    ///
    /// Returns error if `root` doesn't exist or the OS watch cannot be set up
    pub fn start(root: PathBuf, tracker: Arc<ChangeTracker>) -> Result<Self> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(&event) {
                        tracker.on_file_event(&change);
                    }
                }
                // Watching continues; the buffers are left alone.
                Err(e) => tracing::error!("File watcher error: {}", e),
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!("Watching {}", root.display());

        Ok(Self {
            _watcher: watcher,
            root,
        })
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
