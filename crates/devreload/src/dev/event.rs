//! File change notifications fed to the tracker.

use notify::EventKind;
use std::path::{Path, PathBuf};

/// Kind of filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

/// One filesystem change for one absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Split a notify event into per-path changes.
    ///
    /// Access and metadata-less "other" events carry no content change and
    /// yield nothing.
    pub fn from_notify(event: &notify::Event) -> Vec<ChangeEvent> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Deleted,
            _ => return Vec::new(),
        };

        event
            .paths
            .iter()
            .map(|path| ChangeEvent::new(path.clone(), kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    #[test]
    fn test_from_notify_maps_kinds() {
        let created = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/site/wwwroot/assets/js/app.js"));
        let changes = ChangeEvent::from_notify(&created);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Created);
        assert_eq!(changes[0].path(), Path::new("/site/wwwroot/assets/js/app.js"));

        let modified = notify::Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/a.css"));
        assert_eq!(ChangeEvent::from_notify(&modified)[0].kind, ChangeKind::Modified);

        let removed = notify::Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(PathBuf::from("/a.css"));
        assert_eq!(ChangeEvent::from_notify(&removed)[0].kind, ChangeKind::Deleted);
    }

    #[test]
    fn test_from_notify_rename_yields_every_path() {
        let renamed = notify::Event::new(EventKind::Modify(ModifyKind::Name(
            notify::event::RenameMode::Both,
        )))
        .add_path(PathBuf::from("/a/old.js"))
        .add_path(PathBuf::from("/a/new.js"));

        let changes = ChangeEvent::from_notify(&renamed);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.kind == ChangeKind::Modified));
    }

    #[test]
    fn test_from_notify_ignores_access() {
        let access = notify::Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/a.js"));
        assert!(ChangeEvent::from_notify(&access).is_empty());
    }
}
