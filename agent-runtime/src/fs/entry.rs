//! One file tracked by a `FilesystemServer`.

/// State of one path in a filesystem server's in-memory view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersistenceState {
    /// Never loaded from or written to the backend.
    #[default]
    Unsynced,
    /// Matches what's on the backend.
    Synced,
    /// Changed in memory since the last successful flush.
    Dirty,
}

/// One file's in-memory state: content (lazily loaded), dirty flag, and
/// where it stands relative to the persistence backend.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: String,
    /// `None` until the content has been loaded from the backend or written.
    pub content: Option<String>,
    pub state: PersistenceState,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
            state: PersistenceState::Unsynced,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.state == PersistenceState::Dirty
    }
}
