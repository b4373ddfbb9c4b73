//! Filesystem server: a per-scope virtual filesystem backing the
//! `read_file`/`write_file`/`list_files` tools and the filesystem
//! middleware's state-snapshot tooling.
//!
//! One server can have any number of storage backends registered, each
//! scoped to its own `base_directory` virtual path prefix via
//! `register_persistence`; a virtual path with no owning registration lives
//! in memory only. The `base_directory` is stripped from a virtual path
//! before the owning backend ever sees it, and reconstructed when
//! enumerating what that backend holds.
//!
//! Writes are debounced: a write marks the entry dirty and schedules a
//! flush after the owning config's `debounce_ms`; a second write to the same
//! path before the timer fires cancels the pending flush and reschedules,
//! so a burst of edits persists once instead of once per call.

mod backend;
mod config;
mod entry;
mod server;

pub use backend::{DiskBackend, MemoryBackend, PersistenceBackend};
pub use config::PersistenceConfig;
pub use entry::FileEntry;
pub use server::FilesystemServer;
