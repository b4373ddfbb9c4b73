//! `FilesystemServer`: the virtual filesystem backing one scope.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::AgentError;

use super::backend::PersistenceBackend;
use super::config::PersistenceConfig;
use super::entry::{FileEntry, PersistenceState};

/// One registered storage backend and the config that governs it.
struct PersistenceRegistration {
    config: PersistenceConfig,
    backend: Arc<dyn PersistenceBackend>,
}

/// A per-scope virtual filesystem: reads lazily load from the backend and
/// cache in memory; writes update memory immediately and schedule a
/// debounced flush so a burst of edits to the same path persists once.
///
/// Any number of storage backends can be registered, each scoped to its own
/// `base_directory` virtual path prefix (`register_persistence`). A virtual
/// path with no owning registration is memory-only: always writable, never
/// flushed anywhere.
pub struct FilesystemServer {
    persistence: DashMap<String, PersistenceRegistration>,
    entries: DashMap<String, FileEntry>,
    /// Bumped on every write to a path; a pending flush task compares its
    /// captured generation against the current one before writing, so a
    /// newer write cancels an in-flight older flush instead of racing it.
    generations: DashMap<String, Arc<AtomicU64>>,
}

impl FilesystemServer {
    pub fn new() -> Self {
        Self {
            persistence: DashMap::new(),
            entries: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    /// A server with no persistence registered: pure in-memory, nothing
    /// survives restart until `register_persistence` is called.
    pub fn memory() -> Self {
        Self::new()
    }

    /// Registers a backend under `config.base_directory`, rejecting a
    /// duplicate registration of the same `base_directory`. Indexes whatever
    /// the backend already has so those paths show up in `list_files` and
    /// lazily load on first read, without fetching their content up front.
    pub async fn register_persistence(
        &self,
        config: PersistenceConfig,
        backend: Arc<dyn PersistenceBackend>,
    ) -> Result<(), AgentError> {
        if self.persistence.contains_key(&config.base_directory) {
            return Err(AgentError::Validation(format!(
                "base_directory '{}' is already registered",
                config.base_directory
            )));
        }

        let base_directory = config.base_directory.clone();
        for relative in backend.list("").await? {
            let virtual_path = to_virtual_path(&base_directory, &relative);
            self.entries
                .entry(virtual_path.clone())
                .or_insert_with(|| FileEntry::new(virtual_path));
        }

        self.persistence
            .insert(base_directory, PersistenceRegistration { config, backend });
        Ok(())
    }

    /// The registration owning `path`, chosen by longest matching
    /// `base_directory` prefix, along with the path relative to that backend.
    fn owning(&self, path: &str) -> Option<(PersistenceConfig, Arc<dyn PersistenceBackend>, String)> {
        let base_directory = self
            .persistence
            .iter()
            .map(|e| e.key().clone())
            .filter(|base| owns(base, path))
            .max_by_key(|base| base.len())?;
        let reg = self.persistence.get(&base_directory)?;
        let relative = to_relative_path(&base_directory, path);
        Some((reg.config.clone(), reg.backend.clone(), relative))
    }

    fn is_readonly(&self, path: &str) -> bool {
        self.owning(path).map(|(config, _, _)| config.readonly).unwrap_or(false)
    }

    /// Reads a path, loading it from its owning backend on first access.
    /// A path with no owning registration is memory-only.
    pub async fn read(&self, path: &str) -> Result<Option<String>, AgentError> {
        if let Some(entry) = self.entries.get(path) {
            if entry.is_loaded() {
                return Ok(entry.content.clone());
            }
        }
        let Some((_, backend, relative)) = self.owning(path) else {
            return Ok(None);
        };
        let loaded = backend.read(&relative).await?;
        let mut entry = FileEntry::new(path);
        entry.content = loaded.clone();
        entry.state = PersistenceState::Synced;
        self.entries.insert(path.to_string(), entry);
        Ok(loaded)
    }

    /// Writes a path's content in memory and schedules a debounced flush.
    /// Rejects the write outright when `path` falls under a read-only
    /// `base_directory`.
    pub async fn write(self: &Arc<Self>, path: &str, content: &str) -> Result<(), AgentError> {
        if self.is_readonly(path) {
            return Err(AgentError::ReadonlyViolation(path.to_string()));
        }
        let mut entry = self
            .entries
            .entry(path.to_string())
            .or_insert_with(|| FileEntry::new(path));
        entry.content = Some(content.to_string());
        entry.state = PersistenceState::Dirty;
        drop(entry);

        let generation = self
            .generations
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone();
        let my_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;

        let debounce_ms = self.owning(path).map(|(config, _, _)| config.debounce_ms).unwrap_or(0);
        if debounce_ms == 0 {
            return self.flush_one(path).await;
        }

        let server = Arc::clone(self);
        let path = path.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(debounce_ms)).await;
            if generation.load(Ordering::SeqCst) != my_generation {
                debug!(path = %path, "superseded write, skipping flush");
                return;
            }
            if let Err(err) = server.flush_one(&path).await {
                warn!(path = %path, error = %err, "debounced flush failed");
            }
        });
        Ok(())
    }

    /// Writes one path's current content to its owning backend immediately,
    /// regardless of any pending debounce timer. A no-op for a memory-only
    /// path (no owning registration) or a clean entry.
    pub async fn flush_one(&self, path: &str) -> Result<(), AgentError> {
        let content = match self.entries.get(path) {
            Some(entry) if entry.is_dirty() => entry.content.clone(),
            _ => return Ok(()),
        };
        let Some(content) = content else { return Ok(()) };
        let Some((_, backend, relative)) = self.owning(path) else {
            return Ok(());
        };
        backend.write(&relative, &content).await?;
        if let Some(mut entry) = self.entries.get_mut(path) {
            entry.state = PersistenceState::Synced;
        }
        Ok(())
    }

    /// Flushes every dirty path immediately. Used at shutdown so nothing pending
    /// behind a debounce timer is lost.
    pub async fn flush_all(&self) -> Result<(), AgentError> {
        let dirty: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.is_dirty())
            .map(|e| e.key().clone())
            .collect();
        for path in dirty {
            self.flush_one(&path).await?;
        }
        Ok(())
    }

    pub async fn remove(self: &Arc<Self>, path: &str) -> Result<(), AgentError> {
        if self.is_readonly(path) {
            return Err(AgentError::ReadonlyViolation(path.to_string()));
        }
        self.entries.remove(path);
        if let Some((_, backend, relative)) = self.owning(path) {
            backend.remove(&relative).await?;
        }
        Ok(())
    }

    /// Enumerates virtual paths under `prefix`, merging every registered
    /// backend's listing with whatever's only in memory.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, AgentError> {
        let mut seen: HashMap<String, ()> = HashMap::new();

        let registrations: Vec<(String, Arc<dyn PersistenceBackend>)> = self
            .persistence
            .iter()
            .map(|e| (e.key().clone(), e.value().backend.clone()))
            .collect();
        for (base_directory, backend) in registrations {
            // Only query a backend whose namespace could overlap `prefix`:
            // either the prefix is above it (`/` or `/use`), inside it, or equal.
            let own_root = format!("/{base_directory}");
            if !prefix.is_empty() && !own_root.starts_with(prefix) && !owns(&base_directory, prefix) {
                continue;
            }
            let backend_prefix = if owns(&base_directory, prefix) {
                to_relative_path(&base_directory, prefix)
            } else {
                String::new()
            };
            for relative in backend.list(&backend_prefix).await? {
                seen.insert(to_virtual_path(&base_directory, &relative), ());
            }
        }

        for entry in self.entries.iter() {
            if entry.key().starts_with(prefix) {
                seen.insert(entry.key().clone(), ());
            }
        }
        let mut out: Vec<String> = seen.into_keys().collect();
        out.sort();
        Ok(out)
    }
}

impl Default for FilesystemServer {
    fn default() -> Self {
        Self::new()
    }
}

/// True when `path` falls under `base_directory`'s virtual namespace
/// (`/{base_directory}` itself or anything under `/{base_directory}/`).
fn owns(base_directory: &str, path: &str) -> bool {
    path == format!("/{base_directory}") || path.starts_with(&format!("/{base_directory}/"))
}

/// Strips the `/{base_directory}` prefix a backend never sees.
fn to_relative_path(base_directory: &str, virtual_path: &str) -> String {
    let stripped = virtual_path
        .strip_prefix(&format!("/{base_directory}"))
        .unwrap_or(virtual_path);
    stripped.trim_start_matches('/').to_string()
}

/// Reconstructs a virtual path from a backend-relative one.
fn to_virtual_path(base_directory: &str, relative: &str) -> String {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        format!("/{base_directory}")
    } else {
        format!("/{base_directory}/{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::backend::MemoryBackend;

    fn memory_config(base_directory: &str, debounce_ms: u64) -> PersistenceConfig {
        PersistenceConfig {
            base_directory: base_directory.to_string(),
            debounce_ms,
            readonly: false,
        }
    }

    #[tokio::test]
    async fn write_then_read_sees_uncommitted_content_before_debounce_fires() {
        let server = Arc::new(FilesystemServer::memory());
        server
            .register_persistence(memory_config("data", 10_000), Arc::new(MemoryBackend::new()))
            .await
            .unwrap();
        server.write("/data/a.txt", "hello").await.unwrap();
        assert_eq!(server.read("/data/a.txt").await.unwrap(), Some("hello".into()));
    }

    #[tokio::test]
    async fn readonly_base_directory_rejects_write() {
        let server = Arc::new(FilesystemServer::memory());
        let mut config = memory_config("locked", 0);
        config.readonly = true;
        server.register_persistence(config, Arc::new(MemoryBackend::new())).await.unwrap();
        let err = server.write("/locked/a.txt", "x").await.unwrap_err();
        assert!(matches!(err, AgentError::ReadonlyViolation(_)));
    }

    #[tokio::test]
    async fn memory_only_path_with_no_registration_is_always_writable() {
        let server = Arc::new(FilesystemServer::memory());
        server.write("/scratch/a.txt", "x").await.unwrap();
        assert_eq!(server.read("/scratch/a.txt").await.unwrap(), Some("x".into()));
    }

    #[tokio::test]
    async fn registering_a_duplicate_base_directory_is_rejected() {
        let server = Arc::new(FilesystemServer::memory());
        server
            .register_persistence(memory_config("data", 0), Arc::new(MemoryBackend::new()))
            .await
            .unwrap();
        let err = server
            .register_persistence(memory_config("data", 0), Arc::new(MemoryBackend::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Validation(_)));
    }

    #[tokio::test]
    async fn write_strips_base_directory_before_reaching_the_backend() {
        let server = Arc::new(FilesystemServer::memory());
        let backend = Arc::new(MemoryBackend::new());
        server
            .register_persistence(memory_config("user_files", 0), backend.clone())
            .await
            .unwrap();
        server.write("/user_files/notes.txt", "hi").await.unwrap();
        assert_eq!(backend.read("notes.txt").await.unwrap(), Some("hi".into()));
    }

    #[tokio::test]
    async fn flush_all_persists_dirty_entries_immediately() {
        let server = Arc::new(FilesystemServer::memory());
        let backend = Arc::new(MemoryBackend::new());
        server
            .register_persistence(memory_config("data", 60_000), backend.clone())
            .await
            .unwrap();
        server.write("/data/a.txt", "hello").await.unwrap();
        server.flush_all().await.unwrap();
        assert_eq!(backend.read("a.txt").await.unwrap(), Some("hello".into()));
    }

    #[tokio::test]
    async fn debounced_write_eventually_flushes_to_backend() {
        let server = Arc::new(FilesystemServer::memory());
        let backend = Arc::new(MemoryBackend::new());
        server
            .register_persistence(memory_config("data", 20), backend.clone())
            .await
            .unwrap();
        server.write("/data/a.txt", "v1").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(80)).await;
        assert_eq!(backend.read("a.txt").await.unwrap(), Some("v1".into()));
    }

    #[tokio::test]
    async fn superseding_write_cancels_earlier_pending_flush_value() {
        let server = Arc::new(FilesystemServer::memory());
        let backend = Arc::new(MemoryBackend::new());
        server
            .register_persistence(memory_config("data", 30), backend.clone())
            .await
            .unwrap();
        server.write("/data/a.txt", "v1").await.unwrap();
        server.write("/data/a.txt", "v2").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(90)).await;
        assert_eq!(backend.read("a.txt").await.unwrap(), Some("v2".into()));
    }

    #[tokio::test]
    async fn list_merges_backend_and_in_memory_paths() {
        let server = Arc::new(FilesystemServer::memory());
        server
            .register_persistence(memory_config("docs", 0), Arc::new(MemoryBackend::new()))
            .await
            .unwrap();
        server.write("/docs/a.txt", "a").await.unwrap();
        let found = server.list("/docs").await.unwrap();
        assert_eq!(found, vec!["/docs/a.txt".to_string()]);
    }

    #[tokio::test]
    async fn registering_persistence_lazily_indexes_existing_backend_files() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write("existing.txt", "lazy").await.unwrap();
        let server = Arc::new(FilesystemServer::memory());
        server
            .register_persistence(memory_config("data", 0), backend.clone())
            .await
            .unwrap();

        let listed = server.list("/data").await.unwrap();
        assert_eq!(listed, vec!["/data/existing.txt".to_string()]);

        assert_eq!(
            server.read("/data/existing.txt").await.unwrap(),
            Some("lazy".into())
        );
    }
}
