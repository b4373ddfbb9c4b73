//! Persistence backends for `FilesystemServer`.

mod disk;
mod memory;

pub use disk::DiskBackend;
pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::error::AgentError;

/// Storage contract a `FilesystemServer` flushes dirty entries through.
///
/// This is a reference-quality contract, not a production-grade storage
/// layer: `MemoryBackend` and `DiskBackend` are the two implementations this
/// crate ships; a real deployment backed by object storage or a database is
/// out of scope and would implement the same trait.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    async fn read(&self, path: &str) -> Result<Option<String>, AgentError>;
    async fn write(&self, path: &str, content: &str) -> Result<(), AgentError>;
    async fn remove(&self, path: &str) -> Result<(), AgentError>;
    async fn list(&self, prefix: &str) -> Result<Vec<String>, AgentError>;
}
