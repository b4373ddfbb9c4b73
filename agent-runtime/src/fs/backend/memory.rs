//! In-memory persistence backend: a scope's files live only as long as the process.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;

use super::PersistenceBackend;

#[derive(Default)]
pub struct MemoryBackend {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn read(&self, path: &str) -> Result<Option<String>, AgentError> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), AgentError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AgentError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AgentError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let backend = MemoryBackend::new();
        backend.write("/a.txt", "hello").await.unwrap();
        assert_eq!(backend.read("/a.txt").await.unwrap(), Some("hello".into()));
        assert_eq!(backend.read("/missing.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let backend = MemoryBackend::new();
        backend.write("/docs/a.txt", "a").await.unwrap();
        backend.write("/docs/b.txt", "b").await.unwrap();
        backend.write("/src/main.rs", "fn main(){}").await.unwrap();
        let mut docs = backend.list("/docs").await.unwrap();
        docs.sort();
        assert_eq!(docs, vec!["/docs/a.txt".to_string(), "/docs/b.txt".to_string()]);
    }
}
