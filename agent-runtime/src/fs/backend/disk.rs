//! Disk-backed persistence: one file per path under a base directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::AgentError;

use super::PersistenceBackend;

pub struct DiskBackend {
    base_directory: PathBuf,
}

impl DiskBackend {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_directory.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl PersistenceBackend for DiskBackend {
    async fn read(&self, path: &str) -> Result<Option<String>, AgentError> {
        match tokio::fs::read_to_string(self.resolve(path)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AgentError::NotFound(format!("{path}: {e}"))),
        }
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), AgentError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AgentError::Validation(format!("creating {path}'s parent: {e}")))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| AgentError::Validation(format!("writing {path}: {e}")))
    }

    async fn remove(&self, path: &str) -> Result<(), AgentError> {
        match tokio::fs::remove_file(self.resolve(path)).await {
            Ok(()) | Err(_) if !self.resolve(path).exists() => Ok(()),
            Err(e) => Err(AgentError::Validation(format!("removing {path}: {e}"))),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AgentError> {
        let root = self.resolve(prefix);
        let mut out = Vec::new();
        collect_files(&root, &self.base_directory, &mut out)
            .await
            .map_err(|e| AgentError::Validation(format!("listing {prefix}: {e}")))?;
        Ok(out)
    }
}

fn collect_files<'a>(
    dir: &'a Path,
    base: &'a Path,
    out: &'a mut Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + 'a>> {
    Box::pin(async move {
        if !dir.exists() {
            return Ok(());
        }
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() {
                collect_files(&path, base, out).await?;
            } else if let Ok(relative) = path.strip_prefix(base) {
                out.push(format!("/{}", relative.display()));
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parent_dirs_and_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        backend.write("/a/b/c.txt", "hi").await.unwrap();
        assert_eq!(backend.read("/a/b/c.txt").await.unwrap(), Some("hi".into()));
    }

    #[tokio::test]
    async fn read_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        assert_eq!(backend.read("/nope.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_finds_nested_files_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DiskBackend::new(dir.path());
        backend.write("/docs/a.txt", "a").await.unwrap();
        backend.write("/docs/nested/b.txt", "b").await.unwrap();
        backend.write("/src/main.rs", "fn main(){}").await.unwrap();
        let mut found = backend.list("/docs").await.unwrap();
        found.sort();
        assert_eq!(
            found,
            vec!["/docs/a.txt".to_string(), "/docs/nested/b.txt".to_string()]
        );
    }
}
