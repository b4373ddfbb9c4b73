//! Integration tests: debounced writes coalescing to one flush, and a
//! pre-seeded backend's files being indexed without eagerly loading content.

mod init_logging;

use std::sync::Arc;
use std::time::Duration;

use agent_runtime::fs::{FilesystemServer, MemoryBackend, PersistenceConfig};

fn config(base_directory: &str, debounce_ms: u64) -> PersistenceConfig {
    let mut config = PersistenceConfig::new(base_directory);
    config.debounce_ms = debounce_ms;
    config
}

#[tokio::test]
async fn two_writes_within_the_debounce_window_flush_once_with_the_latest_content() {
    let server = Arc::new(FilesystemServer::memory());
    let backend = Arc::new(MemoryBackend::new());
    server
        .register_persistence(config("data", 100), backend.clone())
        .await
        .unwrap();

    server.write("/data/a.txt", "one").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    server.write("/data/a.txt", "two").await.unwrap();

    // the first write's flush timer fires around t=150ms from its own
    // schedule but is superseded; only the second write's timer, firing
    // around t=150ms from t=50, should ever reach the backend.
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(backend.read("a.txt").await.unwrap(), Some("two".to_string()));
    let listed = backend.list("").await.unwrap();
    assert_eq!(listed, vec!["a.txt".to_string()]);
}

#[tokio::test]
async fn a_file_pre_seeded_in_the_backend_is_indexed_but_not_loaded_until_first_read() {
    let backend = Arc::new(MemoryBackend::new());
    backend.write("existing.txt", "lazy").await.unwrap();

    let server = Arc::new(FilesystemServer::memory());
    server
        .register_persistence(config("data", 500), backend.clone())
        .await
        .unwrap();

    let listed = server.list("/data").await.unwrap();
    assert_eq!(listed, vec!["/data/existing.txt".to_string()]);

    let content = server.read("/data/existing.txt").await.unwrap();
    assert_eq!(content, Some("lazy".to_string()));

    // a second read is served from the now-populated in-memory entry, not
    // a second backend round trip; MemoryBackend has no call counter to
    // assert against directly, so this only re-checks the value is stable.
    let content_again = server.read("/data/existing.txt").await.unwrap();
    assert_eq!(content_again, Some("lazy".to_string()));
}

#[tokio::test]
async fn registering_the_same_base_directory_twice_is_rejected() {
    let server = Arc::new(FilesystemServer::memory());
    server
        .register_persistence(config("data", 500), Arc::new(MemoryBackend::new()))
        .await
        .unwrap();

    let err = server
        .register_persistence(config("data", 500), Arc::new(MemoryBackend::new()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("data"));
}
