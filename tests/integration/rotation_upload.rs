//! Rotation → upload → local cleanup

use std::sync::Arc;
use std::time::Duration;

use logman::store::memory::MemoryStore;
use logman::uploader::UploadDispatcher;
use pretty_assertions::assert_eq;

use crate::helpers::spawn_test_coordinator;

fn dispatcher(store: Arc<MemoryStore>) -> UploadDispatcher {
    UploadDispatcher::new(store, "logs".to_string(), "fleet".to_string())
}

#[tokio::test]
async fn successful_upload_stores_bytes_and_deletes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syncme12345.txt");
    std::fs::write(&path, "rotated content").unwrap();

    let store = Arc::new(MemoryStore::new());
    let key = dispatcher(store.clone()).upload(&path).await.unwrap();

    assert!(key.starts_with("fleet/"));
    assert!(key.ends_with(".txt"));
    assert_eq!(store.object("logs", &key), Some(b"rotated content".to_vec()));
    assert!(!path.exists());
}

#[tokio::test]
async fn failed_upload_leaves_the_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syncme12345.txt");
    std::fs::write(&path, "rotated content").unwrap();

    let store = Arc::new(MemoryStore::failing());
    let result = dispatcher(store.clone()).upload(&path).await;

    assert!(result.is_err());
    assert!(store.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "rotated content");
}

#[tokio::test]
async fn upload_of_a_missing_file_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never-existed.txt");

    let store = Arc::new(MemoryStore::new());
    let result = dispatcher(store.clone()).upload(&path).await;

    assert!(result.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn rotated_file_is_uploaded_and_cleaned_up_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("temp.txt");
    std::fs::write(&active, "x".repeat(1001)).unwrap();

    let store = Arc::new(MemoryStore::new());
    let coordinator = spawn_test_coordinator(dir.path(), store.clone());

    coordinator.forward("fresh".to_string());
    tokio::time::sleep(Duration::from_millis(20)).await;
    coordinator.flush_now().await;

    // the upload runs as its own task; give it a moment
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.len(), 1);
    let key = store.keys().pop().unwrap();
    let uploaded = store
        .object("logs", key.strip_prefix("logs/").unwrap())
        .unwrap();
    assert_eq!(uploaded.len(), 1001);

    // no rotated file left behind, the active file was recreated
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with("syncme")
        })
        .collect();
    assert!(leftovers.is_empty());
    assert_eq!(std::fs::read_to_string(&active).unwrap(), "\nfresh");

    coordinator.shutdown().await;
}

#[tokio::test]
async fn concurrent_uploads_produce_distinct_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());

    let mut tasks = Vec::new();
    for i in 0..8 {
        let path = dir.path().join(format!("syncme{}.txt", 10_000 + i));
        std::fs::write(&path, format!("file {i}")).unwrap();

        let uploads = dispatcher(store.clone());
        tasks.push(tokio::spawn(async move { uploads.upload(&path).await }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(store.len(), 8);
}
