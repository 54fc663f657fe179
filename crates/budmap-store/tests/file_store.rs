//! Integration tests for `FileStore` persistence across reopen and shared paths.

use std::sync::Arc;

use budmap_store::{checkin_key, FileStore, KeyValueStore};

#[tokio::test]
async fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkins.json");

    let store = FileStore::open(&path).await.unwrap();
    store
        .put(&checkin_key("1", "userA"), "2025-02-15T10:00:00.000Z")
        .await
        .unwrap();
    drop(store);

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("checkin_1_userA").await.unwrap().as_deref(),
        Some("2025-02-15T10:00:00.000Z")
    );
}

#[tokio::test]
async fn only_last_write_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkins.json");

    let store = FileStore::open(&path).await.unwrap();
    let key = checkin_key("1", "userA");
    store.put(&key, "2025-02-15T10:00:00.000Z").await.unwrap();
    store.put(&key, "2025-02-15T11:30:00.000Z").await.unwrap();
    drop(store);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("10:00:00"), "overwritten value left in file: {raw}");

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get(&key).await.unwrap().as_deref(),
        Some("2025-02-15T11:30:00.000Z")
    );
}

#[tokio::test]
async fn concurrent_puts_to_distinct_keys_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkins.json");
    let store = Arc::new(FileStore::open(&path).await.unwrap());

    let writes = (0..16).map(|i| {
        let store = Arc::clone(&store);
        async move {
            store
                .put(&checkin_key("1", &format!("user{i}")), &format!("ts-{i}"))
                .await
        }
    });
    for result in futures::future::join_all(writes).await {
        result.unwrap();
    }

    let reopened = FileStore::open(&path).await.unwrap();
    for i in 0..16 {
        assert_eq!(
            reopened
                .get(&checkin_key("1", &format!("user{i}")))
                .await
                .unwrap(),
            Some(format!("ts-{i}"))
        );
    }
}

#[tokio::test]
async fn handles_sharing_a_path_see_each_others_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkins.json");
    let server = FileStore::open(&path).await.unwrap();
    let cli = FileStore::open(&path).await.unwrap();

    cli.put(&checkin_key("1", "userA"), "2025-02-15T10:00:00.000Z")
        .await
        .unwrap();
    assert_eq!(
        server.get("checkin_1_userA").await.unwrap().as_deref(),
        Some("2025-02-15T10:00:00.000Z")
    );

    server
        .put(&checkin_key("2", "userB"), "2025-02-15T10:05:00.000Z")
        .await
        .unwrap();

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("checkin_1_userA").await.unwrap().as_deref(),
        Some("2025-02-15T10:00:00.000Z"),
        "write from the other handle was erased"
    );
    assert_eq!(
        reopened.get("checkin_2_userB").await.unwrap().as_deref(),
        Some("2025-02-15T10:05:00.000Z")
    );
}

#[tokio::test]
async fn concurrent_puts_through_separate_handles_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkins.json");
    let first = Arc::new(FileStore::open(&path).await.unwrap());
    let second = Arc::new(FileStore::open(&path).await.unwrap());

    let writes = (0..16).map(|i| {
        let store = if i % 2 == 0 {
            Arc::clone(&first)
        } else {
            Arc::clone(&second)
        };
        async move {
            store
                .put(&checkin_key("3", &format!("user{i}")), &format!("ts-{i}"))
                .await
        }
    });
    for result in futures::future::join_all(writes).await {
        result.unwrap();
    }

    for i in 0..16 {
        assert_eq!(
            first.get(&checkin_key("3", &format!("user{i}"))).await.unwrap(),
            Some(format!("ts-{i}"))
        );
    }
}
