// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the store adapters.

use pinvault_config::model::StorageConfig;
use pinvault_core::{KeyValueStore, StoreEntries};
use pinvault_storage::{SessionFileStore, SqliteStore};
use serde_json::{json, Value};
use tempfile::tempdir;

fn one(key: &str, value: Value) -> StoreEntries {
    let mut entries = StoreEntries::new();
    entries.insert(key.to_string(), value);
    entries
}

#[tokio::test]
async fn sqlite_values_survive_reopen() {
    let dir = tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("durable.db").display().to_string(),
        ..Default::default()
    };

    let store = SqliteStore::open(&config).await.unwrap();
    store.set(one("vault.v1.digest", json!("abc"))).await.unwrap();
    drop(store);

    let reopened = SqliteStore::open(&config).await.unwrap();
    let got = reopened.get(&["vault.v1.digest"]).await.unwrap();
    assert_eq!(got["vault.v1.digest"], json!("abc"));
}

#[tokio::test]
async fn session_file_round_trip_and_removal() {
    let dir = tempdir().unwrap();
    let store = SessionFileStore::at(dir.path().join("pinvault").join("session.json"));

    let got = store.get(&["session.v1.pin"]).await.unwrap();
    assert_eq!(got["session.v1.pin"], Value::Null);

    store.set(one("session.v1.pin", json!("1234"))).await.unwrap();
    assert!(store.path().exists());

    let got = store.get(&["session.v1.pin"]).await.unwrap();
    assert_eq!(got["session.v1.pin"], json!("1234"));

    // Clearing the last key removes the file entirely.
    store.set(one("session.v1.pin", Value::Null)).await.unwrap();
    assert!(!store.path().exists());
}

#[cfg(unix)]
#[tokio::test]
async fn session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let store = SessionFileStore::at(dir.path().join("pinvault").join("session.json"));
    store.set(one("session.v1.pin", json!("9999"))).await.unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn corrupt_session_file_reads_as_missing_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"[1, 2, 3]").unwrap();

    let store = SessionFileStore::at(&path);
    let got = store.get(&["session.v1.pin"]).await.unwrap();
    assert!(got.is_empty());

    // A write replaces the corrupt content with a valid object.
    store.set(one("session.v1.pin", Value::Null)).await.unwrap();
    store.set(one("other", json!(1))).await.unwrap();
    let got = store.get(&["other"]).await.unwrap();
    assert_eq!(got["other"], json!(1));
}
