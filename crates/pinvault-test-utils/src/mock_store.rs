// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock key-value store for deterministic testing.
//!
//! `MockStore` implements `KeyValueStore` over an in-memory map, records
//! every `set` call, and can be told to fail reads or writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use pinvault_core::{
    AdapterType, HealthStatus, KeyValueStore, PinvaultError, PluginAdapter, StoreEntries,
};

/// An in-memory store with write recording and failure injection.
pub struct MockStore {
    role: AdapterType,
    entries: Mutex<HashMap<String, Value>>,
    writes: Mutex<Vec<StoreEntries>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    sparse: bool,
}

impl MockStore {
    /// Create an empty store reporting the given role.
    pub fn new(role: AdapterType) -> Self {
        Self {
            role,
            entries: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            sparse: false,
        }
    }

    /// An empty durable store.
    pub fn durable() -> Self {
        Self::new(AdapterType::DurableStore)
    }

    /// An empty ephemeral store.
    pub fn ephemeral() -> Self {
        Self::new(AdapterType::EphemeralStore)
    }

    /// Omit unset keys from `get` results instead of returning `null`,
    /// like a store that lost part of a record.
    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    /// Write a raw value directly, bypassing recording. Used to plant
    /// corrupt data.
    pub async fn seed(&self, key: &str, value: Value) {
        self.entries.lock().await.insert(key.to_string(), value);
    }

    /// Remove a key directly, bypassing recording.
    pub async fn forget(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current value for `key`, if set.
    pub async fn value(&self, key: &str) -> Option<Value> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Every key currently set.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// All successful `set` calls, oldest first.
    pub async fn writes(&self) -> Vec<StoreEntries> {
        self.writes.lock().await.clone()
    }

    /// Number of successful `set` calls.
    pub async fn write_count(&self) -> usize {
        self.writes.lock().await.len()
    }

    /// Forget recorded writes.
    pub async fn clear_writes(&self) {
        self.writes.lock().await.clear();
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        self.role
    }

    async fn health_check(&self) -> Result<HealthStatus, PinvaultError> {
        if self.fail_reads.load(Ordering::SeqCst) || self.fail_writes.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("failure injection enabled".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreEntries, PinvaultError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PinvaultError::storage("mock read failure"));
        }
        let entries = self.entries.lock().await;
        let mut out = StoreEntries::new();
        for key in keys {
            match entries.get(*key) {
                Some(value) => {
                    out.insert(key.to_string(), value.clone());
                }
                None if !self.sparse => {
                    out.insert(key.to_string(), Value::Null);
                }
                None => {}
            }
        }
        Ok(out)
    }

    async fn set(&self, entries: StoreEntries) -> Result<(), PinvaultError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PinvaultError::storage("mock write failure"));
        }
        let mut map = self.entries.lock().await;
        for (key, value) in &entries {
            if value.is_null() {
                map.remove(key);
            } else {
                map.insert(key.clone(), value.clone());
            }
        }
        self.writes.lock().await.push(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entries(value: Value) -> StoreEntries {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = MockStore::durable();
        store.set(entries(json!({ "a": 1, "b": null }))).await.unwrap();

        let got = store.get(&["a", "b"]).await.unwrap();
        assert_eq!(got.get("a"), Some(&json!(1)));
        assert_eq!(got.get("b"), Some(&Value::Null));
        assert_eq!(store.write_count().await, 1);
    }

    #[tokio::test]
    async fn null_removes_key() {
        let store = MockStore::ephemeral();
        store.seed("a", json!("x")).await;
        store.set(entries(json!({ "a": null }))).await.unwrap();
        assert!(store.value("a").await.is_none());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn sparse_store_omits_missing_keys() {
        let store = MockStore::durable().sparse();
        let got = store.get(&["missing"]).await.unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MockStore::durable();
        store.fail_writes(true);
        assert!(store.set(StoreEntries::new()).await.is_err());
        assert_eq!(store.write_count().await, 0);
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));

        store.fail_writes(false);
        store.fail_reads(true);
        assert!(store.get(&["a"]).await.is_err());
    }
}
