// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-scoped in-memory [`KeyValueStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use pinvault_core::{
    AdapterType, HealthStatus, KeyValueStore, PinvaultError, PluginAdapter, StoreEntries,
};
use serde_json::Value;
use tokio::sync::RwLock;

/// A store whose contents live exactly as long as the value does.
///
/// Used as the ephemeral tier when no runtime directory is available, and
/// as either tier in tests.
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    role: AdapterType,
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// An empty ephemeral store.
    pub fn ephemeral() -> Self {
        Self::with_role("memory", AdapterType::EphemeralStore)
    }

    /// An empty store reporting the given role.
    pub fn with_role(name: impl Into<String>, role: AdapterType) -> Self {
        Self {
            name: name.into(),
            role,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        self.role
    }

    async fn health_check(&self) -> Result<HealthStatus, PinvaultError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreEntries, PinvaultError> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .map(|k| (k.to_string(), entries.get(*k).cloned().unwrap_or(Value::Null)))
            .collect())
    }

    async fn set(&self, updates: StoreEntries) -> Result<(), PinvaultError> {
        let mut entries = self.entries.write().await;
        for (key, value) in updates {
            if value.is_null() {
                entries.remove(&key);
            } else {
                entries.insert(key, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn null_removes_and_missing_reads_null() {
        let store = MemoryStore::ephemeral();
        let mut update = StoreEntries::new();
        update.insert("pin".into(), json!("1234"));
        store.set(update).await.unwrap();
        assert_eq!(store.len().await, 1);

        let mut clear = StoreEntries::new();
        clear.insert("pin".into(), Value::Null);
        store.set(clear).await.unwrap();
        assert!(store.is_empty().await);

        let got = store.get(&["pin"]).await.unwrap();
        assert_eq!(got["pin"], Value::Null);
    }
}
