// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the durable [`KeyValueStore`].

use async_trait::async_trait;
use pinvault_config::model::StorageConfig;
use pinvault_core::{
    AdapterType, HealthStatus, KeyValueStore, PinvaultError, PluginAdapter, StoreEntries,
};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::{debug, warn};

use crate::database::{map_tr_err, Database};

/// Durable store backed by the `kv_store` table.
///
/// Values are stored as JSON text; writing `null` deletes the row, so an
/// absent key and a `null` key read back identically.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database named by `config` and wrap it.
    pub async fn open(config: &StorageConfig) -> Result<Self, PinvaultError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self { db })
    }

    /// Wrap an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::DurableStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PinvaultError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreEntries, PinvaultError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let rows = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<(String, Option<String>)>, rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
                let mut rows = Vec::with_capacity(keys.len());
                for key in keys {
                    let value: Option<String> = stmt
                        .query_row(params![key], |row| row.get(0))
                        .optional()?;
                    rows.push((key, value));
                }
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)?;

        let mut entries = StoreEntries::new();
        for (key, raw) in rows {
            let value = match raw {
                None => Value::Null,
                // Unparseable text is handed back verbatim so schema
                // validation upstream sees it as a wrong-typed value.
                Some(text) => serde_json::from_str(&text).unwrap_or_else(|_| {
                    warn!(key = %key, "durable value is not valid JSON");
                    Value::String(text)
                }),
            };
            entries.insert(key, value);
        }
        Ok(entries)
    }

    async fn set(&self, entries: StoreEntries) -> Result<(), PinvaultError> {
        let count = entries.len();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                for (key, value) in entries {
                    if value.is_null() {
                        tx.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
                    } else {
                        tx.execute(
                            "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
                             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                            params![key, value.to_string()],
                        )?;
                    }
                }
                tx.commit()
            })
            .await
            .map_err(map_tr_err)?;

        debug!(count, "durable entries written");
        Ok(())
    }
}
