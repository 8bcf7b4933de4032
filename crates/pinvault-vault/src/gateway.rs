// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema-validated access to the durable and ephemeral stores.
//!
//! Loads are forgiving: a record with missing keys, wrong types, or values
//! that fail [`Schema::validate`] is overwritten with the schema defaults and
//! those defaults are returned. Saves are strict: an invalid record is
//! rejected before anything is written.

use std::sync::Arc;

use pinvault_core::{KeyValueStore, PluginAdapter, StoreEntries};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::VaultError;
use crate::schema::{Schema, StoreTier};

/// Typed front of the two key-value stores.
#[derive(Clone)]
pub struct StorageGateway {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageGateway")
            .field("durable", &self.durable.name())
            .field("ephemeral", &self.ephemeral.name())
            .finish()
    }
}

impl StorageGateway {
    pub fn new(durable: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, ephemeral }
    }

    pub fn durable(&self) -> &Arc<dyn KeyValueStore> {
        &self.durable
    }

    pub fn ephemeral(&self) -> &Arc<dyn KeyValueStore> {
        &self.ephemeral
    }

    fn store_for<S: Schema>(&self) -> &dyn KeyValueStore {
        match S::TIER {
            StoreTier::Durable => self.durable.as_ref(),
            StoreTier::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Reads and validates a record, healing the store on any schema
    /// violation.
    ///
    /// Only a failing store read is an error. If writing the healed defaults
    /// fails, the defaults are still returned and the next load heals again.
    pub async fn load<S: Schema>(&self) -> Result<S, VaultError> {
        let store = self.store_for::<S>();
        let raw = store.get(S::KEYS).await.map_err(VaultError::Storage)?;

        match decode::<S>(raw) {
            Ok(record) => Ok(record),
            Err(reason) => {
                warn!(
                    schema = S::NAME,
                    store = store.name(),
                    "stored record is invalid, resetting to defaults"
                );
                if cfg!(debug_assertions) {
                    debug!(schema = S::NAME, reason = %reason, "schema violation");
                }

                let healed = S::default();
                match encode(&healed) {
                    Ok(entries) => {
                        if let Err(e) = store.set(entries).await {
                            warn!(schema = S::NAME, error = %e, "failed to write healed defaults");
                        }
                    }
                    Err(e) => warn!(schema = S::NAME, error = %e, "failed to encode defaults"),
                }
                Ok(healed)
            }
        }
    }

    /// Validates and writes a record, returning it as persisted.
    pub async fn save<S: Schema>(&self, record: S) -> Result<S, VaultError> {
        record.validate().map_err(VaultError::Validation)?;
        let entries = encode(&record)?;
        self.store_for::<S>()
            .set(entries)
            .await
            .map_err(VaultError::Storage)?;
        Ok(record)
    }
}

fn decode<S: Schema>(mut raw: StoreEntries) -> Result<S, String> {
    if let Some(missing) = S::KEYS.iter().find(|key| !raw.contains_key(**key)) {
        return Err(format!("missing key `{missing}`"));
    }
    raw.retain(|key, _| S::KEYS.iter().any(|k| *k == key.as_str()));

    let record: S = serde_json::from_value(Value::Object(raw)).map_err(|e| e.to_string())?;
    record.validate()?;
    Ok(record)
}

fn encode<S: Schema>(record: &S) -> Result<StoreEntries, VaultError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(VaultError::Validation(format!(
            "{} did not serialize to an object",
            S::NAME
        ))),
        Err(e) => Err(VaultError::Validation(format!("{}: {e}", S::NAME))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{DurableRecord, SessionRecord};

    fn object(value: Value) -> StoreEntries {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn decode_requires_every_key() {
        let raw = object(json!({ "vault.v1.ciphertext": null, "vault.v1.digest": null }));
        let err = decode::<DurableRecord>(raw).unwrap_err();
        assert!(err.contains("vault.v1.connected"));
    }

    #[test]
    fn decode_ignores_foreign_keys() {
        let raw = object(json!({ "session.v1.pin": "1234", "other": 1 }));
        let record = decode::<SessionRecord>(raw).unwrap();
        assert_eq!(record.pin.as_deref(), Some("1234"));
    }

    #[test]
    fn decode_rejects_invalid_values() {
        let raw = object(json!({ "session.v1.pin": "" }));
        assert!(decode::<SessionRecord>(raw).is_err());
    }

    #[test]
    fn encode_writes_nulls_for_absent_fields() {
        let entries = encode(&SessionRecord::default()).unwrap();
        assert_eq!(entries.get("session.v1.pin"), Some(&Value::Null));
    }
}
