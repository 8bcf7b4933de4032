// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage gateway healing and strict-save behavior.

use std::sync::Arc;

use pinvault_core::ConnectionStatus;
use pinvault_test_utils::MockStore;
use pinvault_vault::schema::{
    CIPHERTEXT_KEY, CONNECTED_KEY, DIGEST_KEY, KDF_ITERATIONS_KEY, SESSION_PIN_KEY,
};
use pinvault_vault::{
    crypto, integrity, DurableRecord, Mode, SealedSecret, SessionRecord, StorageGateway, Vault,
    VaultError, VaultSettings,
};
use serde_json::{json, Value};

fn stores() -> (Arc<MockStore>, Arc<MockStore>, StorageGateway) {
    let durable = Arc::new(MockStore::durable());
    let ephemeral = Arc::new(MockStore::ephemeral());
    let gateway = StorageGateway::new(durable.clone(), ephemeral.clone());
    (durable, ephemeral, gateway)
}

fn sealed(secret: &str) -> SealedSecret {
    SealedSecret {
        ciphertext: crypto::encrypt_secret(secret, "1234", 1_000).unwrap(),
        digest: integrity::digest(secret),
        kdf_iterations: 1_000,
    }
}

#[tokio::test]
async fn empty_store_loads_defaults_without_writing() {
    let (durable, _, gateway) = stores();
    let record: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(record, DurableRecord::default());
    assert_eq!(durable.write_count().await, 0);
}

#[tokio::test]
async fn valid_record_round_trips() {
    let (durable, _, gateway) = stores();
    let record = DurableRecord::new(&sealed("sk"), ConnectionStatus::Rejected);
    let saved = gateway.save(record.clone()).await.unwrap();
    assert_eq!(saved, record);
    assert_eq!(durable.value(CONNECTED_KEY).await, Some(json!(false)));

    let loaded: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn wrong_type_heals_to_defaults_once() {
    let (durable, _, gateway) = stores();
    durable.seed(CIPHERTEXT_KEY, json!(12345)).await;
    durable.seed(DIGEST_KEY, json!(["not", "a", "digest"])).await;
    durable.seed(CONNECTED_KEY, json!("maybe")).await;

    let first: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(first, DurableRecord::default());
    assert_eq!(durable.write_count().await, 1);
    assert!(durable.keys().await.is_empty());

    let second: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(second, first);
    assert_eq!(durable.write_count().await, 1);
}

#[tokio::test]
async fn half_present_record_heals() {
    let (durable, _, gateway) = stores();
    let good = sealed("sk");
    durable.seed(CIPHERTEXT_KEY, Value::String(good.ciphertext)).await;

    let record: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(record, DurableRecord::default());
    assert!(durable.value(CIPHERTEXT_KEY).await.is_none());
}

#[tokio::test]
async fn missing_keys_heal() {
    let durable = Arc::new(MockStore::durable().sparse());
    let ephemeral = Arc::new(MockStore::ephemeral());
    let gateway = StorageGateway::new(durable.clone(), ephemeral);

    let record: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(record, DurableRecord::default());
    assert_eq!(durable.write_count().await, 1);
}

#[tokio::test]
async fn corrupt_session_pin_heals() {
    let (_, ephemeral, gateway) = stores();
    ephemeral.seed(SESSION_PIN_KEY, json!("")).await;

    let record: SessionRecord = gateway.load().await.unwrap();
    assert!(record.pin.is_none());
    assert!(ephemeral.value(SESSION_PIN_KEY).await.is_none());
}

#[tokio::test]
async fn healing_survives_write_failure() {
    let (durable, _, gateway) = stores();
    durable.seed(CONNECTED_KEY, json!(7)).await;
    durable.fail_writes(true);

    let record: DurableRecord = gateway.load().await.unwrap();
    assert_eq!(record, DurableRecord::default());
}

#[tokio::test]
async fn invalid_save_is_rejected_without_writing() {
    let (durable, ephemeral, gateway) = stores();

    let mut record = DurableRecord::new(&sealed("sk"), ConnectionStatus::Unknown);
    record.digest = None;
    let err = gateway.save(record).await.unwrap_err();
    assert!(matches!(err, VaultError::Validation(_)));

    let err = gateway.save(SessionRecord::with_pin("")).await.unwrap_err();
    assert!(matches!(err, VaultError::Validation(_)));

    assert_eq!(durable.write_count().await, 0);
    assert_eq!(ephemeral.write_count().await, 0);
}

#[tokio::test]
async fn save_writes_nulls_for_absent_fields() {
    let (durable, _, gateway) = stores();
    gateway.save(DurableRecord::default()).await.unwrap();

    let writes = durable.writes().await;
    assert_eq!(writes.len(), 1);
    for key in [CIPHERTEXT_KEY, DIGEST_KEY, CONNECTED_KEY, KDF_ITERATIONS_KEY] {
        assert_eq!(writes[0].get(key), Some(&Value::Null), "{key}");
    }
}

#[tokio::test]
async fn schemas_write_to_their_own_tier() {
    let (durable, ephemeral, gateway) = stores();
    gateway.save(SessionRecord::with_pin("1234")).await.unwrap();
    assert_eq!(durable.write_count().await, 0);
    assert_eq!(ephemeral.value(SESSION_PIN_KEY).await, Some(json!("1234")));
}

#[tokio::test]
async fn corrupt_durable_data_starts_vault_in_setup() {
    let (durable, _, gateway) = stores();
    durable.seed(CIPHERTEXT_KEY, json!("@@@not-base64@@@")).await;
    durable.seed(DIGEST_KEY, json!(integrity::digest("sk"))).await;

    let settings = VaultSettings {
        kdf_iterations: 1_000,
        ..VaultSettings::default()
    };
    let (vault, init) = Vault::load(gateway, None, settings).await.unwrap();
    assert_eq!(init.mode, Mode::SettingUp);
    assert_eq!(vault.mode(), Mode::SettingUp);
    assert!(durable.keys().await.is_empty());
}
