// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires configured adapters into a vault and resumes the session.

use std::sync::Arc;

use pinvault_config::PinvaultConfig;
use pinvault_config::model::SessionStoreKind;
use pinvault_core::{KeyValidator, KeyValueStore, PinvaultError};
use pinvault_remote::HttpKeyValidator;
use pinvault_storage::{MemoryStore, SessionFileStore, SqliteStore};
use pinvault_vault::{StorageGateway, Vault, VaultError, VaultSettings};
use tracing::{debug, warn};

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Adapter(#[from] PinvaultError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// A resumed vault ready for one command.
pub struct Session {
    pub vault: Vault,
}

impl Session {
    /// Builds a vault over the given adapters and resumes it.
    pub async fn assemble(
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
        validator: Option<Arc<dyn KeyValidator>>,
        settings: VaultSettings,
    ) -> Result<Self, CliError> {
        let gateway = StorageGateway::new(durable, ephemeral);
        let mut vault = Vault::new(gateway, validator, settings);
        let resumed = vault.resume().await?;
        debug!(mode = %resumed.value, "session resumed");
        Ok(Self { vault })
    }
}

/// Opens the configured stores and validator and resumes the session.
pub async fn open(config: &PinvaultConfig) -> Result<Session, CliError> {
    let durable: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&config.storage).await?);
    let ephemeral = ephemeral_store(config.storage.session_store);

    let validator: Option<Arc<dyn KeyValidator>> = if config.validation.enabled {
        Some(Arc::new(HttpKeyValidator::new(&config.validation)?))
    } else {
        None
    };

    Session::assemble(durable, ephemeral, validator, VaultSettings::from(config)).await
}

fn ephemeral_store(kind: SessionStoreKind) -> Arc<dyn KeyValueStore> {
    match kind {
        SessionStoreKind::RuntimeDir => match SessionFileStore::in_runtime_dir() {
            Some(store) => Arc::new(store),
            None => {
                warn!(
                    "no runtime directory available, the session PIN will not outlive this process"
                );
                Arc::new(MemoryStore::ephemeral())
            }
        },
        SessionStoreKind::Memory => Arc::new(MemoryStore::ephemeral()),
    }
}

#[cfg(test)]
mod tests {
    use pinvault_core::PluginAdapter;
    use pinvault_vault::Mode;

    use super::*;

    #[tokio::test]
    async fn open_with_in_memory_stores() {
        let mut config = PinvaultConfig::default();
        config.storage.database_path = ":memory:".to_string();
        config.storage.session_store = SessionStoreKind::Memory;
        config.validation.enabled = false;

        let session = open(&config).await.unwrap();
        assert_eq!(session.vault.mode(), Mode::SettingUp);
        assert!(session.vault.validator().is_none());
        assert!(!session.vault.has_validator());
    }

    #[test]
    fn memory_session_store_is_ephemeral() {
        let store = ephemeral_store(SessionStoreKind::Memory);
        assert_eq!(store.name(), "memory");
    }
}
