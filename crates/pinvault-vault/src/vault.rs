// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: set up, unlock, lock, replace the secret, and reset.
//!
//! Every operation performs its store I/O first and commits the next
//! in-memory state only after all fallible steps succeeded, so a failed
//! operation leaves the vault exactly as it found it. The one deliberate
//! exception is [`Vault::set_new_secret`]: the secret is persisted and
//! committed before external validation runs, and a validation failure only
//! affects the recorded connection status.

use std::sync::Arc;
use std::time::Duration;

use pinvault_config::PinvaultConfig;
use pinvault_core::{ConnectionStatus, KeyValidator, PluginAdapter};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::crypto;
use crate::error::VaultError;
use crate::gateway::StorageGateway;
use crate::integrity;
use crate::outcome::{Confirmation, Outcome};
use crate::schema::{DurableRecord, SessionRecord};
use crate::state::{Mode, SealedSecret, VaultState};

/// Tunables the vault needs from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultSettings {
    /// PBKDF2 iteration count for newly sealed secrets. Existing payloads
    /// are opened with the count stored alongside them.
    pub kdf_iterations: u32,
    /// Upper bound on a single external validation call.
    pub validation_timeout: Duration,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            kdf_iterations: pinvault_config::model::MIN_KDF_ITERATIONS,
            validation_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&PinvaultConfig> for VaultSettings {
    fn from(config: &PinvaultConfig) -> Self {
        Self {
            kdf_iterations: config.vault.kdf_iterations,
            validation_timeout: Duration::from_secs(config.validation.timeout_secs),
        }
    }
}

/// Result of [`Vault::initialize`].
pub struct Initialized {
    pub mode: Mode,
    /// PIN cached by an earlier unlock in this session, if any. The caller
    /// may pass it straight to [`Vault::unlock`].
    pub session_pin: Option<SecretString>,
}

impl std::fmt::Debug for Initialized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Initialized")
            .field("mode", &self.mode)
            .field("session_pin", &self.session_pin.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// What happened when a saved secret was checked against the external
/// service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Not requested, or nothing to check.
    Skipped,
    Accepted,
    Rejected,
    /// No validator configured, the service errored, or the call timed out.
    Unavailable,
}

impl ValidationOutcome {
    fn status(self) -> ConnectionStatus {
        match self {
            Self::Accepted => ConnectionStatus::Confirmed,
            Self::Rejected => ConnectionStatus::Rejected,
            Self::Skipped | Self::Unavailable => ConnectionStatus::Unknown,
        }
    }
}

/// Value returned by [`Vault::set_new_secret`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretSaved {
    pub status: ConnectionStatus,
    pub validation: ValidationOutcome,
}

/// The PIN-gated vault.
pub struct Vault {
    gateway: StorageGateway,
    validator: Option<Arc<dyn KeyValidator>>,
    settings: VaultSettings,
    state: VaultState,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("state", &self.state)
            .field("gateway", &self.gateway)
            .field("validator", &self.validator.as_ref().map(|v| v.name().to_string()))
            .finish()
    }
}

impl Vault {
    /// Creates a vault over the given stores without touching them.
    ///
    /// The vault reports [`Mode::SettingUp`] until [`initialize`](Self::initialize)
    /// has run; most callers want [`load`](Self::load) instead.
    pub fn new(
        gateway: StorageGateway,
        validator: Option<Arc<dyn KeyValidator>>,
        settings: VaultSettings,
    ) -> Self {
        Self {
            gateway,
            validator,
            settings,
            state: VaultState::default(),
        }
    }

    /// Creates a vault and runs [`initialize`](Self::initialize).
    pub async fn load(
        gateway: StorageGateway,
        validator: Option<Arc<dyn KeyValidator>>,
        settings: VaultSettings,
    ) -> Result<(Self, Initialized), VaultError> {
        let mut vault = Self::new(gateway, validator, settings);
        let initialized = vault.initialize().await?.into_value();
        Ok((vault, initialized))
    }

    // --- getters ---

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.state.status()
    }

    pub fn is_secret_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// The decrypted secret; present only while unlocked.
    pub fn secret(&self) -> Option<&SecretString> {
        self.state.secret()
    }

    /// Whether a sealed secret exists (locked or unlocked).
    pub fn has_stored_secret(&self) -> bool {
        self.state.sealed().is_some()
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    pub fn validator(&self) -> Option<&dyn KeyValidator> {
        self.validator.as_deref()
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    // --- operations ---

    /// Loads durable and ephemeral data and recomputes the mode.
    ///
    /// Idempotent. Any in-memory secret is discarded.
    pub async fn initialize(&mut self) -> Outcome<Initialized> {
        let record: DurableRecord = self.gateway.load().await?;
        let mut session: SessionRecord = self.gateway.load().await?;

        let next = VaultState::from_record(&record);
        let mode = next.mode();
        let session_pin = session.pin.take().map(SecretString::from);
        self.state = next;

        info!(
            mode = %mode,
            status = %record.status,
            session_pin = session_pin.is_some(),
            "vault initialized"
        );
        let message = match mode {
            Mode::SettingUp => "Choose a PIN to set up the vault.",
            _ => "Vault is locked.",
        };
        Ok(Confirmation::new(Initialized { mode, session_pin }, message))
    }

    /// Initializes and, if the session still holds a PIN, unlocks with it.
    ///
    /// A session PIN that no longer opens the vault is cleared and the vault
    /// stays locked; this is not an error.
    pub async fn resume(&mut self) -> Outcome<Mode> {
        let initialized = self.initialize().await?;
        let message = initialized.message.clone();
        let Initialized { mode, session_pin } = initialized.into_value();

        let pin = match (mode, session_pin) {
            (Mode::Locked, Some(pin)) => pin,
            (mode, _) => return Ok(Confirmation::new(mode, message)),
        };

        match self.unlock(pin).await {
            Ok(_) => Ok(Confirmation::new(Mode::Unlocked, "Session resumed.")),
            Err(VaultError::InvalidPin) => {
                warn!("session PIN no longer opens the vault, clearing it");
                if let Err(e) = self.gateway.save(SessionRecord::default()).await {
                    warn!(error = %e, "failed to clear stale session PIN");
                }
                Ok(Confirmation::new(Mode::Locked, "Vault is locked."))
            }
            Err(e) => Err(e),
        }
    }

    /// Decrypts the stored secret with `pin`.
    ///
    /// Fails with [`VaultError::InvalidPin`] on any decryption or digest
    /// mismatch; the vault stays locked.
    pub async fn unlock(&mut self, pin: SecretString) -> Outcome {
        let sealed = match &self.state {
            VaultState::Locked { sealed, .. } => sealed,
            other => {
                return Err(VaultError::Precondition {
                    operation: "unlock",
                    mode: other.mode(),
                });
            }
        };

        let secret = crypto::decrypt_secret(
            &sealed.ciphertext,
            pin.expose_secret(),
            sealed.kdf_iterations,
        )?;
        if !integrity::verify(secret.expose_secret(), &sealed.digest) {
            if cfg!(debug_assertions) {
                debug!("decrypted secret does not match stored digest");
            }
            return Err(VaultError::InvalidPin);
        }

        self.remember_pin(&pin).await;
        self.state = std::mem::take(&mut self.state).unlock(pin, secret);

        info!("vault unlocked");
        Ok(Confirmation::done("Vault unlocked."))
    }

    /// Forgets the session PIN and discards the decrypted secret.
    pub async fn lock(&mut self) -> Outcome {
        self.state.require("lock", Mode::Unlocked)?;

        self.gateway.save(SessionRecord::default()).await?;
        self.state = std::mem::take(&mut self.state).lock();

        info!("vault locked");
        Ok(Confirmation::done("Vault locked."))
    }

    /// Chooses the PIN for a vault that is being set up.
    ///
    /// Seals an empty secret under `pin` and leaves the vault unlocked.
    pub async fn set_new_pin(&mut self, pin: SecretString) -> Outcome {
        self.state.require("set_new_pin", Mode::SettingUp)?;
        if pin.expose_secret().is_empty() {
            return Err(VaultError::Validation("PIN must not be empty".to_string()));
        }

        let secret = SecretString::from(String::new());
        let sealed = self.seal(&secret, &pin)?;
        self.gateway
            .save(DurableRecord::new(&sealed, self.state.status()))
            .await?;
        self.remember_pin(&pin).await;

        self.state = std::mem::take(&mut self.state).establish(sealed, pin, secret);

        info!("vault PIN set");
        Ok(Confirmation::done("PIN set. The vault is unlocked."))
    }

    /// Encrypts and stores a new secret under the held PIN.
    ///
    /// The secret is persisted with an unknown connection status before any
    /// validation happens. With `should_validate`, the external validator is
    /// then asked about it and its verdict recorded; a validator that errors
    /// or times out leaves the status unknown and does not fail the call.
    pub async fn set_new_secret(
        &mut self,
        secret: SecretString,
        should_validate: bool,
    ) -> Outcome<SecretSaved> {
        let pin = match &self.state {
            VaultState::Unlocked { pin, .. } => pin,
            other => {
                return Err(VaultError::Precondition {
                    operation: "set_new_secret",
                    mode: other.mode(),
                });
            }
        };

        let sealed = self.seal(&secret, pin)?;
        self.gateway
            .save(DurableRecord::new(&sealed, ConnectionStatus::Unknown))
            .await?;
        self.state = std::mem::take(&mut self.state).replace_secret(
            sealed,
            secret,
            ConnectionStatus::Unknown,
        );
        info!("secret saved");

        if !should_validate || self.state.secret_is_empty() {
            return Ok(Confirmation::new(
                SecretSaved {
                    status: ConnectionStatus::Unknown,
                    validation: ValidationOutcome::Skipped,
                },
                "API key saved.",
            ));
        }

        let validation = self.validate_held_secret().await;
        let status = self.record_status(validation.status()).await;
        let message = match (validation, status) {
            (ValidationOutcome::Accepted, ConnectionStatus::Confirmed) => {
                "API key saved and verified."
            }
            (ValidationOutcome::Rejected, ConnectionStatus::Rejected) => {
                "API key saved, but the service rejected it."
            }
            _ => "API key saved. It could not be verified right now.",
        };
        Ok(Confirmation::new(SecretSaved { status, validation }, message))
    }

    /// Re-checks the held secret with the external validator and records
    /// the result. An unavailable validator leaves the status untouched.
    pub async fn check_connection(&mut self) -> Outcome<ConnectionStatus> {
        self.state.require("check_connection", Mode::Unlocked)?;
        if self.state.secret_is_empty() {
            return Ok(Confirmation::new(
                self.state.status(),
                "No API key saved yet.",
            ));
        }

        let message = match self.validate_held_secret().await {
            ValidationOutcome::Accepted => {
                self.persist_status(ConnectionStatus::Confirmed).await?;
                "The API key works."
            }
            ValidationOutcome::Rejected => {
                self.persist_status(ConnectionStatus::Rejected).await?;
                "The service rejected the API key."
            }
            ValidationOutcome::Skipped | ValidationOutcome::Unavailable => {
                "The API key could not be verified right now."
            }
        };
        Ok(Confirmation::new(self.state.status(), message))
    }

    /// Marks the held secret as edited but not yet saved.
    pub fn mark_secret_dirty(&mut self) -> Outcome {
        self.state.require("mark_secret_dirty", Mode::Unlocked)?;
        self.state = std::mem::take(&mut self.state).with_dirty(true);
        Ok(Confirmation::done("Unsaved changes."))
    }

    /// Erases all stored data and returns to setup.
    ///
    /// A failure to clear the session store is logged but does not fail the
    /// reset: a leftover PIN cannot unlock a vault that has no secret.
    pub async fn reset(&mut self) -> Outcome {
        self.gateway.save(DurableRecord::default()).await?;
        if let Err(e) = self.gateway.save(SessionRecord::default()).await {
            warn!(error = %e, "failed to clear session PIN during reset");
        }
        self.state = VaultState::default();

        info!("vault reset");
        Ok(Confirmation::done("Vault reset. Choose a new PIN to start over."))
    }

    // --- helpers ---

    fn seal(&self, secret: &SecretString, pin: &SecretString) -> Result<SealedSecret, VaultError> {
        let ciphertext = crypto::encrypt_secret(
            secret.expose_secret(),
            pin.expose_secret(),
            self.settings.kdf_iterations,
        )?;
        Ok(SealedSecret {
            ciphertext,
            digest: integrity::digest(secret.expose_secret()),
            kdf_iterations: self.settings.kdf_iterations,
        })
    }

    /// Caches the PIN in the ephemeral store. Failure only costs the silent
    /// re-unlock, so it is logged rather than returned.
    async fn remember_pin(&self, pin: &SecretString) {
        let record = SessionRecord::with_pin(pin.expose_secret());
        if let Err(e) = self.gateway.save(record).await {
            warn!(error = %e, "failed to cache session PIN");
        }
    }

    async fn validate_held_secret(&self) -> ValidationOutcome {
        let Some(validator) = &self.validator else {
            debug!("no key validator configured");
            return ValidationOutcome::Unavailable;
        };
        let Some(secret) = self.state.secret() else {
            return ValidationOutcome::Skipped;
        };

        let timeout = self.settings.validation_timeout;
        match tokio::time::timeout(timeout, validator.validate(secret.expose_secret())).await {
            Ok(Ok(true)) => {
                info!(validator = validator.name(), "API key accepted");
                ValidationOutcome::Accepted
            }
            Ok(Ok(false)) => {
                info!(validator = validator.name(), "API key rejected");
                ValidationOutcome::Rejected
            }
            Ok(Err(e)) => {
                warn!(validator = validator.name(), error = %e, "key validation unavailable");
                ValidationOutcome::Unavailable
            }
            Err(_) => {
                warn!(
                    validator = validator.name(),
                    timeout_secs = timeout.as_secs_f64(),
                    "key validation timed out"
                );
                ValidationOutcome::Unavailable
            }
        }
    }

    /// Persists a validation verdict after the secret itself was saved.
    /// Returns the status actually in effect afterwards.
    async fn record_status(&mut self, status: ConnectionStatus) -> ConnectionStatus {
        if status == self.state.status() {
            return status;
        }
        match self.persist_status(status).await {
            Ok(()) => status,
            Err(e) => {
                warn!(error = %e, "failed to record validation result");
                self.state.status()
            }
        }
    }

    async fn persist_status(&mut self, status: ConnectionStatus) -> Result<(), VaultError> {
        let mut record = self.state.record();
        record.status = status;
        self.gateway.save(record).await?;
        self.state = std::mem::take(&mut self.state).with_status(status);
        Ok(())
    }
}

/// Mask a secret for display: `"sk-a...wxyz"`.
///
/// Shows up to 4 leading and 4 trailing characters. Values shorter than 10
/// characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
