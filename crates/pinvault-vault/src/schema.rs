// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned record schemas for the durable and ephemeral stores.
//!
//! Each schema declares the store keys it owns (namespaced with a version
//! tag), the tier it lives in, and a validation rule beyond what serde's
//! type checks already enforce.

use pinvault_core::ConnectionStatus;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto;
use crate::integrity;
use crate::state::SealedSecret;

/// Which store a schema is persisted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTier {
    /// Survives restarts.
    Durable,
    /// Cleared when the session ends.
    Ephemeral,
}

/// A typed record backed by a fixed set of store keys.
pub trait Schema: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Namespace used in log lines.
    const NAME: &'static str;
    /// Store the record is persisted in.
    const TIER: StoreTier;
    /// Every key the record reads and writes.
    const KEYS: &'static [&'static str];

    /// Checks invariants serde cannot express. The error text must not
    /// contain field values.
    fn validate(&self) -> Result<(), String>;
}

pub const CIPHERTEXT_KEY: &str = "vault.v1.ciphertext";
pub const DIGEST_KEY: &str = "vault.v1.digest";
pub const CONNECTED_KEY: &str = "vault.v1.connected";
pub const KDF_ITERATIONS_KEY: &str = "vault.v1.kdf_iterations";
pub const SESSION_PIN_KEY: &str = "session.v1.pin";

/// Durable projection of the vault: encrypted secret, its digest, the PBKDF2
/// iteration count it was sealed with, and the last validation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DurableRecord {
    #[serde(rename = "vault.v1.ciphertext")]
    pub ciphertext: Option<String>,
    #[serde(rename = "vault.v1.digest")]
    pub digest: Option<String>,
    #[serde(rename = "vault.v1.connected")]
    pub status: ConnectionStatus,
    #[serde(rename = "vault.v1.kdf_iterations")]
    pub kdf_iterations: Option<u32>,
}

impl DurableRecord {
    pub fn new(sealed: &SealedSecret, status: ConnectionStatus) -> Self {
        Self {
            ciphertext: Some(sealed.ciphertext.clone()),
            digest: Some(sealed.digest.clone()),
            status,
            kdf_iterations: Some(sealed.kdf_iterations),
        }
    }

    /// The sealed secret, if all of its parts are present.
    pub fn sealed(&self) -> Option<SealedSecret> {
        match (&self.ciphertext, &self.digest, self.kdf_iterations) {
            (Some(ciphertext), Some(digest), Some(kdf_iterations)) => Some(SealedSecret {
                ciphertext: ciphertext.clone(),
                digest: digest.clone(),
                kdf_iterations,
            }),
            _ => None,
        }
    }
}

impl Schema for DurableRecord {
    const NAME: &'static str = "vault.v1";
    const TIER: StoreTier = StoreTier::Durable;
    const KEYS: &'static [&'static str] = &[
        CIPHERTEXT_KEY,
        DIGEST_KEY,
        CONNECTED_KEY,
        KDF_ITERATIONS_KEY,
    ];

    fn validate(&self) -> Result<(), String> {
        match (&self.ciphertext, &self.digest, self.kdf_iterations) {
            (None, None, None) => Ok(()),
            (Some(ciphertext), Some(digest), Some(kdf_iterations)) => {
                if !crypto::is_well_formed_payload(ciphertext) {
                    return Err(format!("`{CIPHERTEXT_KEY}` is not a valid payload"));
                }
                if !integrity::is_well_formed(digest) {
                    return Err(format!("`{DIGEST_KEY}` is not a SHA-256 hex digest"));
                }
                if kdf_iterations == 0 {
                    return Err(format!("`{KDF_ITERATIONS_KEY}` must be positive"));
                }
                Ok(())
            }
            _ => Err(format!(
                "`{CIPHERTEXT_KEY}`, `{DIGEST_KEY}` and `{KDF_ITERATIONS_KEY}` must be set together"
            )),
        }
    }
}

/// Ephemeral session record: the PIN cached for silent re-unlock.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct SessionRecord {
    #[serde(rename = "session.v1.pin")]
    pub pin: Option<String>,
}

impl SessionRecord {
    pub fn with_pin(pin: &str) -> Self {
        Self {
            pin: Some(pin.to_string()),
        }
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("pin", &self.pin.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Schema for SessionRecord {
    const NAME: &'static str = "session.v1";
    const TIER: StoreTier = StoreTier::Ephemeral;
    const KEYS: &'static [&'static str] = &[SESSION_PIN_KEY];

    fn validate(&self) -> Result<(), String> {
        match &self.pin {
            Some(pin) if pin.is_empty() => Err("PIN must not be empty".to_string()),
            _ => Ok(()),
        }
    }
}
