// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PIN-gated credential vault.
//!
//! A single secret (a third-party API key) is encrypted under a key derived
//! from a short PIN and kept in a durable store next to a SHA-256 digest of
//! the cleartext. The PIN itself is only ever written to an ephemeral,
//! session-scoped store so the vault can re-unlock silently within one
//! session.
//!
//! The [`Vault`] is a three-state machine (setting up, locked, unlocked);
//! every operation either commits its whole transition or leaves the state
//! untouched.

pub mod crypto;
pub mod error;
pub mod gateway;
pub mod integrity;
pub mod kdf;
pub mod outcome;
pub mod prompt;
pub mod schema;
pub mod state;
pub mod vault;

pub use error::VaultError;
pub use gateway::StorageGateway;
pub use outcome::{Confirmation, Outcome};
pub use schema::{DurableRecord, Schema, SessionRecord, StoreTier};
pub use state::{Mode, SealedSecret, VaultState};
pub use vault::{
    mask_secret, Initialized, SecretSaved, ValidationOutcome, Vault, VaultSettings,
};
