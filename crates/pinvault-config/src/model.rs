// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Pinvault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Minimum PBKDF2-HMAC-SHA256 iteration count accepted by validation.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Top-level Pinvault configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PinvaultConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Encryption settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Durable and ephemeral store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// External key validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Credential vault encryption configuration.
///
/// The iteration count is not recorded in the ciphertext payload: changing
/// it makes previously saved payloads undecryptable until the vault is reset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

/// Where the session PIN is kept between invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStoreKind {
    /// A file in the user's runtime directory, erased at logout.
    #[default]
    RuntimeDir,
    /// Process memory only; every invocation starts locked.
    Memory,
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database backing the durable store.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Backend for the ephemeral session store.
    #[serde(default)]
    pub session_store: SessionStoreKind,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            session_store: SessionStoreKind::default(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pinvault").join("pinvault.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("pinvault.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// External key validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Whether saved keys are checked against the remote service.
    #[serde(default = "default_validation_enabled")]
    pub enabled: bool,

    /// Endpoint queried with `Authorization: Bearer <key>`.
    #[serde(default = "default_validation_endpoint")]
    pub endpoint: String,

    /// Upper bound on a single validation call, in seconds.
    #[serde(default = "default_validation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: default_validation_enabled(),
            endpoint: default_validation_endpoint(),
            timeout_secs: default_validation_timeout_secs(),
        }
    }
}

fn default_validation_enabled() -> bool {
    true
}

fn default_validation_endpoint() -> String {
    "https://api.openai.com/v1/models".to_string()
}

fn default_validation_timeout_secs() -> u64 {
    10
}
