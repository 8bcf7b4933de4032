// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pinvault.toml` > `~/.config/pinvault/pinvault.toml`
//! > `/etc/pinvault/pinvault.toml`, with environment variable overrides via the
//! `PINVAULT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PinvaultConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pinvault/pinvault.toml`
/// 3. `~/.config/pinvault/pinvault.toml`
/// 4. `./pinvault.toml`
/// 5. `PINVAULT_*` environment variables
pub fn load_config() -> Result<PinvaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PinvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PinvaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PinvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PinvaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PinvaultConfig::default()))
        .merge(Toml::file("/etc/pinvault/pinvault.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pinvault/pinvault.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pinvault.toml"))
        .merge(env_provider())
}

/// Environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `PINVAULT_VAULT_KDF_ITERATIONS` maps to `vault.kdf_iterations`, not
/// `vault.kdf.iterations`. `PINVAULT_PIN` and `PINVAULT_KEY` are credential
/// inputs for the CLI and are filtered out.
fn env_provider() -> Env {
    Env::prefixed("PINVAULT_")
        .filter(|key| key != "pin" && key != "key")
        .map(|key| {
            let key_str = key.as_str().to_ascii_lowercase();
            let mapped = key_str
                .replacen("log_", "log.", 1)
                .replacen("vault_", "vault.", 1)
                .replacen("storage_", "storage.", 1)
                .replacen("validation_", "validation.", 1);
            mapped.into()
        })
}
