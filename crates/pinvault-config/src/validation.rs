// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as KDF cost floors, non-empty paths, and well-formed endpoints.

use crate::diagnostic::ConfigError;
use crate::model::{MIN_KDF_ITERATIONS, PinvaultConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors (does not fail fast).
pub fn validate_config(config: &PinvaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.validation.enabled {
        let endpoint = config.validation.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "validation.endpoint `{endpoint}` must be an http:// or https:// URL"
                ),
            });
        }
    }

    if config.validation.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "validation.timeout_secs must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_validation_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = PinvaultConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn weak_kdf_iterations_fail_validation() {
        let mut config = PinvaultConfig::default();
        config.vault.kdf_iterations = 10_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "kdf_iterations"));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = PinvaultConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "database_path"));
    }

    #[test]
    fn non_http_endpoint_fails_only_when_enabled() {
        let mut config = PinvaultConfig::default();
        config.validation.endpoint = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "validation.endpoint"));

        config.validation.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = PinvaultConfig::default();
        config.log.level = "loud".to_string();
        config.validation.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_validation_error(&errors, "log.level"));
        assert!(has_validation_error(&errors, "timeout_secs"));
    }
}
