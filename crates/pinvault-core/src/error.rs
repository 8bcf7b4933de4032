// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by the Pinvault adapters.

use thiserror::Error;

/// The error type returned by adapter traits and infrastructure code.
///
/// Vault operations map these into the user-facing `VaultError` taxonomy;
/// nothing in here is shown to end users verbatim.
#[derive(Debug, Error)]
pub enum PinvaultError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Key-value store errors (database failure, unreadable session file).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// External validation service errors (transport failure, unexpected status).
    #[error("validator error: {message}")]
    Validator {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PinvaultError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage { source: err.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_helper_accepts_strings_and_errors() {
        let from_str = PinvaultError::storage("disk full");
        assert_eq!(from_str.to_string(), "storage error: disk full");

        let from_io = PinvaultError::storage(std::io::Error::other("EIO"));
        assert!(from_io.to_string().contains("EIO"));
    }

    #[test]
    fn timeout_message_includes_duration() {
        let err = PinvaultError::Timeout {
            duration: std::time::Duration::from_secs(3),
        };
        assert_eq!(err.to_string(), "operation timed out after 3s");
    }
}
