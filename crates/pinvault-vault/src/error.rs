// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for vault operations.
//!
//! Every variant renders a message that is safe to show to an end user.
//! Secrets, PINs and raw decryption failures never appear in these messages.

use pinvault_core::PinvaultError;

use crate::state::Mode;

/// Failure of a vault operation.
///
/// An operation that returns one of these has left the in-memory state
/// exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Data handed to the storage gateway (or supplied by the caller) does
    /// not satisfy the schema.
    #[error("invalid data: {0}")]
    Validation(String),

    /// Decryption or integrity verification failed. Deliberately carries no
    /// detail: a wrong PIN and a tampered payload are indistinguishable.
    #[error("incorrect PIN")]
    InvalidPin,

    /// The operation is not permitted in the current mode.
    #[error("{}", precondition_advice(operation, *mode))]
    Precondition {
        /// Short operation name, e.g. `unlock`.
        operation: &'static str,
        /// Mode the vault was in when the call was rejected.
        mode: Mode,
    },

    /// A durable or ephemeral store could not be read or written.
    #[error("storage unavailable: {0}")]
    Storage(#[source] PinvaultError),

    /// The platform failed to produce randomness or a cipher key.
    #[error("encryption failed: {0}")]
    Crypto(String),
}

impl VaultError {
    /// Whether this is a wrong-PIN failure.
    pub fn is_invalid_pin(&self) -> bool {
        matches!(self, Self::InvalidPin)
    }

    /// Whether this is a mode precondition failure.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}

/// Human-readable advice for an operation attempted in the wrong mode.
fn precondition_advice(operation: &str, mode: Mode) -> String {
    match (operation, mode) {
        ("set_new_pin", _) => {
            "A PIN is already set. Reset the vault to choose a new one.".to_string()
        }
        (_, Mode::SettingUp) => "Please set a PIN first.".to_string(),
        ("unlock", Mode::Unlocked) => "The vault is already unlocked.".to_string(),
        ("lock", Mode::Locked) => "The vault is already locked.".to_string(),
        (_, Mode::Locked) => "Please unlock the vault first.".to_string(),
        (op, mode) => format!("`{op}` is not available while the vault is {mode}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pin_message_has_no_detail() {
        assert_eq!(VaultError::InvalidPin.to_string(), "incorrect PIN");
    }

    #[test]
    fn precondition_advice_depends_on_mode() {
        let err = VaultError::Precondition {
            operation: "unlock",
            mode: Mode::SettingUp,
        };
        assert_eq!(err.to_string(), "Please set a PIN first.");

        let err = VaultError::Precondition {
            operation: "set_new_secret",
            mode: Mode::Locked,
        };
        assert_eq!(err.to_string(), "Please unlock the vault first.");

        let err = VaultError::Precondition {
            operation: "set_new_pin",
            mode: Mode::Locked,
        };
        assert!(err.to_string().contains("Reset the vault"));
        assert!(err.is_precondition());
    }

    #[test]
    fn storage_error_keeps_source() {
        let err = VaultError::Storage(PinvaultError::Internal("disk full".into()));
        assert!(err.to_string().contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
