// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vault state and its pure transitions.
//!
//! The mode is never stored; it is a function of which variant is held.
//! Transitions consume the current state and return the next one, so the
//! [`Vault`](crate::Vault) can run all fallible I/O first and swap the state
//! in a single infallible step afterwards.

use pinvault_core::ConnectionStatus;
use secrecy::{ExposeSecret, SecretString};
use strum::Display;

use crate::error::VaultError;
use crate::schema::DurableRecord;

/// The three lifecycle modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Mode {
    /// No PIN has been chosen yet.
    #[strum(serialize = "setting up")]
    SettingUp,
    /// A sealed secret exists; the PIN is needed to read it.
    #[strum(serialize = "locked")]
    Locked,
    /// The secret and PIN are held in memory.
    #[strum(serialize = "unlocked")]
    Unlocked,
}

/// The encrypted secret together with the digest of its cleartext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: String,
    pub digest: String,
    /// PBKDF2 iterations the ciphertext's key was derived with.
    pub kdf_iterations: u32,
}

/// Full in-memory state of the vault.
pub enum VaultState {
    SettingUp {
        status: ConnectionStatus,
    },
    Locked {
        sealed: SealedSecret,
        status: ConnectionStatus,
    },
    Unlocked {
        sealed: SealedSecret,
        status: ConnectionStatus,
        pin: SecretString,
        secret: SecretString,
        /// The UI holds an unsaved edit of the secret.
        dirty: bool,
    },
}

impl Default for VaultState {
    fn default() -> Self {
        Self::SettingUp {
            status: ConnectionStatus::Unknown,
        }
    }
}

impl std::fmt::Debug for VaultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultState")
            .field("mode", &self.mode())
            .field("status", &self.status())
            .field("dirty", &self.is_dirty())
            .finish_non_exhaustive()
    }
}

impl VaultState {
    /// State implied by a freshly loaded durable record: locked if a
    /// sealed secret exists, otherwise setting up.
    pub fn from_record(record: &DurableRecord) -> Self {
        match record.sealed() {
            Some(sealed) => Self::Locked {
                sealed,
                status: record.status,
            },
            None => Self::SettingUp {
                status: record.status,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::SettingUp { .. } => Mode::SettingUp,
            Self::Locked { .. } => Mode::Locked,
            Self::Unlocked { .. } => Mode::Unlocked,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        match self {
            Self::SettingUp { status }
            | Self::Locked { status, .. }
            | Self::Unlocked { status, .. } => *status,
        }
    }

    pub fn sealed(&self) -> Option<&SealedSecret> {
        match self {
            Self::SettingUp { .. } => None,
            Self::Locked { sealed, .. } | Self::Unlocked { sealed, .. } => Some(sealed),
        }
    }

    pub fn secret(&self) -> Option<&SecretString> {
        match self {
            Self::Unlocked { secret, .. } => Some(secret),
            _ => None,
        }
    }

    pub fn pin(&self) -> Option<&SecretString> {
        match self {
            Self::Unlocked { pin, .. } => Some(pin),
            _ => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Unlocked { dirty: true, .. })
    }

    /// Durable projection of this state.
    pub fn record(&self) -> DurableRecord {
        match self.sealed() {
            Some(sealed) => DurableRecord::new(sealed, self.status()),
            None => DurableRecord {
                status: self.status(),
                ..DurableRecord::default()
            },
        }
    }

    /// Fails with a precondition error unless the vault is in `expected`.
    pub fn require(&self, operation: &'static str, expected: Mode) -> Result<(), VaultError> {
        let mode = self.mode();
        if mode == expected {
            Ok(())
        } else {
            Err(VaultError::Precondition { operation, mode })
        }
    }

    /// Locked -> Unlocked with the decrypted secret. Other modes are
    /// returned unchanged.
    pub fn unlock(self, pin: SecretString, secret: SecretString) -> Self {
        match self {
            Self::Locked { sealed, status } => Self::Unlocked {
                sealed,
                status,
                pin,
                secret,
                dirty: false,
            },
            other => other,
        }
    }

    /// Unlocked -> Locked, dropping the PIN and secret from memory.
    pub fn lock(self) -> Self {
        match self {
            Self::Unlocked { sealed, status, .. } => Self::Locked { sealed, status },
            other => other,
        }
    }

    /// SettingUp -> Unlocked with a freshly sealed (empty) secret.
    pub fn establish(self, sealed: SealedSecret, pin: SecretString, secret: SecretString) -> Self {
        match self {
            Self::SettingUp { status } => Self::Unlocked {
                sealed,
                status,
                pin,
                secret,
                dirty: false,
            },
            other => other,
        }
    }

    /// Replaces the held secret and clears the dirty flag.
    pub fn replace_secret(
        self,
        sealed: SealedSecret,
        secret: SecretString,
        status: ConnectionStatus,
    ) -> Self {
        match self {
            Self::Unlocked { pin, .. } => Self::Unlocked {
                sealed,
                status,
                pin,
                secret,
                dirty: false,
            },
            other => other,
        }
    }

    pub fn with_status(self, status: ConnectionStatus) -> Self {
        match self {
            Self::SettingUp { .. } => Self::SettingUp { status },
            Self::Locked { sealed, .. } => Self::Locked { sealed, status },
            Self::Unlocked {
                sealed,
                pin,
                secret,
                dirty,
                ..
            } => Self::Unlocked {
                sealed,
                status,
                pin,
                secret,
                dirty,
            },
        }
    }

    pub fn with_dirty(self, dirty: bool) -> Self {
        match self {
            Self::Unlocked {
                sealed,
                status,
                pin,
                secret,
                ..
            } => Self::Unlocked {
                sealed,
                status,
                pin,
                secret,
                dirty,
            },
            other => other,
        }
    }

    /// Whether the held secret is empty (only meaningful when unlocked).
    pub fn secret_is_empty(&self) -> bool {
        self.secret().is_none_or(|s| s.expose_secret().is_empty())
    }
}
