// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the vault.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// Raw key-value pairs exchanged with a [`KeyValueStore`](crate::KeyValueStore).
///
/// A `null` value means "absent": stores have no separate sentinel for
/// unset keys.
pub type StoreEntries = serde_json::Map<String, serde_json::Value>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays for the vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
pub enum AdapterType {
    DurableStore,
    EphemeralStore,
    Validator,
}

/// Result of the last external validation of the stored secret.
///
/// Persisted as a nullable boolean: `null` is unknown, `true` confirmed,
/// `false` rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Confirmed,
    Rejected,
}

impl ConnectionStatus {
    /// The nullable-boolean form written to the durable store.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Confirmed => Some(true),
            Self::Rejected => Some(false),
        }
    }

    /// Inverse of [`as_flag`](Self::as_flag).
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => Self::Unknown,
            Some(true) => Self::Confirmed,
            Some(false) => Self::Rejected,
        }
    }
}

impl From<bool> for ConnectionStatus {
    fn from(accepted: bool) -> Self {
        Self::from_flag(Some(accepted))
    }
}

impl Serialize for ConnectionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_flag().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConnectionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Self::from_flag)
    }
}
