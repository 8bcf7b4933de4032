// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store contract shared by the durable and ephemeral tiers.

use async_trait::async_trait;

use crate::error::PinvaultError;
use crate::traits::adapter::PluginAdapter;
use crate::types::StoreEntries;

/// A flat key-value store holding JSON values.
///
/// There are no transactions: each [`set`](Self::set) is last-write-wins.
/// Durable implementations may rate-limit writes, so callers coalesce
/// bursts before writing.
#[async_trait]
pub trait KeyValueStore: PluginAdapter {
    /// Reads the given keys.
    ///
    /// Every requested key appears in the result; keys with no stored value
    /// map to `null`.
    async fn get(&self, keys: &[&str]) -> Result<StoreEntries, PinvaultError>;

    /// Writes the given entries. A `null` value removes the key.
    async fn set(&self, entries: StoreEntries) -> Result<(), PinvaultError>;
}
