// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External key validation contract.

use async_trait::async_trait;

use crate::error::PinvaultError;
use crate::traits::adapter::PluginAdapter;

/// Confirms whether a secret is accepted by the remote system it belongs to.
///
/// Best-effort: an `Err` means the service could not answer and says nothing
/// about the secret itself.
#[async_trait]
pub trait KeyValidator: PluginAdapter {
    /// Returns `Ok(true)` if the remote system accepts `secret`, `Ok(false)`
    /// if it rejects it.
    async fn validate(&self, secret: &str) -> Result<bool, PinvaultError>;
}
