// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all collaborators must implement.

use async_trait::async_trait;

use crate::error::PinvaultError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Pinvault adapters.
///
/// Provides identity and health reporting so the host can describe which
/// store or validator is wired in without knowing its concrete type.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the role this adapter fills.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, PinvaultError>;
}
