// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pinvault credential vault.
//!
//! This crate provides the error type, the common value types, and the
//! adapter traits for the collaborators the vault consumes: a durable
//! key-value store, an ephemeral key-value store, and an external key
//! validation service.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PinvaultError;
pub use types::{AdapterType, ConnectionStatus, HealthStatus, StoreEntries};

pub use traits::{KeyValidator, KeyValueStore, PluginAdapter};
