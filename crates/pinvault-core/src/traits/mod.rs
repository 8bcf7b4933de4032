// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the vault's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so the vault can hold them as trait objects.

pub mod adapter;
pub mod store;
pub mod validator;

pub use adapter::PluginAdapter;
pub use store::KeyValueStore;
pub use validator::KeyValidator;
