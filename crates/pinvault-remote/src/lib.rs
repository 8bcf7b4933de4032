// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote collaborators for the Pinvault vault.

pub mod validator;

pub use validator::HttpKeyValidator;
