// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pinvault integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! a real database, session directory, or network.
//!
//! # Components
//!
//! - [`MockStore`] - Key-value store that records writes and can fail on demand
//! - [`MockValidator`] - Key validator with a scripted verdict

pub mod mock_store;
pub mod mock_validator;

pub use mock_store::MockStore;
pub use mock_validator::{MockValidator, ValidatorBehavior};
