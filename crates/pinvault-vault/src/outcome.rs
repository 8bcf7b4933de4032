// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operation results carrying a user-facing confirmation message.

use std::borrow::Cow;

use crate::error::VaultError;

/// Successful outcome of a vault operation: a value plus a short message
/// suitable for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<T = ()> {
    pub value: T,
    pub message: Cow<'static, str>,
}

impl<T> Confirmation<T> {
    pub fn new(value: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl Confirmation<()> {
    pub fn done(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new((), message)
    }
}

/// Result type returned by every vault operation.
pub type Outcome<T = ()> = Result<Confirmation<T>, VaultError>;
