// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock key validator with a scripted verdict.

use async_trait::async_trait;
use tokio::sync::Mutex;

use pinvault_core::{AdapterType, HealthStatus, KeyValidator, PinvaultError, PluginAdapter};

/// How a [`MockValidator`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorBehavior {
    Accept,
    Reject,
    /// Fail as if the service were unreachable.
    NetworkError,
    /// Never answer.
    Hang,
}

/// A validator that answers according to its configured behavior and
/// remembers every secret it was asked about.
pub struct MockValidator {
    behavior: Mutex<ValidatorBehavior>,
    seen: Mutex<Vec<String>>,
}

impl MockValidator {
    pub fn new(behavior: ValidatorBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(ValidatorBehavior::Accept)
    }

    pub fn rejecting() -> Self {
        Self::new(ValidatorBehavior::Reject)
    }

    pub fn failing() -> Self {
        Self::new(ValidatorBehavior::NetworkError)
    }

    pub fn hanging() -> Self {
        Self::new(ValidatorBehavior::Hang)
    }

    /// Change the verdict for subsequent calls.
    pub async fn set_behavior(&self, behavior: ValidatorBehavior) {
        *self.behavior.lock().await = behavior;
    }

    /// Secrets passed to `validate`, oldest first.
    pub async fn seen(&self) -> Vec<String> {
        self.seen.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.seen.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockValidator {
    fn name(&self) -> &str {
        "mock-validator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Validator
    }

    async fn health_check(&self) -> Result<HealthStatus, PinvaultError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl KeyValidator for MockValidator {
    async fn validate(&self, secret: &str) -> Result<bool, PinvaultError> {
        self.seen.lock().await.push(secret.to_string());
        let behavior = *self.behavior.lock().await;
        match behavior {
            ValidatorBehavior::Accept => Ok(true),
            ValidatorBehavior::Reject => Ok(false),
            ValidatorBehavior::NetworkError => Err(PinvaultError::Validator {
                message: "mock network error".to_string(),
                source: None,
            }),
            ValidatorBehavior::Hang => std::future::pending::<Result<bool, PinvaultError>>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn verdicts_follow_behavior() {
        let validator = MockValidator::accepting();
        assert!(validator.validate("k").await.unwrap());

        validator.set_behavior(ValidatorBehavior::Reject).await;
        assert!(!validator.validate("k").await.unwrap());

        validator.set_behavior(ValidatorBehavior::NetworkError).await;
        assert!(validator.validate("k").await.is_err());

        assert_eq!(validator.call_count().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_validator_never_answers() {
        let validator = MockValidator::hanging();
        let result = tokio::time::timeout(Duration::from_secs(5), validator.validate("k")).await;
        assert!(result.is_err());
    }
}
