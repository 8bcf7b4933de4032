// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP validation of an API key.
//!
//! Sends `GET <endpoint>` with `Authorization: Bearer <key>` and reads the
//! verdict off the status code: any 2xx accepts the key, 401 and 403 reject
//! it, and everything else (including transport failures) means the service
//! could not answer.

use std::time::Duration;

use async_trait::async_trait;
use pinvault_config::model::ValidationConfig;
use pinvault_core::{AdapterType, HealthStatus, KeyValidator, PinvaultError, PluginAdapter};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Pause before retrying a transient failure.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Validates API keys against an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpKeyValidator {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl HttpKeyValidator {
    /// Creates a validator for the configured endpoint.
    pub fn new(config: &ValidationConfig) -> Result<Self, PinvaultError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PinvaultError::Validator {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            max_retries: 1,
        })
    }

    /// Overrides the endpoint (for testing with wiremock).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn request(&self, secret: &str) -> Result<StatusCode, PinvaultError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(secret)
            .send()
            .await
            .map_err(|e| PinvaultError::Validator {
                message: format!("HTTP request failed: {}", e.without_url()),
                source: None,
            })?;
        Ok(response.status())
    }
}

#[async_trait]
impl PluginAdapter for HttpKeyValidator {
    fn name(&self) -> &str {
        "http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Validator
    }

    /// Any HTTP answer from the endpoint counts as healthy; only a transport
    /// failure does not.
    async fn health_check(&self) -> Result<HealthStatus, PinvaultError> {
        match self.client.get(&self.endpoint).send().await {
            Ok(response) if response.status().is_server_error() => Ok(HealthStatus::Degraded(
                format!("endpoint returned {}", response.status()),
            )),
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "endpoint unreachable: {}",
                e.without_url()
            ))),
        }
    }
}

#[async_trait]
impl KeyValidator for HttpKeyValidator {
    async fn validate(&self, secret: &str) -> Result<bool, PinvaultError> {
        let mut attempt = 0;
        loop {
            let status = self.request(secret).await?;
            debug!(status = %status, attempt, "validation response received");

            if status.is_success() {
                return Ok(true);
            }
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Ok(false);
            }
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient validation error, will retry");
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
            return Err(PinvaultError::Validator {
                message: format!("validation endpoint returned {status}"),
                source: None,
            });
        }
    }
}

/// Returns true for HTTP status codes that indicate a transient error.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
    )
}
