// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pinvault status` command implementation.
//!
//! Reports the vault mode, the last validation result, and the health of
//! every wired adapter. With `--json`, prints structured output for scripts.

use pinvault_core::{HealthStatus, PluginAdapter};
use serde::Serialize;

use crate::host::{CliError, Session};

/// Health of one adapter.
#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub role: String,
    pub healthy: bool,
    pub detail: Option<String>,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub mode: String,
    pub connection: String,
    pub has_key: bool,
    pub unsaved_changes: bool,
    pub adapters: Vec<AdapterHealth>,
}

/// Run the `pinvault status` command.
pub async fn run_status(session: &Session, json: bool, color: bool) -> Result<(), CliError> {
    let response = collect(session).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_status(&response, color);
    }
    Ok(())
}

async fn collect(session: &Session) -> StatusResponse {
    let vault = &session.vault;
    let gateway = vault.gateway();

    let mut adapters = vec![
        check(gateway.durable().as_ref()).await,
        check(gateway.ephemeral().as_ref()).await,
    ];
    if let Some(validator) = vault.validator() {
        adapters.push(check(validator).await);
    }

    StatusResponse {
        mode: vault.mode().to_string(),
        connection: vault.connection_status().to_string(),
        has_key: vault.has_stored_secret(),
        unsaved_changes: vault.is_secret_dirty(),
        adapters,
    }
}

async fn check<A: PluginAdapter + ?Sized>(adapter: &A) -> AdapterHealth {
    let (healthy, detail) = match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => (true, None),
        Ok(HealthStatus::Degraded(msg)) => (true, Some(msg)),
        Ok(HealthStatus::Unhealthy(msg)) => (false, Some(msg)),
        Err(e) => (false, Some(e.to_string())),
    };
    AdapterHealth {
        name: adapter.name().to_string(),
        role: adapter.adapter_type().to_string(),
        healthy,
        detail,
    }
}

/// Print status with optional colors.
fn print_status(status: &StatusResponse, color: bool) {
    println!();
    println!("  pinvault status");
    println!("  {}", "-".repeat(35));
    println!("    Vault:      {}", status.mode);
    println!("    API key:    {}", if status.has_key { "stored" } else { "none" });
    println!("    Connection: {}", status.connection);
    println!();

    for adapter in &status.adapters {
        let label = format!("{} ({})", adapter.name, adapter.role);
        let detail = adapter
            .detail
            .as_deref()
            .map(|d| format!(" - {d}"))
            .unwrap_or_default();
        if color {
            use colored::Colorize;
            let symbol = if adapter.healthy { "✓".green() } else { "✗".red() };
            println!("    {symbol} {label}{detail}");
        } else {
            let tag = if adapter.healthy { "[OK]" } else { "[FAIL]" };
            println!("    {tag} {label}{detail}");
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pinvault_core::KeyValidator;
    use pinvault_test_utils::{MockStore, MockValidator};
    use pinvault_vault::VaultSettings;

    use super::*;

    #[tokio::test]
    async fn collects_mode_and_adapter_health() {
        let durable = Arc::new(MockStore::durable());
        durable.fail_writes(true);
        let validator: Arc<dyn KeyValidator> = Arc::new(MockValidator::accepting());
        let session = Session::assemble(
            durable,
            Arc::new(MockStore::ephemeral()),
            Some(validator),
            VaultSettings::default(),
        )
        .await
        .unwrap();

        let status = collect(&session).await;
        assert_eq!(status.mode, "setting up");
        assert_eq!(status.connection, "unknown");
        assert!(!status.has_key);
        assert_eq!(status.adapters.len(), 3);
        assert_eq!(status.adapters[0].role, "durable-store");
        assert!(status.adapters[0].detail.is_some());
        assert_eq!(status.adapters[2].name, "mock-validator");
    }

    #[test]
    fn status_response_serializes() {
        let resp = StatusResponse {
            mode: "locked".to_string(),
            connection: "confirmed".to_string(),
            has_key: true,
            unsaved_changes: false,
            adapters: vec![AdapterHealth {
                name: "sqlite".to_string(),
                role: "durable-store".to_string(),
                healthy: true,
                detail: None,
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"mode\":\"locked\""));
        assert!(json.contains("\"healthy\":true"));
    }
}
