// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pinvault - a PIN-gated API key vault.
//!
//! This is the binary entry point. Each invocation resumes the current
//! session from the ephemeral store, runs one vault operation, and exits.

mod commands;
mod host;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pinvault_vault::prompt;

/// Pinvault - keep an API key encrypted behind a PIN.
#[derive(Parser, Debug)]
#[command(name = "pinvault", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show vault mode, connection status, and adapter health.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Choose the PIN for a new vault.
    Setup,
    /// Unlock the vault for this session.
    Unlock,
    /// Lock the vault and forget the session PIN.
    Lock,
    /// Encrypt and store a new API key.
    SetKey {
        /// Skip checking the key against the validation endpoint.
        #[arg(long)]
        no_verify: bool,
    },
    /// Check the stored API key against the validation endpoint.
    Verify,
    /// Show the stored API key (masked unless --reveal).
    Show {
        #[arg(long)]
        reveal: bool,
    },
    /// Erase the stored key and PIN.
    Reset {
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pinvault_config::load_and_validate_path(path),
        None => pinvault_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pinvault_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let color = commands::use_color(cli.plain);
    if let Err(e) = run(cli.command, &config, color).await {
        commands::print_failure(&e, color);
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    config: &pinvault_config::PinvaultConfig,
    color: bool,
) -> Result<(), host::CliError> {
    let mut session = host::open(config).await?;

    match command {
        Commands::Status { json } => status::run_status(&session, json, color).await,
        Commands::Setup => {
            let pin = prompt::read_new_pin()?;
            commands::run_setup(&mut session.vault, pin, color).await
        }
        Commands::Unlock => commands::run_unlock(&mut session.vault, prompt::read_pin, color).await,
        Commands::Lock => commands::run_lock(&mut session.vault, color).await,
        Commands::SetKey { no_verify } => {
            commands::ensure_unlocked(&mut session.vault, prompt::read_pin).await?;
            let key = prompt::read_secret()?;
            commands::run_set_key(&mut session.vault, key, !no_verify, color).await
        }
        Commands::Verify => {
            commands::ensure_unlocked(&mut session.vault, prompt::read_pin).await?;
            commands::run_verify(&mut session.vault, color).await
        }
        Commands::Show { reveal } => {
            commands::ensure_unlocked(&mut session.vault, prompt::read_pin).await?;
            commands::run_show(&session.vault, reveal)
        }
        Commands::Reset { yes } => {
            if !yes && !commands::confirm_reset()? {
                println!("Reset cancelled.");
                return Ok(());
            }
            commands::run_reset(&mut session.vault, color).await
        }
    }
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` overrides the configured level. Logs go to stderr so command
/// output on stdout stays scriptable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pinvault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
