// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault subcommands.
//!
//! Inputs (PINs, keys) are acquired by the caller so these functions can be
//! driven from tests without a terminal.

use std::io::IsTerminal;

use pinvault_core::ConnectionStatus;
use pinvault_vault::{mask_secret, Mode, ValidationOutcome, Vault, VaultError};
use secrecy::{ExposeSecret, SecretString};

use crate::host::CliError;

/// Whether to emit ANSI colors on stdout.
pub fn use_color(plain: bool) -> bool {
    !plain && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn print_success(message: &str, color: bool) {
    if color {
        use colored::Colorize;
        println!("{} {}", "✓".green(), message);
    } else {
        println!("[OK] {message}");
    }
}

pub fn print_warning(message: &str, color: bool) {
    if color {
        use colored::Colorize;
        println!("{} {}", "!".yellow(), message.yellow());
    } else {
        println!("[WARN] {message}");
    }
}

pub fn print_failure(error: &CliError, color: bool) {
    if color {
        use colored::Colorize;
        eprintln!("{} {}", "✗".red(), error.to_string().red());
    } else {
        eprintln!("[FAIL] {error}");
    }
}

/// `pinvault setup`
pub async fn run_setup(vault: &mut Vault, pin: SecretString, color: bool) -> Result<(), CliError> {
    let done = vault.set_new_pin(pin).await?;
    print_success(done.message(), color);
    Ok(())
}

/// `pinvault unlock`
pub async fn run_unlock(
    vault: &mut Vault,
    read_pin: impl FnOnce() -> Result<SecretString, VaultError>,
    color: bool,
) -> Result<(), CliError> {
    if vault.mode() == Mode::Unlocked {
        print_success("The vault is already unlocked for this session.", color);
        return Ok(());
    }
    ensure_unlocked(vault, read_pin).await?;
    print_success("Vault unlocked.", color);
    Ok(())
}

/// Unlocks a locked vault with a PIN from `read_pin`. An unlocked vault is
/// left alone and the PIN is not requested.
pub async fn ensure_unlocked(
    vault: &mut Vault,
    read_pin: impl FnOnce() -> Result<SecretString, VaultError>,
) -> Result<(), CliError> {
    match vault.mode() {
        Mode::Unlocked => Ok(()),
        Mode::Locked => {
            let pin = read_pin()?;
            vault.unlock(pin).await?;
            Ok(())
        }
        mode @ Mode::SettingUp => Err(VaultError::Precondition {
            operation: "unlock",
            mode,
        }
        .into()),
    }
}

/// `pinvault lock`
pub async fn run_lock(vault: &mut Vault, color: bool) -> Result<(), CliError> {
    let done = vault.lock().await?;
    print_success(done.message(), color);
    Ok(())
}

/// `pinvault set-key`
pub async fn run_set_key(
    vault: &mut Vault,
    key: SecretString,
    verify: bool,
    color: bool,
) -> Result<(), CliError> {
    let saved = vault.set_new_secret(key, verify).await?;
    match saved.value.validation {
        ValidationOutcome::Accepted | ValidationOutcome::Skipped => {
            print_success(saved.message(), color)
        }
        ValidationOutcome::Rejected | ValidationOutcome::Unavailable => {
            print_warning(saved.message(), color)
        }
    }
    Ok(())
}

/// `pinvault verify`
pub async fn run_verify(vault: &mut Vault, color: bool) -> Result<(), CliError> {
    if !vault.has_validator() {
        return Err(CliError::Usage(
            "Key validation is disabled in the configuration.".to_string(),
        ));
    }
    let checked = vault.check_connection().await?;
    match checked.value {
        ConnectionStatus::Confirmed => print_success(checked.message(), color),
        _ => print_warning(checked.message(), color),
    }
    Ok(())
}

/// `pinvault show`
pub fn run_show(vault: &Vault, reveal: bool) -> Result<(), CliError> {
    println!("{}", render_secret(vault, reveal)?);
    Ok(())
}

fn render_secret(vault: &Vault, reveal: bool) -> Result<String, CliError> {
    let secret = vault.secret().ok_or(VaultError::Precondition {
        operation: "show",
        mode: vault.mode(),
    })?;
    let secret = secret.expose_secret();
    Ok(if secret.is_empty() {
        "No API key saved yet.".to_string()
    } else if reveal {
        secret.to_string()
    } else {
        mask_secret(secret)
    })
}

/// Asks for confirmation on the terminal. Refuses when stdin is not a TTY.
pub fn confirm_reset() -> Result<bool, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Usage(
            "Refusing to reset without confirmation. Pass --yes to proceed.".to_string(),
        ));
    }
    eprint!("This erases the stored API key and PIN. Type 'reset' to continue: ");
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim() == "reset")
}

/// `pinvault reset`
pub async fn run_reset(vault: &mut Vault, color: bool) -> Result<(), CliError> {
    let done = vault.reset().await?;
    print_success(done.message(), color);
    Ok(())
}
