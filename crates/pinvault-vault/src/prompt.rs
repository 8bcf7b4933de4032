// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PIN and API key acquisition via TTY prompt or environment variable.

use secrecy::SecretString;

use crate::error::VaultError;

/// Environment variable that supplies the PIN non-interactively.
pub const PIN_ENV_VAR: &str = "PINVAULT_PIN";

/// Environment variable that supplies the API key non-interactively.
pub const KEY_ENV_VAR: &str = "PINVAULT_KEY";

/// Get the PIN from `PINVAULT_PIN` or an interactive prompt.
pub fn read_pin() -> Result<SecretString, VaultError> {
    if let Some(pin) = non_empty(std::env::var(PIN_ENV_VAR).ok()) {
        return Ok(pin);
    }
    prompt_once("PIN: ", "PIN", PIN_ENV_VAR)
}

/// Get a new PIN, asking twice when prompting interactively.
pub fn read_new_pin() -> Result<SecretString, VaultError> {
    // Env var does not need confirmation.
    if let Some(pin) = non_empty(std::env::var(PIN_ENV_VAR).ok()) {
        return Ok(pin);
    }

    require_terminal("PIN", PIN_ENV_VAR)?;
    let first = read_hidden("New PIN: ", "PIN")?;
    let second = read_hidden("Confirm PIN: ", "PIN")?;
    if first != second {
        return Err(VaultError::Validation("PINs do not match".to_string()));
    }
    non_empty(Some(first))
        .ok_or_else(|| VaultError::Validation("empty PIN not allowed".to_string()))
}

/// Get the API key from `PINVAULT_KEY` or an interactive prompt.
pub fn read_secret() -> Result<SecretString, VaultError> {
    if let Some(key) = non_empty(std::env::var(KEY_ENV_VAR).ok()) {
        return Ok(key);
    }
    prompt_once("API key: ", "API key", KEY_ENV_VAR)
}

fn prompt_once(label: &str, what: &str, env_var: &str) -> Result<SecretString, VaultError> {
    require_terminal(what, env_var)?;
    let value = read_hidden(label, what)?;
    non_empty(Some(value))
        .ok_or_else(|| VaultError::Validation(format!("empty {what} not allowed")))
}

fn require_terminal(what: &str, env_var: &str) -> Result<(), VaultError> {
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        Ok(())
    } else {
        Err(VaultError::Validation(format!(
            "No {what} provided. Set {env_var} or run interactively."
        )))
    }
}

fn read_hidden(label: &str, what: &str) -> Result<String, VaultError> {
    eprint!("{label}");
    rpassword::read_password()
        .map_err(|e| VaultError::Validation(format!("failed to read {what}: {e}")))
}

fn non_empty(value: Option<String>) -> Option<SecretString> {
    value.filter(|v| !v.is_empty()).map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn non_empty_accepts_value() {
        let pin = non_empty(Some("1234".into())).unwrap();
        assert_eq!(pin.expose_secret(), "1234");
    }

    #[test]
    fn empty_and_missing_values_are_ignored() {
        assert!(non_empty(Some(String::new())).is_none());
        assert!(non_empty(None).is_none());
    }
}
