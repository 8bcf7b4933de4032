// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `pinvault` binary.
//!
//! Each test writes its own config pointing at a temp database with a
//! process-scoped session store, so every invocation starts locked.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

struct Env {
    _dir: tempfile::TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("vault.db");
        let config = dir.path().join("pinvault.toml");
        std::fs::write(
            &config,
            format!(
                "[vault]\nkdf_iterations = 100000\n\n\
                 [storage]\ndatabase_path = {db:?}\nsession_store = \"memory\"\n\n\
                 [validation]\nenabled = false\n",
                db = db.to_string_lossy()
            ),
        )
        .unwrap();
        Self { _dir: dir, config }
    }

    fn run(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        run_with_config(&self.config, args, env)
    }
}

fn run_with_config(config: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pinvault"));
    cmd.arg("--plain").arg("--config").arg(config).args(args);
    cmd.env_remove("PINVAULT_PIN").env_remove("PINVAULT_KEY");
    cmd.env("RUST_LOG", "off");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn status_json(env: &Env) -> serde_json::Value {
    let output = env.run(&["status", "--json"], &[]);
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn full_lifecycle_through_cli() {
    let env = Env::new();

    let status = status_json(&env);
    assert_eq!(status["mode"], "setting up");
    assert_eq!(status["has_key"], false);

    let out = env.run(&["setup"], &[("PINVAULT_PIN", "2580")]);
    assert!(out.status.success(), "{out:?}");

    let status = status_json(&env);
    assert_eq!(status["mode"], "locked");
    assert_eq!(status["has_key"], true);

    let out = env.run(
        &["set-key", "--no-verify"],
        &[("PINVAULT_PIN", "2580"), ("PINVAULT_KEY", "sk-e2e-abcdefgh")],
    );
    assert!(out.status.success(), "{out:?}");

    let out = env.run(&["show"], &[("PINVAULT_PIN", "2580")]);
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout(&out).trim(), "sk-e...efgh");

    let out = env.run(&["show", "--reveal"], &[("PINVAULT_PIN", "2580")]);
    assert_eq!(stdout(&out).trim(), "sk-e2e-abcdefgh");

    let out = env.run(&["reset", "--yes"], &[]);
    assert!(out.status.success(), "{out:?}");
    assert_eq!(status_json(&env)["mode"], "setting up");
}

#[test]
fn wrong_pin_fails_with_message() {
    let env = Env::new();
    env.run(&["setup"], &[("PINVAULT_PIN", "2580")]);

    let out = env.run(&["show"], &[("PINVAULT_PIN", "0000")]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("incorrect PIN"));
}

#[test]
fn reset_without_confirmation_is_refused_off_tty() {
    let env = Env::new();
    env.run(&["setup"], &[("PINVAULT_PIN", "2580")]);

    let out = env.run(&["reset"], &[]);
    assert!(!out.status.success());
    assert_eq!(status_json(&env)["has_key"], true);
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[vault]\nkdf_iterations = 10\n").unwrap();

    let out = run_with_config(&config, &["status"], &[]);
    assert!(!out.status.success());
}
