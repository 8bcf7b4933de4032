// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ephemeral [`KeyValueStore`] kept in the user's runtime directory.
//!
//! `$XDG_RUNTIME_DIR` is a per-user tmpfs that the OS removes when the
//! user's last session ends, which gives the "erased when the host session
//! ends" lifetime the session PIN needs while still letting separate CLI
//! invocations share it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pinvault_core::{
    AdapterType, HealthStatus, KeyValueStore, PinvaultError, PluginAdapter, StoreEntries,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File name inside `<runtime_dir>/pinvault/`.
const SESSION_FILE_NAME: &str = "session.json";

/// A JSON object on disk, rewritten whole on every `set`.
#[derive(Debug)]
pub struct SessionFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl SessionFileStore {
    /// A store at `<runtime_dir>/pinvault/session.json`, or `None` when the
    /// platform has no runtime directory.
    pub fn in_runtime_dir() -> Option<Self> {
        dirs::runtime_dir().map(|dir| Self::at(dir.join("pinvault").join(SESSION_FILE_NAME)))
    }

    /// A store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file as a JSON object.
    ///
    /// `Ok(None)` means the file exists but is not a JSON object.
    async fn read_object(&self) -> Result<Option<StoreEntries>, PinvaultError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Some(StoreEntries::new()));
            }
            Err(e) => return Err(PinvaultError::storage(e)),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            _ => {
                warn!(path = %self.path.display(), "session file is not a JSON object");
                Ok(None)
            }
        }
    }

    async fn write_object(&self, map: &StoreEntries) -> Result<(), PinvaultError> {
        if map.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    Err(PinvaultError::storage(e))
                }
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(PinvaultError::storage)?;
            restrict_permissions(parent, 0o700).await?;
        }

        let body = serde_json::to_vec(map).map_err(PinvaultError::storage)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(PinvaultError::storage)?;
        restrict_permissions(&tmp, 0o600).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(PinvaultError::storage)?;
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path, mode: u32) -> Result<(), PinvaultError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(PinvaultError::storage)
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path, _mode: u32) -> Result<(), PinvaultError> {
    Ok(())
}

#[async_trait]
impl PluginAdapter for SessionFileStore {
    fn name(&self) -> &str {
        "session-file"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EphemeralStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PinvaultError> {
        match self.path.parent() {
            Some(parent) if !parent.exists() => match parent.parent() {
                Some(runtime) if runtime.exists() => Ok(HealthStatus::Healthy),
                _ => Ok(HealthStatus::Unhealthy(format!(
                    "runtime directory for {} does not exist",
                    self.path.display()
                ))),
            },
            _ => Ok(HealthStatus::Healthy),
        }
    }
}

#[async_trait]
impl KeyValueStore for SessionFileStore {
    /// A corrupt file yields an empty map (every key missing), which the
    /// gateway treats as corruption and heals by rewriting defaults.
    async fn get(&self, keys: &[&str]) -> Result<StoreEntries, PinvaultError> {
        let Some(map) = self.read_object().await? else {
            return Ok(StoreEntries::new());
        };
        Ok(keys
            .iter()
            .map(|k| (k.to_string(), map.get(*k).cloned().unwrap_or(Value::Null)))
            .collect())
    }

    async fn set(&self, updates: StoreEntries) -> Result<(), PinvaultError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_object().await?.unwrap_or_default();
        for (key, value) in updates {
            if value.is_null() {
                map.remove(&key);
            } else {
                map.insert(key, value);
            }
        }
        self.write_object(&map).await?;
        debug!(path = %self.path.display(), keys = map.len(), "session file written");
        Ok(())
    }
}
