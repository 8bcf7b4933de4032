// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup and schema creation.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use pinvault_core::PinvaultError;
use tracing::debug;

/// Schema for the durable key-value table. Values are JSON text.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// A single SQLite connection owned by a background thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// Parent directories are created as needed. `":memory:"` opens a
    /// private in-memory database.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, PinvaultError> {
        let conn = if path == ":memory:" {
            tokio_rusqlite::Connection::open_in_memory()
                .await
                .map_err(map_tr_err)?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(PinvaultError::storage)?;
                }
            }
            tokio_rusqlite::Connection::open(path)
                .await
                .map_err(map_tr_err)?
        };

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch("PRAGMA busy_timeout = 5000; PRAGMA synchronous = NORMAL;")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Convert tokio-rusqlite errors to `PinvaultError::Storage`.
pub(crate) fn map_tr_err<E: std::fmt::Display>(e: E) -> PinvaultError {
    PinvaultError::storage(format!("database error: {e}"))
}
