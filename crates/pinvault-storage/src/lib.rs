// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store adapters for the Pinvault credential vault.
//!
//! - [`SqliteStore`]: the durable tier, a single-writer SQLite table.
//! - [`SessionFileStore`]: the ephemeral tier, a file in the user's runtime
//!   directory that the OS removes when the login session ends.
//! - [`MemoryStore`]: a process-scoped store for either tier.

pub mod database;
pub mod memory;
pub mod session_file;
pub mod sqlite;

pub use database::Database;
pub use memory::MemoryStore;
pub use session_file::SessionFileStore;
pub use sqlite::SqliteStore;
