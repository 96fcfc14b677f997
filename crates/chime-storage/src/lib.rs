// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Chime reminders.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for one-shot and recurring reminders. Instants are stored as
//! epoch seconds; rule sets as JSON text.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::SqliteReminderStore;
