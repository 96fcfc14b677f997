// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use chime_core::ChimeError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Handle to an open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Database, ChimeError> {
        let conn = Connection::open(path).await.map_err(map_tr_err)?;

        conn.call(move |conn| -> tokio_rusqlite::Result<()> {
            if wal_mode {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;",
                )?;
            }
            conn.execute_batch(
                "PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;",
            )?;
            crate::migrations::run_migrations(conn)
                .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Database { conn })
    }

    /// The shared connection handle. Cloning is cheap; every clone talks to
    /// the same background thread.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and shut down the connection's background thread.
    pub async fn close(&self) -> Result<(), ChimeError> {
        self.conn
            .call(|conn| -> tokio_rusqlite::Result<()> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.clone().close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

/// Fold a tokio-rusqlite error into the framework storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ChimeError {
    ChimeError::Storage {
        source: Box::new(e),
    }
}
