// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations for one-shot reminder rows.

use chime_core::types::{ChannelId, ReminderCore, ReminderId, UserId};
use chime_core::ChimeError;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

use super::{id_from_text, instant_from_epoch};

fn row_to_core(row: &rusqlite::Row<'_>) -> Result<ReminderCore, rusqlite::Error> {
    Ok(ReminderCore {
        id: id_from_text(0, row.get(0)?)?,
        author: UserId(row.get(1)?),
        channel: ChannelId(row.get(2)?),
        message: row.get(3)?,
        scheduled_at: instant_from_epoch(4, row.get(4)?)?,
        created_at: instant_from_epoch(5, row.get(5)?)?,
    })
}

/// Insert a new one-shot reminder row.
pub async fn insert(db: &Database, core: &ReminderCore) -> Result<(), ChimeError> {
    let core = core.clone();
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<()> {
            conn.execute(
                "INSERT INTO reminders (id, author, channel, message, scheduled_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    core.id.to_string(),
                    core.author.0,
                    core.channel.0,
                    core.message,
                    core.scheduled_at.timestamp(),
                    core.created_at.timestamp(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Atomically select and delete every row with `scheduled_at < now`.
///
/// Both statements run in one transaction on the single writer thread, so
/// the returned batch is exactly the set of deleted rows.
pub async fn pop_due(db: &Database, now: DateTime<Utc>) -> Result<Vec<ReminderCore>, ChimeError> {
    let cutoff = now.timestamp();
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<Vec<ReminderCore>> {
            let tx = conn.transaction()?;
            let due = {
                let mut stmt = tx.prepare(
                    "SELECT id, author, channel, message, scheduled_at, created_at
                     FROM reminders
                     WHERE scheduled_at < ?1
                     ORDER BY scheduled_at ASC, created_at ASC",
                )?;
                let rows = stmt.query_map(params![cutoff], row_to_core)?;
                rows.collect::<Result<Vec<_>, _>>()?
            };
            tx.execute(
                "DELETE FROM reminders WHERE scheduled_at < ?1",
                params![cutoff],
            )?;
            tx.commit()?;
            Ok(due)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one row by id. Unknown ids are a no-op.
pub async fn delete(db: &Database, id: ReminderId) -> Result<(), ChimeError> {
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<()> {
            conn.execute(
                "DELETE FROM reminders WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All one-shot reminders created by `author`, oldest first.
pub async fn list_by_author(
    db: &Database,
    author: &UserId,
) -> Result<Vec<ReminderCore>, ChimeError> {
    let author = author.0.clone();
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<Vec<ReminderCore>> {
            let mut stmt = conn.prepare(
                "SELECT id, author, channel, message, scheduled_at, created_at
                 FROM reminders
                 WHERE author = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![author], row_to_core)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}
