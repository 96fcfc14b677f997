// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations for recurring reminder rows.
//!
//! The full `RuleSet` rides in a JSON TEXT column; `next_trigger` is a
//! nullable epoch-seconds column, NULL marking an exhausted (orphaned) row.

use chime_core::types::{ChannelId, RecurringReminder, ReminderCore, ReminderId, RuleSet, UserId};
use chime_core::ChimeError;
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

use super::{id_from_text, instant_from_epoch};

fn row_to_recurring(row: &rusqlite::Row<'_>) -> Result<RecurringReminder, rusqlite::Error> {
    let rules_json: String = row.get(6)?;
    let rules: RuleSet = serde_json::from_str(&rules_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let next_trigger = match row.get::<_, Option<i64>>(7)? {
        Some(secs) => Some(instant_from_epoch(7, secs)?),
        None => None,
    };
    Ok(RecurringReminder {
        core: ReminderCore {
            id: id_from_text(0, row.get(0)?)?,
            author: UserId(row.get(1)?),
            channel: ChannelId(row.get(2)?),
            message: row.get(3)?,
            scheduled_at: instant_from_epoch(4, row.get(4)?)?,
            created_at: instant_from_epoch(5, row.get(5)?)?,
        },
        rules,
        next_trigger,
    })
}

/// Insert a new recurring reminder row.
pub async fn insert(db: &Database, reminder: &RecurringReminder) -> Result<(), ChimeError> {
    let rules_json = serde_json::to_string(&reminder.rules).map_err(|e| ChimeError::Storage {
        source: Box::new(e),
    })?;
    let core = reminder.core.clone();
    let next = reminder.next_trigger.map(|t| t.timestamp());
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<()> {
            conn.execute(
                "INSERT INTO recurring_reminders
                     (id, author, channel, message, scheduled_at, created_at, rules, next_trigger)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    core.id.to_string(),
                    core.author.0,
                    core.channel.0,
                    core.message,
                    core.scheduled_at.timestamp(),
                    core.created_at.timestamp(),
                    rules_json,
                    next,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Rows with a non-null `next_trigger` strictly before `now`, soonest
/// first. Rows are returned untouched; advancement is a separate update.
pub async fn due(db: &Database, now: DateTime<Utc>) -> Result<Vec<RecurringReminder>, ChimeError> {
    let cutoff = now.timestamp();
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<Vec<RecurringReminder>> {
            let mut stmt = conn.prepare(
                "SELECT id, author, channel, message, scheduled_at, created_at, rules, next_trigger
                 FROM recurring_reminders
                 WHERE next_trigger IS NOT NULL AND next_trigger < ?1
                 ORDER BY next_trigger ASC",
            )?;
            let rows = stmt.query_map(params![cutoff], row_to_recurring)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Persist a recomputed trigger, or NULL when the rule set is exhausted.
pub async fn update_next_trigger(
    db: &Database,
    id: ReminderId,
    next: Option<DateTime<Utc>>,
) -> Result<(), ChimeError> {
    let next = next.map(|t| t.timestamp());
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<()> {
            conn.execute(
                "UPDATE recurring_reminders SET next_trigger = ?2 WHERE id = ?1",
                params![id.to_string(), next],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one row by id. Unknown ids are a no-op.
pub async fn delete(db: &Database, id: ReminderId) -> Result<(), ChimeError> {
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<()> {
            conn.execute(
                "DELETE FROM recurring_reminders WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All recurring reminders created by `author`, oldest first.
pub async fn list_by_author(
    db: &Database,
    author: &UserId,
) -> Result<Vec<RecurringReminder>, ChimeError> {
    let author = author.0.clone();
    db.connection()
        .call(move |conn| -> tokio_rusqlite::Result<Vec<RecurringReminder>> {
            let mut stmt = conn.prepare(
                "SELECT id, author, channel, message, scheduled_at, created_at, rules, next_trigger
                 FROM recurring_reminders
                 WHERE author = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![author], row_to_recurring)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every exhausted row and return how many went.
pub async fn purge_orphans(db: &Database) -> Result<u64, ChimeError> {
    db.connection()
        .call(|conn| -> tokio_rusqlite::Result<u64> {
            let removed = conn.execute(
                "DELETE FROM recurring_reminders WHERE next_trigger IS NULL",
                [],
            )?;
            Ok(removed as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use chime_core::types::RecurrenceRule;
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    use super::*;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    fn reminder(next: Option<DateTime<Utc>>) -> RecurringReminder {
        let anchor = now() - Duration::days(7);
        RecurringReminder {
            core: ReminderCore {
                id: ReminderId::new(),
                author: UserId("tester".to_string()),
                channel: ChannelId("general".to_string()),
                message: "water the plants".to_string(),
                scheduled_at: anchor,
                created_at: anchor,
            },
            rules: RuleSet {
                anchor,
                base_rules: vec![RecurrenceRule("FREQ=DAILY".to_string())],
                exclusion_rules: vec![],
                extra_instants: vec![anchor + Duration::days(100)],
                excluded_instants: vec![anchor + Duration::days(2)],
            },
            next_trigger: next,
        }
    }

    #[tokio::test]
    async fn insert_and_due_round_trip_the_full_rule_set() {
        let (db, _dir) = setup_db().await;
        let stored = reminder(Some(now() - Duration::minutes(1)));
        insert(&db, &stored).await.unwrap();

        let due_rows = due(&db, now()).await.unwrap();
        assert_eq!(due_rows, vec![stored]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn due_skips_future_and_orphaned_rows() {
        let (db, _dir) = setup_db().await;
        insert(&db, &reminder(Some(now() - Duration::minutes(1)))).await.unwrap();
        insert(&db, &reminder(Some(now() + Duration::hours(1)))).await.unwrap();
        insert(&db, &reminder(None)).await.unwrap();

        let due_rows = due(&db, now()).await.unwrap();
        assert_eq!(due_rows.len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_next_trigger_advances_and_orphans() {
        let (db, _dir) = setup_db().await;
        let stored = reminder(Some(now() - Duration::minutes(1)));
        let id = stored.core.id;
        insert(&db, &stored).await.unwrap();

        update_next_trigger(&db, id, Some(now() + Duration::days(1))).await.unwrap();
        assert!(due(&db, now()).await.unwrap().is_empty());

        update_next_trigger(&db, id, None).await.unwrap();
        assert_eq!(purge_orphans(&db).await.unwrap(), 1);
        assert!(list_by_author(&db, &UserId("tester".to_string()))
            .await
            .unwrap()
            .is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn purge_leaves_live_rows_alone() {
        let (db, _dir) = setup_db().await;
        insert(&db, &reminder(Some(now()))).await.unwrap();
        insert(&db, &reminder(None)).await.unwrap();
        insert(&db, &reminder(None)).await.unwrap();

        assert_eq!(purge_orphans(&db).await.unwrap(), 2);
        assert_eq!(purge_orphans(&db).await.unwrap(), 0);

        let left = list_by_author(&db, &UserId("tester".to_string())).await.unwrap();
        assert_eq!(left.len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_one_row() {
        let (db, _dir) = setup_db().await;
        let stored = reminder(Some(now()));
        insert(&db, &stored).await.unwrap();

        delete(&db, stored.core.id).await.unwrap();
        delete(&db, ReminderId::new()).await.unwrap();

        assert!(list_by_author(&db, &UserId("tester".to_string()))
            .await
            .unwrap()
            .is_empty());
        db.close().await.unwrap();
    }
}
