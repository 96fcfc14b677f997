// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `ReminderStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use chime_config::model::StorageConfig;
use chime_core::traits::store::ReminderStore;
use chime_core::types::{RecurringReminder, ReminderCore, ReminderId, ReminderKind, UserId};
use chime_core::ChimeError;

use crate::database::Database;
use crate::queries;

/// SQLite-backed reminder store.
///
/// Wraps a [`Database`] handle and delegates every operation to the typed
/// query modules. One-shot and recurring reminders live in separate tables;
/// the two scheduler passes therefore never contend on rows.
pub struct SqliteReminderStore {
    db: Database,
}

impl SqliteReminderStore {
    /// Open the configured database, running migrations if needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, ChimeError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "reminder store opened");
        Ok(Self { db })
    }

    /// Checkpoint and close the underlying connection.
    pub async fn close(&self) -> Result<(), ChimeError> {
        self.db.close().await
    }

    /// The underlying database handle, for maintenance tooling.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ReminderStore for SqliteReminderStore {
    async fn add(&self, reminder: ReminderKind) -> Result<(), ChimeError> {
        match reminder {
            ReminderKind::OneShot(core) => queries::one_shot::insert(&self.db, &core).await,
            ReminderKind::Recurring(recurring) => {
                queries::recurring::insert(&self.db, &recurring).await
            }
        }
    }

    async fn pop_due_one_shot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderCore>, ChimeError> {
        queries::one_shot::pop_due(&self.db, now).await
    }

    async fn due_recurring(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringReminder>, ChimeError> {
        queries::recurring::due(&self.db, now).await
    }

    async fn update_next_trigger(
        &self,
        id: ReminderId,
        next: Option<DateTime<Utc>>,
    ) -> Result<(), ChimeError> {
        queries::recurring::update_next_trigger(&self.db, id, next).await
    }

    async fn delete(&self, id: ReminderId) -> Result<(), ChimeError> {
        // The id could belong to either table; deleting from both is the
        // same no-op-on-miss contract each query module already has.
        queries::one_shot::delete(&self.db, id).await?;
        queries::recurring::delete(&self.db, id).await
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<ReminderKind>, ChimeError> {
        let mut all: Vec<ReminderKind> = queries::one_shot::list_by_author(&self.db, author)
            .await?
            .into_iter()
            .map(ReminderKind::OneShot)
            .collect();
        all.extend(
            queries::recurring::list_by_author(&self.db, author)
                .await?
                .into_iter()
                .map(ReminderKind::Recurring),
        );
        Ok(all)
    }

    async fn purge_orphans(&self) -> Result<u64, ChimeError> {
        queries::recurring::purge_orphans(&self.db).await
    }
}
