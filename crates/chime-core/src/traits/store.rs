// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for reminder storage backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ChimeError;
use crate::types::{RecurringReminder, ReminderCore, ReminderId, ReminderKind, UserId};

/// Durable owner of all reminders.
///
/// The scheduler never holds a reminder beyond one processing pass; every
/// lifecycle transition goes through this trait.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Persists a new reminder of either kind.
    async fn add(&self, reminder: ReminderKind) -> Result<(), ChimeError>;

    /// Atomically fetches and deletes every one-shot reminder with
    /// `scheduled_at < now`.
    ///
    /// Removal precedes delivery: a crash after this call loses the popped
    /// batch rather than double-delivering it.
    async fn pop_due_one_shot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderCore>, ChimeError>;

    /// Returns recurring reminders with `next_trigger < now`. Rows are not
    /// modified; the scheduler advances them via
    /// [`ReminderStore::update_next_trigger`].
    async fn due_recurring(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringReminder>, ChimeError>;

    /// Persists a recomputed `next_trigger`, or `None` when the rule set is
    /// exhausted.
    async fn update_next_trigger(
        &self,
        id: ReminderId,
        next: Option<DateTime<Utc>>,
    ) -> Result<(), ChimeError>;

    /// Deletes a reminder of either kind. Deleting an unknown id is not an
    /// error.
    async fn delete(&self, id: ReminderId) -> Result<(), ChimeError>;

    /// Returns every reminder created by `author`, both kinds.
    async fn list_by_author(&self, author: &UserId) -> Result<Vec<ReminderKind>, ChimeError>;

    /// Deletes exhausted recurring reminders (`next_trigger` is `None`) and
    /// returns how many rows were removed.
    async fn purge_orphans(&self) -> Result<u64, ChimeError>;
}
