// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory reminder store for deterministic testing.
//!
//! `MemoryReminderStore` implements `ReminderStore` over a mutex-guarded
//! `Vec`, preserving insertion order so assertions on delivery order stay
//! stable.

use async_trait::async_trait;
use tokio::sync::Mutex;

use chime_core::traits::store::ReminderStore;
use chime_core::types::{RecurringReminder, ReminderCore, ReminderId, ReminderKind, UserId};
use chime_core::ChimeError;
use chrono::{DateTime, Utc};

/// A reminder store backed by process memory.
#[derive(Default)]
pub struct MemoryReminderStore {
    reminders: Mutex<Vec<ReminderKind>>,
}

impl MemoryReminderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total reminders currently held, both kinds.
    pub async fn len(&self) -> usize {
        self.reminders.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reminders.lock().await.is_empty()
    }

    /// Fetch a reminder by id for assertions.
    pub async fn get(&self, id: ReminderId) -> Option<ReminderKind> {
        self.reminders
            .lock()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }
}

#[async_trait]
impl ReminderStore for MemoryReminderStore {
    async fn add(&self, reminder: ReminderKind) -> Result<(), ChimeError> {
        self.reminders.lock().await.push(reminder);
        Ok(())
    }

    async fn pop_due_one_shot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderCore>, ChimeError> {
        let mut guard = self.reminders.lock().await;
        let mut due = Vec::new();
        guard.retain(|reminder| match reminder {
            ReminderKind::OneShot(core) if core.scheduled_at < now => {
                due.push(core.clone());
                false
            }
            _ => true,
        });
        Ok(due)
    }

    async fn due_recurring(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringReminder>, ChimeError> {
        let guard = self.reminders.lock().await;
        Ok(guard
            .iter()
            .filter_map(|reminder| match reminder {
                ReminderKind::Recurring(recurring)
                    if recurring.next_trigger.is_some_and(|t| t < now) =>
                {
                    Some(recurring.clone())
                }
                _ => None,
            })
            .collect())
    }

    async fn update_next_trigger(
        &self,
        id: ReminderId,
        next: Option<DateTime<Utc>>,
    ) -> Result<(), ChimeError> {
        let mut guard = self.reminders.lock().await;
        for reminder in guard.iter_mut() {
            if let ReminderKind::Recurring(recurring) = reminder {
                if recurring.core.id == id {
                    recurring.next_trigger = next;
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, id: ReminderId) -> Result<(), ChimeError> {
        self.reminders.lock().await.retain(|r| r.id() != id);
        Ok(())
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<ReminderKind>, ChimeError> {
        let guard = self.reminders.lock().await;
        Ok(guard
            .iter()
            .filter(|r| &r.core().author == author)
            .cloned()
            .collect())
    }

    async fn purge_orphans(&self) -> Result<u64, ChimeError> {
        let mut guard = self.reminders.lock().await;
        let before = guard.len();
        guard.retain(|reminder| {
            !matches!(
                reminder,
                ReminderKind::Recurring(recurring) if recurring.next_trigger.is_none()
            )
        });
        Ok((before - guard.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chime_core::types::{ChannelId, RuleSet};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    fn one_shot_at(when: DateTime<Utc>) -> ReminderKind {
        ReminderKind::OneShot(ReminderCore {
            id: ReminderId::new(),
            author: UserId("tester".to_string()),
            channel: ChannelId("general".to_string()),
            message: "stand up".to_string(),
            scheduled_at: when,
            created_at: when - Duration::minutes(5),
        })
    }

    fn recurring_next(next: Option<DateTime<Utc>>) -> ReminderKind {
        let anchor = now() - Duration::days(1);
        ReminderKind::Recurring(RecurringReminder {
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
                base_rules: vec![],
                exclusion_rules: vec![],
                extra_instants: vec![],
                excluded_instants: vec![],
            },
            next_trigger: next,
        })
    }

    #[tokio::test]
    async fn pop_takes_only_strictly_due_one_shots() {
        let store = MemoryReminderStore::new();
        store.add(one_shot_at(now() - Duration::minutes(1))).await.unwrap();
        store.add(one_shot_at(now())).await.unwrap();
        store.add(one_shot_at(now() + Duration::minutes(1))).await.unwrap();

        let due = store.pop_due_one_shot(now()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].scheduled_at, now() - Duration::minutes(1));

        // The due row is gone; the boundary and future rows remain.
        assert_eq!(store.len().await, 2);
        assert!(store.pop_due_one_shot(now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn due_recurring_leaves_rows_in_place() {
        let store = MemoryReminderStore::new();
        store
            .add(recurring_next(Some(now() - Duration::minutes(3))))
            .await
            .unwrap();
        store
            .add(recurring_next(Some(now() + Duration::hours(1))))
            .await
            .unwrap();
        store.add(recurring_next(None)).await.unwrap();

        let due = store.due_recurring(now()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn update_next_trigger_round_trips() {
        let store = MemoryReminderStore::new();
        let reminder = recurring_next(Some(now()));
        let id = reminder.id();
        store.add(reminder).await.unwrap();

        let later = now() + Duration::days(2);
        store.update_next_trigger(id, Some(later)).await.unwrap();
        match store.get(id).await.unwrap() {
            ReminderKind::Recurring(recurring) => {
                assert_eq!(recurring.next_trigger, Some(later));
            }
            ReminderKind::OneShot(_) => panic!("expected a recurring reminder"),
        }

        store.update_next_trigger(id, None).await.unwrap();
        assert_eq!(store.purge_orphans().await.unwrap(), 1);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryReminderStore::new();
        let reminder = one_shot_at(now());
        let id = reminder.id();
        store.add(reminder).await.unwrap();

        store.delete(id).await.unwrap();
        assert!(store.is_empty().await);
        store.delete(id).await.unwrap();
    }

    #[tokio::test]
    async fn list_by_author_filters_both_kinds() {
        let store = MemoryReminderStore::new();
        store.add(one_shot_at(now())).await.unwrap();
        store.add(recurring_next(Some(now()))).await.unwrap();

        let mut other = one_shot_at(now());
        if let ReminderKind::OneShot(core) = &mut other {
            core.author = UserId("someone-else".to_string());
        }
        store.add(other).await.unwrap();

        let mine = store.list_by_author(&UserId("tester".to_string())).await.unwrap();
        assert_eq!(mine.len(), 2);
    }
}
