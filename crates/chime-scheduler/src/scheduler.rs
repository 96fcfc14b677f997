// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery scheduler passes.
//!
//! [`DeliveryScheduler`] owns no timer. An external periodic trigger (the
//! `chime serve` interval loops) invokes one of two independent entry
//! points:
//! - **one-shot pass**: atomically pop every one-shot reminder that came
//!   due, then deliver. Removal precedes delivery, so a crash mid-pass
//!   loses the popped batch rather than double-delivering it.
//! - **recurring pass**: for every recurring reminder that came due,
//!   persist the recomputed `next_trigger` first, then deliver the elapsed
//!   occurrence. A crash between the two repeats the occurrence instead of
//!   losing the reminder.
//!
//! Same-kind passes are serialized through an async mutex; the two kinds
//! interleave freely since they touch disjoint collections.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use chime_core::traits::clock::Clock;
use chime_core::traits::messenger::Messenger;
use chime_core::traits::store::ReminderStore;
use chime_core::types::{Notification, ReminderCore};
use chime_core::ChimeError;

use crate::fallback::{self, DeliveryOutcome};

/// Counters from one pass, for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Due items the pass picked up.
    pub processed: usize,
    /// Items that went out on some route.
    pub delivered: usize,
    /// Items whose fallback chain exhausted.
    pub undelivered: usize,
    /// Items skipped on a per-item error (unreadable rule set, store
    /// failure mid-pass).
    pub failed: usize,
    /// Recurring items whose rule set just exhausted; they stay in storage
    /// as orphans until the purge pass.
    pub exhausted: usize,
}

/// Drives due reminders through the delivery fallback chain.
///
/// All collaborators are injected, so tests swap in mocks and a manual
/// clock wholesale.
pub struct DeliveryScheduler {
    store: Arc<dyn ReminderStore>,
    messenger: Arc<dyn Messenger>,
    clock: Arc<dyn Clock>,
    one_shot_pass: Mutex<()>,
    recurring_pass: Mutex<()>,
}

impl DeliveryScheduler {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        messenger: Arc<dyn Messenger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            messenger,
            clock,
            one_shot_pass: Mutex::new(()),
            recurring_pass: Mutex::new(()),
        }
    }

    /// One sweep over due one-shot reminders.
    ///
    /// Pops everything with `scheduled_at < now` in a single store call,
    /// then hands each item to the fallback chain. `Err` only when the
    /// store itself fails; delivery failures are counted, not propagated.
    pub async fn run_one_shot_pass(&self) -> Result<PassSummary, ChimeError> {
        let _guard = self.one_shot_pass.lock().await;
        let now = self.clock.now_utc();

        let due = self.store.pop_due_one_shot(now).await?;
        let mut summary = PassSummary::default();

        for core in due {
            summary.processed += 1;
            let notification = notification_for(&core, core.scheduled_at);
            self.dispatch(&core, &notification, &mut summary).await;
        }

        if summary.processed > 0 {
            info!(
                processed = summary.processed,
                delivered = summary.delivered,
                undelivered = summary.undelivered,
                "one-shot pass complete"
            );
        } else {
            debug!("one-shot pass found nothing due");
        }
        Ok(summary)
    }

    /// One sweep over due recurring reminders.
    ///
    /// For each item with `next_trigger < now`: recompute the successor
    /// occurrence, persist it (or `None` on exhaustion), and only then
    /// deliver the elapsed occurrence. Items with unreadable rule sets are
    /// logged and skipped untouched, never auto-orphaned.
    pub async fn run_recurring_pass(&self) -> Result<PassSummary, ChimeError> {
        let _guard = self.recurring_pass.lock().await;
        let now = self.clock.now_utc();

        let due = self.store.due_recurring(now).await?;
        let mut summary = PassSummary::default();

        for reminder in due {
            summary.processed += 1;
            let Some(elapsed) = reminder.next_trigger else {
                continue;
            };

            let next = match chime_recurrence::next_trigger(&reminder.rules, now) {
                Ok(next) => next,
                Err(e) => {
                    warn!(
                        id = %reminder.core.id,
                        error = %e,
                        "skipping reminder with unreadable rule set"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            // Advance before delivering.
            if let Err(e) = self.store.update_next_trigger(reminder.core.id, next).await {
                warn!(id = %reminder.core.id, error = %e, "failed to advance reminder");
                summary.failed += 1;
                continue;
            }
            if next.is_none() {
                summary.exhausted += 1;
                info!(
                    id = %reminder.core.id,
                    "rule set exhausted, row awaits the purge pass"
                );
            }

            let notification = notification_for(&reminder.core, elapsed);
            self.dispatch(&reminder.core, &notification, &mut summary).await;
        }

        if summary.processed > 0 {
            info!(
                processed = summary.processed,
                delivered = summary.delivered,
                undelivered = summary.undelivered,
                failed = summary.failed,
                exhausted = summary.exhausted,
                "recurring pass complete"
            );
        } else {
            debug!("recurring pass found nothing due");
        }
        Ok(summary)
    }

    async fn dispatch(
        &self,
        core: &ReminderCore,
        notification: &Notification,
        summary: &mut PassSummary,
    ) {
        match fallback::deliver(self.messenger.as_ref(), core, notification).await {
            DeliveryOutcome::Delivered(route) => {
                summary.delivered += 1;
                debug!(id = %core.id, route = ?route, "reminder delivered");
            }
            DeliveryOutcome::Undelivered => {
                summary.undelivered += 1;
            }
        }
    }
}

fn notification_for(core: &ReminderCore, due_at: chrono::DateTime<chrono::Utc>) -> Notification {
    Notification {
        message: core.message.clone(),
        author: core.author.clone(),
        due_at,
    }
}
