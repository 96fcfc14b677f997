// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chime list`: print an author's pending reminders.

use chime_config::model::ChimeConfig;
use chime_core::error::ChimeError;
use chime_core::traits::ReminderStore;
use chime_core::types::{ReminderKind, UserId};
use chime_storage::SqliteReminderStore;

pub async fn run_list(author: &str, config: &ChimeConfig) -> Result<(), ChimeError> {
    let store = SqliteReminderStore::open(&config.storage).await?;
    let reminders = store.list_by_author(&UserId(author.to_string())).await?;
    store.close().await?;

    if reminders.is_empty() {
        println!("no reminders for {author}");
        return Ok(());
    }
    for reminder in &reminders {
        println!("{}", describe(reminder));
    }
    Ok(())
}

/// One line per reminder: id, kind, next instant, message.
fn describe(reminder: &ReminderKind) -> String {
    match reminder {
        ReminderKind::OneShot(core) => format!(
            "{}  once       {}  {}",
            core.id,
            core.scheduled_at.to_rfc3339(),
            core.message
        ),
        ReminderKind::Recurring(recurring) => {
            let next = recurring
                .next_trigger
                .map_or_else(|| "exhausted".to_string(), |next| next.to_rfc3339());
            format!(
                "{}  recurring  {}  {}",
                recurring.core.id, next, recurring.core.message
            )
        }
    }
}
