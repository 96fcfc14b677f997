// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chime add`: create a reminder from a temporal expression.
//!
//! Console stand-in for a chat front end: the expression goes through the
//! same resolver and recurrence pipeline a platform message would.

use chrono::{DateTime, Utc};

use chime_config::model::ChimeConfig;
use chime_core::error::ChimeError;
use chime_core::traits::ReminderStore;
use chime_core::types::{
    ChannelId, RecurringReminder, ReminderCore, ReminderId, ReminderKind, RuleSet, UserId,
};
use chime_storage::SqliteReminderStore;
use chime_temporal::tz::{resolve_timezone, Tz};
use chime_temporal::{classify_instant, InstantClass, ParseOutcome};

pub async fn run_add(
    text: &str,
    message: &str,
    author: &str,
    channel: &str,
    timezone: Option<&str>,
    config: &ChimeConfig,
) -> Result<(), ChimeError> {
    let zone_name = timezone.unwrap_or(&config.time.default_timezone);
    let zone = resolve_timezone(zone_name)
        .ok_or_else(|| ChimeError::Config(format!("unknown timezone `{zone_name}`")))?;

    let reminder = build_reminder(text, message, author, channel, Utc::now(), zone)?;

    let store = SqliteReminderStore::open(&config.storage).await?;
    store.add(reminder.clone()).await?;
    store.close().await?;

    match &reminder {
        ReminderKind::OneShot(core) => {
            println!("added one-shot reminder {}", core.id);
            println!("fires at {}", core.scheduled_at.to_rfc3339());
        }
        ReminderKind::Recurring(recurring) => {
            println!("added recurring reminder {}", recurring.core.id);
            for rule in &recurring.rules.base_rules {
                println!("rule: {rule}");
            }
            if let Some(next) = recurring.next_trigger {
                println!("first occurrence at {}", next.to_rfc3339());
            }
        }
    }
    Ok(())
}

/// Turns free text into a storable reminder. Pure so tests can pin `now`.
fn build_reminder(
    text: &str,
    message: &str,
    author: &str,
    channel: &str,
    now: DateTime<Utc>,
    zone: Tz,
) -> Result<ReminderKind, ChimeError> {
    let core = ReminderCore {
        id: ReminderId::new(),
        author: UserId(author.to_string()),
        channel: ChannelId(channel.to_string()),
        message: message.to_string(),
        scheduled_at: now,
        created_at: now,
    };

    let result = chime_temporal::parse(text, now, zone);
    match result.outcome {
        ParseOutcome::Absolute(instant) => {
            if classify_instant(instant, now) == InstantClass::Past {
                return Err(ChimeError::Config(format!(
                    "\"{text}\" resolved to {}, which is already past",
                    instant.to_rfc3339()
                )));
            }
            Ok(ReminderKind::OneShot(ReminderCore {
                scheduled_at: instant,
                ..core
            }))
        }
        ParseOutcome::Recurring(phrase) => {
            let rule = chime_recurrence::normalize(&phrase, now)
                .map_err(|e| ChimeError::Config(format!("\"{phrase}\": {e}")))?;
            let rules = RuleSet::with_rule(now, rule);
            // Occurrences are computed strictly after `now`, so the anchor
            // itself never fires.
            let next = chime_recurrence::next_trigger(&rules, now)
                .map_err(|e| ChimeError::Config(format!("\"{phrase}\": {e}")))?;
            if next.is_none() {
                return Err(ChimeError::Config(format!(
                    "\"{phrase}\" never produces an occurrence after now"
                )));
            }
            Ok(ReminderKind::Recurring(RecurringReminder {
                core,
                rules,
                next_trigger: next,
            }))
        }
        ParseOutcome::Failure { kind, .. } => {
            let mut reason = format!("could not interpret \"{text}\" ({kind})");
            if !result.diagnostic.is_empty() {
                reason.push_str(": ");
                reason.push_str(&result.diagnostic.replace('\n', "; "));
            }
            Err(ChimeError::Config(reason))
        }
    }
}
