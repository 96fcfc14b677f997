// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered delivery fallback across surfaces.
//!
//! A due occurrence walks four attempts and stops at the first success:
//! rich to the channel, plain to the channel, rich to the author directly,
//! plain to the author directly. A capability probe returning `false` and a
//! send returning `Err` both advance the chain; only full exhaustion drops
//! the occurrence.

use chime_core::traits::messenger::Messenger;
use chime_core::types::{Notification, ReminderCore};
use tracing::{debug, warn};

/// The surface and format a notification ultimately went out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryRoute {
    RichChannel,
    PlainChannel,
    RichDirect,
    PlainDirect,
}

/// Terminal result of one trip through the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(DeliveryRoute),
    /// Every attempt was declined or failed; the occurrence is dropped
    /// without retry.
    Undelivered,
}

/// Attempts delivery of `notification` for `core`, in fallback order.
pub async fn deliver(
    messenger: &dyn Messenger,
    core: &ReminderCore,
    notification: &Notification,
) -> DeliveryOutcome {
    let channel = core.channel_surface();
    let direct = core.direct_surface();
    let plain = notification.plain_text();

    if messenger.can_send_rich(&channel).await {
        match messenger.send_rich(&channel, notification).await {
            Ok(()) => return DeliveryOutcome::Delivered(DeliveryRoute::RichChannel),
            Err(e) => debug!(id = %core.id, surface = %channel, error = %e, "rich channel send failed"),
        }
    }

    if messenger.can_send_plain(&channel).await {
        match messenger.send_plain(&channel, &plain).await {
            Ok(()) => return DeliveryOutcome::Delivered(DeliveryRoute::PlainChannel),
            Err(e) => debug!(id = %core.id, surface = %channel, error = %e, "plain channel send failed"),
        }
    }

    if messenger.can_send_rich(&direct).await {
        match messenger.send_rich(&direct, notification).await {
            Ok(()) => return DeliveryOutcome::Delivered(DeliveryRoute::RichDirect),
            Err(e) => debug!(id = %core.id, surface = %direct, error = %e, "rich direct send failed"),
        }
    }

    if messenger.can_send_plain(&direct).await {
        match messenger.send_plain(&direct, &plain).await {
            Ok(()) => return DeliveryOutcome::Delivered(DeliveryRoute::PlainDirect),
            Err(e) => debug!(id = %core.id, surface = %direct, error = %e, "plain direct send failed"),
        }
    }

    warn!(
        id = %core.id,
        author = %core.author.0,
        due_at = %notification.due_at,
        "all delivery routes exhausted, dropping occurrence"
    );
    DeliveryOutcome::Undelivered
}
