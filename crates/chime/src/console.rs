// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console delivery surface.
//!
//! Prints reminders to stdout instead of a chat platform. Rich capability is
//! declined, so every delivery travels the scheduler's plain-text fallback
//! routes; what lands here is exactly what a degraded chat surface would see.

use async_trait::async_trait;

use chime_core::types::{Notification, Surface};
use chime_core::{ChimeError, Messenger};

/// Plain-text-only messenger writing to stdout.
pub struct ConsoleMessenger;

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn can_send_rich(&self, _surface: &Surface) -> bool {
        false
    }

    async fn can_send_plain(&self, _surface: &Surface) -> bool {
        true
    }

    async fn send_rich(
        &self,
        surface: &Surface,
        _notification: &Notification,
    ) -> Result<(), ChimeError> {
        // Capability is declined above; landing here means a caller skipped
        // the probe.
        Err(ChimeError::Messenger {
            message: format!("console cannot render rich output (surface {surface})"),
            source: None,
        })
    }

    async fn send_plain(&self, surface: &Surface, text: &str) -> Result<(), ChimeError> {
        println!("[{surface}] {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use chime_core::types::UserId;

    use super::*;

    fn surface() -> Surface {
        Surface::Channel(chime_core::types::ChannelId("general".into()))
    }

    #[tokio::test]
    async fn console_is_plain_only() {
        let messenger = ConsoleMessenger::new();
        assert!(!messenger.can_send_rich(&surface()).await);
        assert!(messenger.can_send_plain(&surface()).await);
    }

    #[tokio::test]
    async fn plain_send_succeeds_rich_send_errors() {
        let messenger = ConsoleMessenger::new();
        let notification = Notification {
            message: "stretch".into(),
            author: UserId("user-1".into()),
            due_at: Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap(),
        };

        assert!(messenger
            .send_plain(&surface(), "Reminder: stretch")
            .await
            .is_ok());
        assert!(messenger.send_rich(&surface(), &notification).await.is_err());
    }
}
