// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messenger for deterministic delivery testing.
//!
//! `MockMessenger` implements `Messenger` with per-surface capability
//! switches, injectable send failures, and captured deliveries for
//! assertion in tests.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use chime_core::traits::messenger::Messenger;
use chime_core::types::{Notification, Surface};
use chime_core::ChimeError;

/// One captured delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Rich { surface: String, message: String },
    Plain { surface: String, text: String },
}

impl SentMessage {
    /// The surface key the delivery targeted, e.g. `channel:general`.
    pub fn surface(&self) -> &str {
        match self {
            SentMessage::Rich { surface, .. } | SentMessage::Plain { surface, .. } => surface,
        }
    }
}

/// A mock delivery target for testing.
///
/// Every surface starts fully capable; tests knock out capabilities with
/// `deny_rich()` / `deny_plain()` or make capable sends fail with
/// `fail_rich()` / `fail_plain()`.
pub struct MockMessenger {
    rich_denied: Mutex<HashSet<String>>,
    plain_denied: Mutex<HashSet<String>>,
    rich_failure: Mutex<Option<String>>,
    plain_failure: Mutex<Option<String>>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl MockMessenger {
    /// Create a messenger where every surface accepts everything.
    pub fn new() -> Self {
        Self {
            rich_denied: Mutex::new(HashSet::new()),
            plain_denied: Mutex::new(HashSet::new()),
            rich_failure: Mutex::new(None),
            plain_failure: Mutex::new(None),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report `surface` as unable to render rich content.
    pub async fn deny_rich(&self, surface: &Surface) {
        self.rich_denied.lock().await.insert(surface.to_string());
    }

    /// Report `surface` as unable to receive plain text.
    pub async fn deny_plain(&self, surface: &Surface) {
        self.plain_denied.lock().await.insert(surface.to_string());
    }

    /// Make every subsequent `send_rich` fail with `message`, regardless of
    /// what the capability probe reported.
    pub async fn fail_rich(&self, message: &str) {
        *self.rich_failure.lock().await = Some(message.to_string());
    }

    /// Make every subsequent `send_plain` fail with `message`.
    pub async fn fail_plain(&self, message: &str) {
        *self.plain_failure.lock().await = Some(message.to_string());
    }

    /// All deliveries captured so far, in send order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn can_send_rich(&self, surface: &Surface) -> bool {
        !self.rich_denied.lock().await.contains(&surface.to_string())
    }

    async fn can_send_plain(&self, surface: &Surface) -> bool {
        !self.plain_denied.lock().await.contains(&surface.to_string())
    }

    async fn send_rich(
        &self,
        surface: &Surface,
        notification: &Notification,
    ) -> Result<(), ChimeError> {
        if let Some(message) = self.rich_failure.lock().await.clone() {
            return Err(ChimeError::Messenger {
                message,
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage::Rich {
            surface: surface.to_string(),
            message: notification.message.clone(),
        });
        Ok(())
    }

    async fn send_plain(&self, surface: &Surface, text: &str) -> Result<(), ChimeError> {
        if let Some(message) = self.plain_failure.lock().await.clone() {
            return Err(ChimeError::Messenger {
                message,
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage::Plain {
            surface: surface.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
