// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound delivery trait for messaging surfaces.

use async_trait::async_trait;

use crate::error::ChimeError;
use crate::types::{Notification, Surface};

/// Outbound delivery collaborator.
///
/// Implementations wrap a chat platform (or the console); the scheduler only
/// ever talks to this trait. Permission denial is an ordinary `Err` value,
/// never a panic.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Whether rich-format content can currently be rendered on `surface`.
    async fn can_send_rich(&self, surface: &Surface) -> bool;

    /// Whether plain text can currently be delivered to `surface`.
    async fn can_send_plain(&self, surface: &Surface) -> bool;

    /// Delivers a rich-format notification.
    async fn send_rich(
        &self,
        surface: &Surface,
        notification: &Notification,
    ) -> Result<(), ChimeError>;

    /// Delivers plain text.
    async fn send_plain(&self, surface: &Surface, text: &str) -> Result<(), ChimeError>;
}
