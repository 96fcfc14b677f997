// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Chime scheduler.
//!
//! The scheduler is constructed against these traits and nothing else; the
//! binary decides which implementations to inject. Async traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod clock;
pub mod messenger;
pub mod store;

// Re-export all traits at the traits module level for convenience.
pub use clock::{Clock, SystemClock};
pub use messenger::Messenger;
pub use store::ReminderStore;
