// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Chime reminder daemon.
//!
//! This crate provides the collaborator trait definitions, error type, and
//! domain types used throughout the Chime workspace. The temporal resolver,
//! recurrence engine, scheduler, and storage crates all build on what is
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ChimeError;
pub use types::{
    ChannelId, Notification, RecurrenceRule, RecurringReminder, ReminderCore, ReminderId,
    ReminderKind, RuleSet, Surface, UserId,
};

// Re-export all collaborator traits at crate root.
pub use traits::{Clock, Messenger, ReminderStore, SystemClock};
