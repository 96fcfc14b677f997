// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Chime integration tests.
//!
//! Provides test doubles for the scheduler's three collaborators so delivery
//! logic can be exercised fast, deterministically, and without external
//! services.
//!
//! # Components
//!
//! - [`MockMessenger`] - Delivery target with capability switches and captured sends
//! - [`MemoryReminderStore`] - In-memory `ReminderStore`
//! - [`FixedClock`] - Manually driven clock

pub mod clock;
pub mod memory_store;
pub mod mock_messenger;

pub use clock::FixedClock;
pub use memory_store::MemoryReminderStore;
pub use mock_messenger::{MockMessenger, SentMessage};
