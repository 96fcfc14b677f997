// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery scheduling for Chime.
//!
//! Two independent passes sweep the store for due reminders and push each
//! one through an ordered fallback chain of delivery surfaces. The core
//! owns no timer and holds no reminder beyond a single pass; an external
//! periodic trigger drives it, and every collaborator arrives injected.

pub mod fallback;
pub mod scheduler;
pub mod shutdown;

pub use fallback::{DeliveryOutcome, DeliveryRoute};
pub use scheduler::{DeliveryScheduler, PassSummary};
pub use shutdown::install_signal_handler;
