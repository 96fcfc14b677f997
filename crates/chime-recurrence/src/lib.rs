// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurrence engine for Chime.
//!
//! Turns human phrases ("every other friday at 15:00") and raw `RRULE` text
//! into canonical rules, and computes occurrences over a reminder's full
//! rule set: base rules, exclusion rules, extra instants, and excluded
//! instants, all hanging off a UTC anchor.
//!
//! Expansion is delegated to a standards-compliant RFC 5545 implementation;
//! this crate owns the grammar, the normalization policy (nothing finer
//! than hourly, nothing that can never fire), and the strictly-after query
//! the scheduler leans on.

mod error;
mod grammar;
mod normalize;
mod occurrence;

pub use error::RecurrenceError;
pub use normalize::normalize;
pub use occurrence::next_trigger;
