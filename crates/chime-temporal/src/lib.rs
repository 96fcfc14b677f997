// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporal expression resolver for Chime.
//!
//! Turns free-form text ("2d", "13mo", "eoy", "5th july 15:00", an ISO
//! timestamp) into an absolute UTC instant, a recurrence phrase, or a parse
//! failure with diagnostics. Pure library: no I/O and no clock access;
//! callers pass the reference instant and target timezone explicitly.
//!
//! Resolution runs in priority order. Relative intervals and end-of-period
//! keywords go first, strict ISO-8601 second, the fuzzy natural-language
//! grammar last. See [`parse`] for the contract.

mod absolute;
mod boundary;
mod dispatch;
mod relative;
mod token;
pub mod tz;

pub use dispatch::{
    FailureKind, InstantClass, ParseOutcome, ParseResult, classify_instant, parse,
};

/// Latest representable year. Computed instants past this bound are
/// rejected, never clamped.
pub const MAX_YEAR: i32 = 9999;
