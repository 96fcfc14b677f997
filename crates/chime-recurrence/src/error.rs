// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the recurrence engine.

use thiserror::Error;

/// Why a recurrence phrase or rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    /// The phrase is outside the recurrence grammar.
    #[error("unrecognized recurrence phrase: {0}")]
    Grammar(String),

    /// Rules finer than hourly are rejected; one notification a minute is
    /// spam, not a reminder.
    #[error("recurrence frequency finer than hourly is not allowed")]
    ForbiddenFrequency,

    /// The rule parses but can never produce an occurrence from its anchor.
    #[error("rule cannot produce an occurrence: {0}")]
    Unsatisfiable(String),

    /// A persisted rule string failed to parse back.
    #[error("malformed rule: {0}")]
    Malformed(String),
}
