// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse orchestration: relative intervals first, then strict ISO-8601,
//! then the fuzzy grammar.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use strum::Display;

use crate::absolute::{self, FuzzyOutcome, StrictOutcome};
use crate::{MAX_YEAR, relative, token};

/// Why a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// No stage recognized the text.
    Syntax,
    /// The text was understood but the instant lies outside the
    /// representable range.
    RangeOverflow,
}

/// What a piece of text resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A single instant. May lie in the past; callers decide what to do
    /// with that (see [`classify_instant`]).
    Absolute(DateTime<Utc>),
    /// Text recognized as a recurrence phrase, handed over verbatim.
    Recurring(String),
    /// Nothing usable. `displayed` echoes the reference instant so callers
    /// can show what "now" was when the parse ran.
    Failure {
        displayed: DateTime<Utc>,
        kind: FailureKind,
    },
}

/// Outcome plus newline-joined advisory diagnostics from every attempted
/// stage. Diagnostics never drive control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub outcome: ParseOutcome,
    pub diagnostic: String,
}

/// How a parsed instant relates to the reference now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum InstantClass {
    Future,
    Past,
}

/// Classifies a parsed instant so callers can hint "must be in the future"
/// while still showing what was understood.
pub fn classify_instant(instant: DateTime<Utc>, now: DateTime<Utc>) -> InstantClass {
    if instant > now {
        InstantClass::Future
    } else {
        InstantClass::Past
    }
}

/// Resolves free text against a reference instant and target timezone.
///
/// Stages run in priority order: relative intervals and end-of-period
/// keywords, then strict ISO-8601, then the fuzzy date grammar. A stage
/// wins by producing an instant strictly different from `now`; the fuzzy
/// stage may instead classify the text as a recurrence phrase.
pub fn parse(text: &str, now: DateTime<Utc>, zone: Tz) -> ParseResult {
    let trimmed = text.trim();
    let mut diagnostics: Vec<String> = Vec::new();

    let tokens = token::tokenize(trimmed);
    match relative::resolve(&tokens, now, zone, &mut diagnostics) {
        Ok(instant) if instant != now => {
            return ParseResult {
                outcome: ParseOutcome::Absolute(instant),
                diagnostic: join(diagnostics),
            };
        }
        Ok(_) => {}
        Err(relative::RangeError) => return overflow(now, diagnostics),
    }

    match absolute::resolve_strict(trimmed, zone) {
        StrictOutcome::Instant(instant) if instant != now => {
            return ParseResult {
                outcome: ParseOutcome::Absolute(instant),
                diagnostic: join(diagnostics),
            };
        }
        StrictOutcome::Instant(_) => {}
        StrictOutcome::OutOfRange => return overflow(now, diagnostics),
        StrictOutcome::NoMatch => {}
    }

    match absolute::resolve_fuzzy(trimmed, now, zone, &mut diagnostics) {
        FuzzyOutcome::Instant(instant) => {
            return ParseResult {
                outcome: ParseOutcome::Absolute(instant),
                diagnostic: join(diagnostics),
            };
        }
        FuzzyOutcome::Recurring => {
            return ParseResult {
                outcome: ParseOutcome::Recurring(trimmed.to_string()),
                diagnostic: join(diagnostics),
            };
        }
        FuzzyOutcome::OutOfRange => return overflow(now, diagnostics),
        FuzzyOutcome::Failed => {}
    }

    if diagnostics.is_empty() {
        diagnostics.push(format!("could not interpret \"{trimmed}\""));
    }
    ParseResult {
        outcome: ParseOutcome::Failure {
            displayed: now,
            kind: FailureKind::Syntax,
        },
        diagnostic: join(diagnostics),
    }
}

fn overflow(now: DateTime<Utc>, mut diagnostics: Vec<String>) -> ParseResult {
    diagnostics.push(format!("instant lies beyond year {MAX_YEAR}"));
    ParseResult {
        outcome: ParseOutcome::Failure {
            displayed: now,
            kind: FailureKind::RangeOverflow,
        },
        diagnostic: join(diagnostics),
    }
}

fn join(diagnostics: Vec<String>) -> String {
    diagnostics.join("\n")
}
