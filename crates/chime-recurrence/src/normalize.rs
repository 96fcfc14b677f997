// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule normalization: a phrase or raw `RRULE` text becomes a canonical,
//! validated rule anchored at a UTC instant.

use chime_core::RecurrenceRule;
use chrono::{DateTime, Utc};
use rrule::{Frequency, RRule, RRuleSet, Unvalidated};
use tracing::debug;

use crate::error::RecurrenceError;
use crate::grammar;

/// Normalizes recurrence text into a canonical rule.
///
/// Accepts either a grammar phrase ("every other friday at 15:00") or raw
/// `RRULE` text, with or without the property-name prefix. The result is
/// timezone-agnostic: any `UNTIL` bound sits in UTC in the canonical string.
/// Rules finer than hourly are rejected, as is any rule that cannot produce
/// a single instant when evaluated once from `anchor`.
pub fn normalize(text: &str, anchor: DateTime<Utc>) -> Result<RecurrenceRule, RecurrenceError> {
    let trimmed = text.trim();
    let property = match raw_rrule(trimmed) {
        Some(raw) => raw.to_string(),
        None => grammar::phrase_to_rule(trimmed)?,
    };

    let unvalidated: RRule<Unvalidated> = property
        .parse()
        .map_err(|e: rrule::RRuleError| RecurrenceError::Grammar(format!("{trimmed}: {e}")))?;

    let anchor_start = anchor.with_timezone(&rrule::Tz::UTC);
    let validated = unvalidated
        .validate(anchor_start)
        .map_err(|e| RecurrenceError::Unsatisfiable(e.to_string()))?;

    if matches!(
        validated.get_freq(),
        Frequency::Minutely | Frequency::Secondly
    ) {
        return Err(RecurrenceError::ForbiddenFrequency);
    }

    // One evaluation from the anchor; a rule that can never fire is useless
    // however well-formed it looks.
    let probe = RRuleSet::new(anchor_start).rrule(validated.clone()).all(1);
    if probe.dates.is_empty() {
        debug!(rule = %validated, "rule produced no occurrence from its anchor");
        return Err(RecurrenceError::Unsatisfiable(trimmed.to_string()));
    }

    Ok(RecurrenceRule(validated.to_string()))
}

/// Detects raw `RRULE` text and strips the optional property-name prefix.
fn raw_rrule(text: &str) -> Option<&str> {
    let body = text.strip_prefix("RRULE:").unwrap_or(text);
    body.contains("FREQ=").then_some(body)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn every_other_day_carries_daily_and_interval_markers() {
        let rule = normalize("every other day", anchor()).unwrap();
        assert!(rule.as_str().contains("DAILY"), "{rule}");
        assert!(rule.as_str().contains("INTERVAL=2"), "{rule}");
    }

    #[test]
    fn bare_every_second_is_rejected_with_a_diagnostic() {
        let err = normalize("every second", anchor()).unwrap_err();
        assert_eq!(err, RecurrenceError::ForbiddenFrequency);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn sub_hourly_frequencies_are_rejected() {
        assert_eq!(
            normalize("every minute", anchor()),
            Err(RecurrenceError::ForbiddenFrequency)
        );
        assert_eq!(
            normalize("FREQ=MINUTELY", anchor()),
            Err(RecurrenceError::ForbiddenFrequency)
        );
        assert_eq!(
            normalize("RRULE:FREQ=SECONDLY", anchor()),
            Err(RecurrenceError::ForbiddenFrequency)
        );
    }

    #[test]
    fn raw_rrule_text_passes_through() {
        let rule = normalize("RRULE:FREQ=WEEKLY;BYDAY=MO", anchor()).unwrap();
        assert!(rule.as_str().contains("WEEKLY"), "{rule}");
        assert!(rule.as_str().contains("MO"), "{rule}");

        let bare = normalize("FREQ=DAILY", anchor()).unwrap();
        assert!(bare.as_str().contains("DAILY"), "{bare}");
    }

    #[test]
    fn hourly_is_the_finest_allowed() {
        assert!(normalize("hourly", anchor()).is_ok());
        assert!(normalize("every 2 hours", anchor()).is_ok());
    }

    #[test]
    fn phrases_outside_the_grammar_fail() {
        assert!(matches!(
            normalize("sometimes maybe", anchor()),
            Err(RecurrenceError::Grammar(_))
        ));
    }

    #[test]
    fn unparsable_raw_rules_fail() {
        assert!(matches!(
            normalize("FREQ=FORTNIGHTLY", anchor()),
            Err(RecurrenceError::Grammar(_))
        ));
    }

    #[test]
    fn rules_that_can_never_fire_are_unsatisfiable() {
        // The until bound lies a year before the anchor.
        assert!(matches!(
            normalize("every day until 2020-01-01", anchor()),
            Err(RecurrenceError::Unsatisfiable(_))
        ));
    }

    #[test]
    fn until_bound_is_normalized_to_utc() {
        let rule = normalize("every day until 2026-03-01", anchor()).unwrap();
        assert!(rule.as_str().contains("UNTIL="), "{rule}");
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = normalize("every other friday at 15:00", anchor()).unwrap();
        let second = normalize(first.as_str(), anchor()).unwrap();
        assert_eq!(first, second);
    }
}
