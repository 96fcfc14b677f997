// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Occurrence computation over a reminder's rule set.

use chime_core::{RecurrenceRule, RuleSet};
use chrono::{DateTime, Utc};
use rrule::{RRule, RRuleSet, Unvalidated};

use crate::error::RecurrenceError;

/// Upper bound on dates pulled per query. The first strictly-after match
/// always sits within the first few, even with exclusions in play.
const SCAN_LIMIT: u16 = 8;

/// Computes the earliest occurrence of `rules` strictly after `after`.
///
/// The occurrence set is the anchor plus `extra_instants`, unioned with the
/// expansion of every base rule, minus exclusion rules and excluded
/// instants. The function is pure: identical inputs yield identical output,
/// so callers recompute on every poll instead of caching iterator state.
///
/// Returns `Ok(None)` once the set is exhausted (`COUNT` or `UNTIL` bounds
/// passed) and `Err` only when a persisted rule string no longer parses.
pub fn next_trigger(
    rules: &RuleSet,
    after: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, RecurrenceError> {
    let anchor = rules.anchor.with_timezone(&rrule::Tz::UTC);
    let mut set = RRuleSet::new(anchor);

    // The anchor is an implicit extra instant: the creation moment always
    // qualifies unless explicitly excluded.
    set = set.rdate(anchor);
    for extra in &rules.extra_instants {
        set = set.rdate(extra.with_timezone(&rrule::Tz::UTC));
    }
    for excluded in &rules.excluded_instants {
        set = set.exdate(excluded.with_timezone(&rrule::Tz::UTC));
    }
    for rule in &rules.base_rules {
        set = set.rrule(anchored(rule, anchor)?);
    }
    for rule in &rules.exclusion_rules {
        set = set.exrule(anchored(rule, anchor)?);
    }

    let found = set
        .after(after.with_timezone(&rrule::Tz::UTC))
        .all(SCAN_LIMIT)
        .dates
        .into_iter()
        .map(|occurrence| occurrence.with_timezone(&Utc))
        .find(|occurrence| *occurrence > after);
    Ok(found)
}

/// Revalidates a persisted rule string against the set's anchor.
fn anchored(rule: &RecurrenceRule, anchor: DateTime<rrule::Tz>) -> Result<RRule, RecurrenceError> {
    let unvalidated: RRule<Unvalidated> = rule
        .as_str()
        .parse()
        .map_err(|e: rrule::RRuleError| RecurrenceError::Malformed(format!("{rule}: {e}")))?;
    unvalidated
        .validate(anchor)
        .map_err(|e| RecurrenceError::Malformed(format!("{rule}: {e}")))
}

#[cfg(test)]
mod tests {
    use chime_core::RuleSet;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;
    use crate::normalize::normalize;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 10, 0, 0).unwrap()
    }

    fn every_other_day() -> RuleSet {
        let t0 = anchor();
        RuleSet::with_rule(t0, normalize("every other day", t0).unwrap())
    }

    #[test]
    fn anchor_is_the_first_occurrence() {
        let t0 = anchor();
        let before = t0 - Duration::seconds(1);
        assert_eq!(next_trigger(&every_other_day(), before).unwrap(), Some(t0));
    }

    #[test]
    fn every_other_day_steps_by_two() {
        let t0 = anchor();
        let rules = every_other_day();

        let second = next_trigger(&rules, t0).unwrap().unwrap();
        assert_eq!(second, Utc.with_ymd_and_hms(2021, 1, 3, 10, 0, 0).unwrap());

        let third = next_trigger(&rules, second).unwrap().unwrap();
        assert_eq!(third, Utc.with_ymd_and_hms(2021, 1, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn excluded_anchor_skips_to_the_rule_expansion() {
        let t0 = anchor();
        let mut rules = every_other_day();
        rules.excluded_instants.push(t0);

        let first = next_trigger(&rules, t0 - Duration::seconds(1)).unwrap();
        assert_eq!(first, Some(Utc.with_ymd_and_hms(2021, 1, 3, 10, 0, 0).unwrap()));
    }

    #[test]
    fn extra_instants_join_the_set() {
        let t0 = anchor();
        let extra = Utc.with_ymd_and_hms(2021, 2, 14, 9, 0, 0).unwrap();
        let rules = RuleSet {
            anchor: t0,
            base_rules: vec![],
            exclusion_rules: vec![],
            extra_instants: vec![extra],
            excluded_instants: vec![],
        };

        assert_eq!(next_trigger(&rules, t0).unwrap(), Some(extra));
        assert_eq!(next_trigger(&rules, extra).unwrap(), None);
    }

    #[test]
    fn exclusion_rules_subtract_matching_days() {
        // 2021-01-01 is a Friday; the weekend exclusion pushes the daily
        // cadence to Monday the 4th.
        let t0 = anchor();
        let mut rules = RuleSet::with_rule(t0, normalize("every day", t0).unwrap());
        rules
            .exclusion_rules
            .push(normalize("every saturday and sunday", t0).unwrap());

        let next = next_trigger(&rules, t0).unwrap();
        assert_eq!(next, Some(Utc.with_ymd_and_hms(2021, 1, 4, 10, 0, 0).unwrap()));
    }

    #[test]
    fn counted_rules_exhaust_to_none() {
        let t0 = anchor();
        let rules = RuleSet::with_rule(t0, normalize("FREQ=DAILY;COUNT=3", t0).unwrap());

        let penultimate = Utc.with_ymd_and_hms(2021, 1, 2, 12, 0, 0).unwrap();
        assert_eq!(
            next_trigger(&rules, penultimate).unwrap(),
            Some(Utc.with_ymd_and_hms(2021, 1, 3, 10, 0, 0).unwrap())
        );

        let last = Utc.with_ymd_and_hms(2021, 1, 3, 10, 0, 0).unwrap();
        assert_eq!(next_trigger(&rules, last).unwrap(), None);
    }

    #[test]
    fn bare_anchor_fires_exactly_once() {
        let t0 = anchor();
        let rules = RuleSet {
            anchor: t0,
            base_rules: vec![],
            exclusion_rules: vec![],
            extra_instants: vec![],
            excluded_instants: vec![],
        };

        assert_eq!(next_trigger(&rules, t0 - Duration::seconds(1)).unwrap(), Some(t0));
        assert_eq!(next_trigger(&rules, t0).unwrap(), None);
    }

    #[test]
    fn corrupt_persisted_rules_surface_as_malformed() {
        let t0 = anchor();
        let rules = RuleSet::with_rule(t0, RecurrenceRule("NOT A RULE".to_string()));
        assert!(matches!(
            next_trigger(&rules, t0),
            Err(RecurrenceError::Malformed(_))
        ));
    }

    proptest! {
        #[test]
        fn next_trigger_is_strictly_after_its_bound(offset_minutes in 0i64..100_000) {
            let rules = every_other_day();
            let after = anchor() + Duration::minutes(offset_minutes);
            let next = next_trigger(&rules, after).unwrap();
            prop_assert!(next.is_some());
            prop_assert!(next.unwrap() > after);
        }
    }
}
