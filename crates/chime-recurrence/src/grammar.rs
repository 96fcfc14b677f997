// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurrence phrase grammar.
//!
//! Translates the natural-language subset the temporal resolver hands over
//! ("every other friday at 15:00", "daily", "every 3 weeks until
//! 2026-03-01") into RFC 5545 `RRULE` properties. Validation and
//! canonicalization happen in the normalizer; this module only emits.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::RecurrenceError;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());
static MERIDIEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?::(\d{2}))?(am|pm)$").unwrap());

const WEEKDAY_CODES: &[(&str, &str)] = &[
    ("monday", "MO"),
    ("tuesday", "TU"),
    ("wednesday", "WE"),
    ("thursday", "TH"),
    ("friday", "FR"),
    ("saturday", "SA"),
    ("sunday", "SU"),
];

/// Translates a recurrence phrase into an `RRULE` property string.
///
/// Bare "every second" deliberately emits `FREQ=SECONDLY` and leaves the
/// rejection to validation; "every second friday" reads "second" as the
/// ordinal and means every other Friday.
pub(crate) fn phrase_to_rule(text: &str) -> Result<String, RecurrenceError> {
    let mut words: Vec<String> = text
        .to_lowercase()
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if words.is_empty() {
        return Err(RecurrenceError::Grammar(text.to_string()));
    }

    if words[0] == "every" || words[0] == "each" {
        words.remove(0);
    }

    let until = take_until_clause(&mut words, text)?;
    let at_time = take_at_clause(&mut words, text)?;

    let mut interval: Option<u32> = None;
    let mut freq: Option<&'static str> = None;
    let mut by_day: Vec<&'static str> = Vec::new();

    for (position, word) in words.iter().enumerate() {
        let w = word.as_str();
        if w == "and" {
            continue;
        }
        if w == "other" {
            interval = Some(2);
        } else if w == "second" {
            // Final bare "second" is the frequency; anywhere else it is the
            // ordinal.
            if position + 1 == words.len() && freq.is_none() && by_day.is_empty() {
                freq = Some("SECONDLY");
            } else {
                interval = Some(2);
            }
        } else if let Ok(n) = w.parse::<u32>() {
            if n == 0 {
                return Err(RecurrenceError::Grammar(text.to_string()));
            }
            interval = Some(n);
        } else if let Some(code) = weekday_code(w) {
            by_day.push(code);
        } else if let Some(f) = adverb_frequency(w) {
            freq = Some(f);
        } else if let Some(f) = noun_frequency(w) {
            freq = Some(f);
        } else {
            return Err(RecurrenceError::Grammar(text.to_string()));
        }
    }

    if !by_day.is_empty() && freq.is_none() {
        freq = Some("WEEKLY");
    }
    let Some(freq) = freq else {
        return Err(RecurrenceError::Grammar(text.to_string()));
    };

    let mut rule = format!("FREQ={freq}");
    if let Some(interval) = interval {
        if interval > 1 {
            rule.push_str(&format!(";INTERVAL={interval}"));
        }
    }
    if !by_day.is_empty() {
        rule.push_str(&format!(";BYDAY={}", by_day.join(",")));
    }
    if let Some((hour, minute)) = at_time {
        rule.push_str(&format!(";BYHOUR={hour};BYMINUTE={minute}"));
    }
    if let Some(until) = until {
        rule.push_str(&format!(";UNTIL={until}"));
    }
    Ok(rule)
}

/// Extracts a trailing "until <ISO date>" clause as an `UNTIL=...Z` value.
/// The bound is read literally: midnight UTC of the named date.
fn take_until_clause(
    words: &mut Vec<String>,
    text: &str,
) -> Result<Option<String>, RecurrenceError> {
    let Some(index) = words.iter().position(|w| w == "until") else {
        return Ok(None);
    };
    let tail = words.split_off(index);
    let date_text = tail[1..].join(" ");
    let naive = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0))
        .ok()
        .flatten()
        .or_else(|| NaiveDateTime::parse_from_str(&date_text, "%Y-%m-%dT%H:%M:%S").ok());
    match naive {
        Some(naive) => Ok(Some(naive.format("%Y%m%dT%H%M%SZ").to_string())),
        None => Err(RecurrenceError::Grammar(text.to_string())),
    }
}

/// Extracts a trailing "at HH:MM" / "at Npm" clause as `(hour, minute)`.
fn take_at_clause(
    words: &mut Vec<String>,
    text: &str,
) -> Result<Option<(u32, u32)>, RecurrenceError> {
    let Some(index) = words.iter().position(|w| w == "at") else {
        return Ok(None);
    };
    let tail = words.split_off(index);
    let Some(time_word) = tail.get(1) else {
        return Err(RecurrenceError::Grammar(text.to_string()));
    };
    match parse_time_word(time_word) {
        Some(time) => Ok(Some(time)),
        None => Err(RecurrenceError::Grammar(text.to_string())),
    }
}

fn parse_time_word(word: &str) -> Option<(u32, u32)> {
    if word == "noon" {
        return Some((12, 0));
    }
    if word == "midnight" {
        return Some((0, 0));
    }
    if let Some(caps) = TIME_RE.captures(word) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return (hour <= 23 && minute <= 59).then_some((hour, minute));
    }
    if let Some(caps) = MERIDIEM_RE.captures(word) {
        let hour12: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if hour12 == 0 || hour12 > 12 || minute > 59 {
            return None;
        }
        let hour = match &caps[3] {
            "am" => hour12 % 12,
            _ => hour12 % 12 + 12,
        };
        return Some((hour, minute));
    }
    // A bare hour ("at 9").
    let hour: u32 = word.parse().ok()?;
    (hour <= 23).then_some((hour, 0))
}

fn weekday_code(word: &str) -> Option<&'static str> {
    let singular = word.strip_suffix('s').unwrap_or(word);
    WEEKDAY_CODES
        .iter()
        .find(|(name, _)| *name == singular || (singular.len() == 3 && name.starts_with(singular)))
        .map(|(_, code)| *code)
}

fn adverb_frequency(word: &str) -> Option<&'static str> {
    match word {
        "daily" => Some("DAILY"),
        "weekly" => Some("WEEKLY"),
        "monthly" => Some("MONTHLY"),
        "yearly" | "annually" => Some("YEARLY"),
        "hourly" => Some("HOURLY"),
        _ => None,
    }
}

fn noun_frequency(word: &str) -> Option<&'static str> {
    let singular = word.strip_suffix('s').unwrap_or(word);
    match singular {
        "day" => Some("DAILY"),
        "week" => Some("WEEKLY"),
        "month" => Some("MONTHLY"),
        "year" => Some("YEARLY"),
        "hour" => Some("HOURLY"),
        "minute" => Some("MINUTELY"),
        "second" => Some("SECONDLY"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(text: &str) -> String {
        phrase_to_rule(text).expect(text)
    }

    #[test]
    fn plain_frequencies() {
        assert_eq!(rule("every day"), "FREQ=DAILY");
        assert_eq!(rule("each week"), "FREQ=WEEKLY");
        assert_eq!(rule("every month"), "FREQ=MONTHLY");
        assert_eq!(rule("every year"), "FREQ=YEARLY");
        assert_eq!(rule("daily"), "FREQ=DAILY");
        assert_eq!(rule("annually"), "FREQ=YEARLY");
        assert_eq!(rule("hourly"), "FREQ=HOURLY");
    }

    #[test]
    fn other_means_interval_two() {
        assert_eq!(rule("every other day"), "FREQ=DAILY;INTERVAL=2");
        assert_eq!(rule("every other friday"), "FREQ=WEEKLY;INTERVAL=2;BYDAY=FR");
    }

    #[test]
    fn numeric_intervals() {
        assert_eq!(rule("every 3 weeks"), "FREQ=WEEKLY;INTERVAL=3");
        assert_eq!(rule("every 12 hours"), "FREQ=HOURLY;INTERVAL=12");
        assert_eq!(rule("every 1 day"), "FREQ=DAILY");
    }

    #[test]
    fn weekday_lists_become_byday() {
        assert_eq!(rule("every monday"), "FREQ=WEEKLY;BYDAY=MO");
        assert_eq!(
            rule("every monday and thursday"),
            "FREQ=WEEKLY;BYDAY=MO,TH"
        );
        assert_eq!(rule("every mon, wed, fri"), "FREQ=WEEKLY;BYDAY=MO,WE,FR");
        assert_eq!(rule("every saturdays"), "FREQ=WEEKLY;BYDAY=SA");
    }

    #[test]
    fn second_is_ordinal_unless_bare() {
        assert_eq!(rule("every second friday"), "FREQ=WEEKLY;INTERVAL=2;BYDAY=FR");
        assert_eq!(rule("every second week"), "FREQ=WEEKLY;INTERVAL=2");
        // Bare "every second" means the frequency; validation rejects it
        // downstream.
        assert_eq!(rule("every second"), "FREQ=SECONDLY");
    }

    #[test]
    fn at_clause_sets_hour_and_minute() {
        assert_eq!(rule("every day at 15:00"), "FREQ=DAILY;BYHOUR=15;BYMINUTE=0");
        assert_eq!(rule("every day at 3pm"), "FREQ=DAILY;BYHOUR=15;BYMINUTE=0");
        assert_eq!(
            rule("every friday at 9:30"),
            "FREQ=WEEKLY;BYDAY=FR;BYHOUR=9;BYMINUTE=30"
        );
        assert_eq!(rule("every day at noon"), "FREQ=DAILY;BYHOUR=12;BYMINUTE=0");
        assert_eq!(rule("every day at 9"), "FREQ=DAILY;BYHOUR=9;BYMINUTE=0");
    }

    #[test]
    fn until_clause_is_midnight_utc_of_that_date() {
        assert_eq!(
            rule("every day until 2026-03-01"),
            "FREQ=DAILY;UNTIL=20260301T000000Z"
        );
        assert_eq!(
            rule("every other day at 8:00 until 2026-03-01"),
            "FREQ=DAILY;INTERVAL=2;BYHOUR=8;BYMINUTE=0;UNTIL=20260301T000000Z"
        );
    }

    #[test]
    fn unrecognized_phrases_name_the_text() {
        for text in ["every banana", "every", "", "every day at teatime", "every day until soon"] {
            match phrase_to_rule(text) {
                Err(RecurrenceError::Grammar(offender)) => assert_eq!(offender, text),
                other => panic!("expected a grammar error for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(phrase_to_rule("every 0 days").is_err());
    }
}
