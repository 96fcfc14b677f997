// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Absolute date resolution: strict ISO-8601 first, then fuzzy text.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use regex::Regex;
use tracing::debug;

use crate::boundary::{self, BoundaryKind};
use crate::{MAX_YEAR, tz};

/// Offset-less ISO forms, read on the target zone's wall clock.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Words that carry no meaning of their own and are skipped.
const CONNECTORS: &[&str] = &["at", "on", "of", "the", "in", "a", "an"];

/// Adverbs that mark the whole text as a recurrence phrase.
const FREQUENCY_WORDS: &[&str] = &["daily", "weekly", "monthly", "yearly", "annually", "hourly"];

const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const WEEKDAY_NAMES: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap());
static MERIDIEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?::(\d{2}))?(am|pm)$").unwrap());
static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[./-](\d{1,2})(?:[./-](\d{2,4}))?$").unwrap());
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)$").unwrap());

pub(crate) enum StrictOutcome {
    Instant(DateTime<Utc>),
    OutOfRange,
    NoMatch,
}

/// Strict ISO-8601 resolution. RFC 3339 offsets are honored as-is;
/// offset-less forms are interpreted in the target zone.
pub(crate) fn resolve_strict(text: &str, zone: Tz) -> StrictOutcome {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return bound_checked(instant.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return local_checked(naive, zone);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return local_checked(naive, zone);
        }
    }
    StrictOutcome::NoMatch
}

fn local_checked(naive: NaiveDateTime, zone: Tz) -> StrictOutcome {
    match tz::to_utc(naive, zone) {
        Some(instant) => bound_checked(instant),
        None => StrictOutcome::OutOfRange,
    }
}

fn bound_checked(instant: DateTime<Utc>) -> StrictOutcome {
    if instant.year() > MAX_YEAR || instant.year() < 0 {
        StrictOutcome::OutOfRange
    } else {
        StrictOutcome::Instant(instant)
    }
}

pub(crate) enum FuzzyOutcome {
    Instant(DateTime<Utc>),
    /// The text is a recurrence phrase; hand it to the recurrence engine.
    Recurring,
    OutOfRange,
    Failed,
}

#[derive(Default)]
struct DateParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateParts {
    fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

/// Fuzzy natural-language resolution.
///
/// Recognizes month names, ordinal or bare day numbers, 4-digit years,
/// clock times, day-first numeric dates, weekday names, "today"/"tomorrow",
/// and the end-of-period keywords. Missing components inherit from the
/// reference instant in the target zone, truncated to the minute; a parsed
/// time zeroes its unparsed sub-fields. Any word outside the grammar fails
/// the parse with a diagnostic naming it.
pub(crate) fn resolve_fuzzy(
    text: &str,
    now: DateTime<Utc>,
    zone: Tz,
    diagnostics: &mut Vec<String>,
) -> FuzzyOutcome {
    let words = normalize_words(text);
    if words.is_empty() {
        return FuzzyOutcome::Failed;
    }

    // Recurrence markers bail out before any date work.
    if words[0] == "every"
        || words[0] == "each"
        || words.iter().any(|w| FREQUENCY_WORDS.contains(&w.as_str()))
    {
        return FuzzyOutcome::Recurring;
    }

    let reference = tz::to_timezone(now, zone).naive_local();

    let mut date = DateParts::default();
    let mut time: Option<(u32, u32)> = None;
    let mut weekday: Option<Weekday> = None;
    let mut relative_day: Option<u64> = None;
    let mut seeded: Option<NaiveDateTime> = None;
    let mut after_at = false;

    for word in &words {
        let w = word.as_str();
        if CONNECTORS.contains(&w) {
            after_at = w == "at";
            continue;
        }

        if let Some(kind) = BoundaryKind::from_keyword(w) {
            match boundary::resolve(kind, now, zone) {
                Some(instant) => seeded = Some(tz::to_timezone(instant, zone).naive_local()),
                None => return FuzzyOutcome::OutOfRange,
            }
        } else if w == "today" {
            relative_day = Some(0);
        } else if w == "tomorrow" {
            relative_day = Some(1);
        } else if w == "noon" {
            time = Some((12, 0));
        } else if w == "midnight" {
            time = Some((0, 0));
        } else if let Some(month) = month_for(w) {
            date.month = Some(month);
        } else if let Some(day) = weekday_for(w) {
            weekday = Some(day);
        } else if let Some(caps) = TIME_RE.captures(w) {
            let (hour, minute) = (number(&caps[1]), number(&caps[2]));
            if hour > 23 || minute > 59 {
                diagnostics.push(format!("\"{w}\" is not a clock time"));
                return FuzzyOutcome::Failed;
            }
            time = Some((hour as u32, minute as u32));
        } else if let Some(caps) = MERIDIEM_RE.captures(w) {
            let hour12 = number(&caps[1]);
            let minute = caps.get(2).map_or(0, |m| number(m.as_str()));
            if hour12 == 0 || hour12 > 12 || minute > 59 {
                diagnostics.push(format!("\"{w}\" is not a clock time"));
                return FuzzyOutcome::Failed;
            }
            let hour = match &caps[3] {
                "am" => hour12 % 12,
                _ => hour12 % 12 + 12,
            };
            time = Some((hour as u32, minute as u32));
        } else if let Some(caps) = NUMERIC_DATE_RE.captures(w) {
            // Day-first, always: 3.2.2021 is the 3rd of February.
            let (day, month) = (number(&caps[1]), number(&caps[2]));
            if day == 0 || day > 31 || month == 0 || month > 12 {
                diagnostics.push(format!("\"{w}\" is not a day-first date"));
                return FuzzyOutcome::Failed;
            }
            date.day = Some(day as u32);
            date.month = Some(month as u32);
            if let Some(year) = caps.get(3) {
                let year = number(year.as_str());
                // Two-digit years are 2000-based.
                date.year = Some(if year < 100 { 2000 + year as i32 } else { year as i32 });
            }
        } else if let Some(caps) = ORDINAL_RE.captures(w) {
            let day = number(&caps[1]);
            if day == 0 || day > 31 {
                diagnostics.push(format!("\"{w}\" is not a day of month"));
                return FuzzyOutcome::Failed;
            }
            date.day = Some(day as u32);
        } else if w.bytes().all(|b| b.is_ascii_digit()) {
            match w.parse::<i64>() {
                Ok(value) if after_at && value <= 23 => time = Some((value as u32, 0)),
                Ok(value) if (1000..=9999).contains(&value) => date.year = Some(value as i32),
                Ok(value) if (1..=31).contains(&value) && date.day.is_none() => {
                    date.day = Some(value as u32);
                }
                Ok(value) if value > i64::from(MAX_YEAR) => {
                    diagnostics.push(format!("\"{w}\" lies beyond year {MAX_YEAR}"));
                    return FuzzyOutcome::OutOfRange;
                }
                _ => {
                    diagnostics.push(format!("cannot place the number \"{w}\""));
                    return FuzzyOutcome::Failed;
                }
            }
        } else {
            debug!(word = w, "fuzzy parse stopped at unknown word");
            diagnostics.push(format!("cannot interpret \"{w}\""));
            return FuzzyOutcome::Failed;
        }

        after_at = false;
    }

    let recognized = seeded.is_some()
        || relative_day.is_some()
        || weekday.is_some()
        || time.is_some()
        || !date.is_empty();
    if !recognized {
        return FuzzyOutcome::Failed;
    }

    // Assembly: explicit parts override; everything else inherits from the
    // seeded boundary instant or the reference truncated to the minute.
    let base = seeded.unwrap_or_else(|| truncate_to_minute(reference));

    let mut date_base = base.date();
    if let Some(offset) = relative_day {
        date_base = match reference.date().checked_add_days(Days::new(offset)) {
            Some(d) => d,
            None => return FuzzyOutcome::OutOfRange,
        };
    } else if let Some(target) = weekday {
        if date.is_empty() {
            date_base = match weekday_on_or_after(reference.date(), target) {
                Some(d) => d,
                None => return FuzzyOutcome::OutOfRange,
            };
        }
    }

    let year = date.year.unwrap_or_else(|| date_base.year());
    let month = date.month.unwrap_or_else(|| date_base.month());
    let day = date.day.unwrap_or_else(|| date_base.day());
    let Some(assembled_date) = NaiveDate::from_ymd_opt(year, month, day) else {
        diagnostics.push(format!("{year:04}-{month:02}-{day:02} is not a real date"));
        return FuzzyOutcome::Failed;
    };

    let time_of_day = match time {
        Some((hour, minute)) => {
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_else(|| base.time())
        }
        None => base.time(),
    };

    match tz::to_utc(assembled_date.and_time(time_of_day), zone) {
        Some(instant) => FuzzyOutcome::Instant(instant),
        None => FuzzyOutcome::OutOfRange,
    }
}

/// Lowercases, strips trailing punctuation, and folds "end of day|week|
/// month|year" into the short keyword.
fn normalize_words(text: &str) -> Vec<String> {
    let raw: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| matches!(c, ',' | ';' | '!' | '?'))
                .trim_end_matches('.')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let mut words = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == "end" && i + 2 < raw.len() && raw[i + 1] == "of" {
            let folded = match raw[i + 2].as_str() {
                "day" => Some("eod"),
                "week" => Some("eow"),
                "month" => Some("eom"),
                "year" => Some("eoy"),
                _ => None,
            };
            if let Some(keyword) = folded {
                words.push(keyword.to_string());
                i += 3;
                continue;
            }
        }
        words.push(raw[i].clone());
        i += 1;
    }
    words
}

fn number(digits: &str) -> i64 {
    digits.parse().unwrap_or(i64::MAX)
}

fn truncate_to_minute(datetime: NaiveDateTime) -> NaiveDateTime {
    let time = datetime.time();
    datetime
        .date()
        .and_hms_opt(time.hour(), time.minute(), 0)
        .unwrap_or(datetime)
}

fn weekday_on_or_after(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let ahead =
        (7 + target.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from.checked_add_days(Days::new(u64::from(ahead)))
}

fn month_for(word: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == word || (word.len() == 3 && name.starts_with(word)))
        .map(|(_, number)| *number)
}

fn weekday_for(word: &str) -> Option<Weekday> {
    WEEKDAY_NAMES
        .iter()
        .find(|(name, _)| *name == word || (word.len() == 3 && name.starts_with(word)))
        .map(|(_, day)| *day)
}
