// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-of-period boundary computation ("eod", "eow", "eom", "eoy").
//!
//! Boundaries are calendar notions, so everything here runs on the local
//! wall clock of the target zone and converts back to UTC at the end.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::tz;

/// The four end-of-period keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryKind {
    Day,
    Week,
    Month,
    Year,
}

impl BoundaryKind {
    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "eod" => Some(Self::Day),
            "eow" => Some(Self::Week),
            "eom" => Some(Self::Month),
            "eoy" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Resolves an end-of-period keyword against the wall-clock now.
///
/// When the nominal boundary has already passed, the push-back rule applies:
/// now plus two hours floored to the hour, capped at 23:59:59 of the
/// boundary's local day while that cap is itself still future. Either way
/// the result is strictly after `now`.
pub(crate) fn resolve(kind: BoundaryKind, now: DateTime<Utc>, zone: Tz) -> Option<DateTime<Utc>> {
    let now_local = tz::to_timezone(now, zone).naive_local();
    let today = now_local.date();

    let nominal = match kind {
        BoundaryKind::Day => {
            // Next midnight minus 15 minutes: today 23:45.
            let midnight = today.checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?;
            midnight - Duration::minutes(15)
        }
        BoundaryKind::Week => {
            // Following Monday 00:00 minus 49 hours: Friday 23:00. The
            // workweek ends Friday evening.
            let ahead = u64::from(7 - today.weekday().num_days_from_monday());
            let monday = today.checked_add_days(Days::new(ahead))?.and_hms_opt(0, 0, 0)?;
            monday - Duration::hours(49)
        }
        BoundaryKind::Month => {
            // First of next month 00:00 minus 12 hours: last day 12:00.
            let first = today
                .with_day(1)?
                .checked_add_months(Months::new(1))?
                .and_hms_opt(0, 0, 0)?;
            first - Duration::hours(12)
        }
        BoundaryKind::Year => {
            // January 1 next year 00:00 minus 1 hour: December 31 23:00.
            let jan1 = NaiveDate::from_ymd_opt(today.year().checked_add(1)?, 1, 1)?
                .and_hms_opt(0, 0, 0)?;
            jan1 - Duration::hours(1)
        }
    };

    let resolved = if nominal > now_local {
        nominal
    } else {
        push_back(now_local, nominal)?
    };
    tz::to_utc(resolved, zone)
}

/// Push-back for keywords invoked after their own cutoff.
fn push_back(now_local: NaiveDateTime, nominal: NaiveDateTime) -> Option<NaiveDateTime> {
    let floored = now_local
        .checked_add_signed(Duration::hours(2))?
        .with_minute(0)?
        .with_second(0)?
        .with_nanosecond(0)?;
    let cap = nominal.date().and_hms_opt(23, 59, 59)?;
    if cap > now_local {
        Some(floored.min(cap))
    } else {
        // The boundary day is already over (an eow issued on the weekend);
        // only the forward push remains.
        Some(floored)
    }
}
