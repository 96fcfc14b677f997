// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relative interval resolution ("2d", "1y 6mo", "13mo", "eoy").

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::boundary::{self, BoundaryKind};
use crate::token::TemporalToken;
use crate::{MAX_YEAR, tz};

/// Time units a fragment can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
}

/// Ordered dispatch table, evaluated top to bottom. Order carries meaning:
/// `mi`-prefixed fragments must match before the month rule could shadow
/// them, and the bare-`m` rule reads as minutes without a diagnostic.
const UNIT_RULES: &[(fn(&str) -> bool, Unit)] = &[
    (|f| f.starts_with("mi"), Unit::Minutes),
    (|f| f.starts_with("mo"), Unit::Months),
    (|f| f == "m", Unit::Minutes),
    (|f| f.starts_with('y'), Unit::Years),
    (|f| f.starts_with('w'), Unit::Weeks),
    (|f| f.starts_with('d'), Unit::Days),
    (|f| f.starts_with('h'), Unit::Hours),
];

/// Arithmetic left the representable range (year bound crossed or numeric
/// overflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RangeError;

/// Resolves a token list against a reference instant.
///
/// Calendar units (years, months) accumulate as months applied to the local
/// wall-clock datetime, so "13mo" normalizes to one year and one month.
/// Sub-month units accumulate as fixed durations applied to the instant.
/// End-of-period keywords re-anchor the working instant. Unrecognized unit
/// fragments push a diagnostic and are skipped; a result equal to `now`
/// therefore means the text held nothing for this resolver.
pub(crate) fn resolve(
    tokens: &[TemporalToken],
    now: DateTime<Utc>,
    zone: Tz,
    diagnostics: &mut Vec<String>,
) -> Result<DateTime<Utc>, RangeError> {
    let mut base = now;
    let mut months: i64 = 0;
    let mut minutes: i64 = 0;

    for token in tokens {
        let fragment = token.unit_fragment.as_str();
        match token.magnitude {
            None => {
                if let Some(kind) = BoundaryKind::from_keyword(fragment) {
                    base = boundary::resolve(kind, now, zone).ok_or(RangeError)?;
                }
                // Other magnitude-less fragments are not ours; the fuzzy
                // path may still want them ("monday 15:00").
            }
            Some(_) if fragment.is_empty() => {
                // A bare number means a day of month downstream, never an
                // offset.
            }
            Some(magnitude) => match unit_for(fragment) {
                Some(Unit::Years) => {
                    let as_months = magnitude.checked_mul(12).ok_or(RangeError)?;
                    months = months.checked_add(as_months).ok_or(RangeError)?;
                }
                Some(Unit::Months) => {
                    months = months.checked_add(magnitude).ok_or(RangeError)?;
                }
                Some(Unit::Weeks) => add_minutes(&mut minutes, magnitude, 7 * 24 * 60)?,
                Some(Unit::Days) => add_minutes(&mut minutes, magnitude, 24 * 60)?,
                Some(Unit::Hours) => add_minutes(&mut minutes, magnitude, 60)?,
                Some(Unit::Minutes) => add_minutes(&mut minutes, magnitude, 1)?,
                None => {
                    debug!(fragment, "skipping unrecognized unit fragment");
                    diagnostics.push(format!("cannot read \"{fragment}\" as a time unit"));
                }
            },
        }
    }

    let mut instant = base;
    if months != 0 {
        instant = shift_months(instant, months, zone)?;
    }
    if minutes != 0 {
        let delta = Duration::try_minutes(minutes).ok_or(RangeError)?;
        instant = instant.checked_add_signed(delta).ok_or(RangeError)?;
    }
    if instant.year() > MAX_YEAR || instant.year() < 0 {
        return Err(RangeError);
    }
    Ok(instant)
}

fn unit_for(fragment: &str) -> Option<Unit> {
    UNIT_RULES
        .iter()
        .find(|(predicate, _)| predicate(fragment))
        .map(|(_, unit)| *unit)
}

fn add_minutes(total: &mut i64, magnitude: i64, scale: i64) -> Result<(), RangeError> {
    let scaled = magnitude.checked_mul(scale).ok_or(RangeError)?;
    *total = total.checked_add(scaled).ok_or(RangeError)?;
    Ok(())
}

/// Applies a signed month count on the local calendar. Month arithmetic
/// clamps to the shorter month's end, so January 31 plus one month is the
/// last day of February.
fn shift_months(instant: DateTime<Utc>, months: i64, zone: Tz) -> Result<DateTime<Utc>, RangeError> {
    let count = u32::try_from(months.unsigned_abs()).map_err(|_| RangeError)?;
    let local = tz::to_timezone(instant, zone).naive_local();
    let shifted = if months >= 0 {
        local.checked_add_months(Months::new(count))
    } else {
        local.checked_sub_months(Months::new(count))
    }
    .ok_or(RangeError)?;
    tz::to_utc(shifted, zone).ok_or(RangeError)
}
