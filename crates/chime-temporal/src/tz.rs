// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timezone helpers over IANA zone names.
//!
//! All reminder arithmetic happens on the wall clock of a user-selected zone
//! and crosses crate boundaries as UTC. These helpers are the only place the
//! workspace maps between the two.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};

pub use chrono_tz::Tz;

/// Resolves an IANA zone name ("Europe/Berlin") to a timezone.
///
/// Names are matched exactly, the way the tz database spells them.
pub fn resolve_timezone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

/// Converts a UTC instant to the given zone's wall clock.
pub fn to_timezone(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Converts a wall-clock datetime in the given zone back to UTC.
///
/// DST edges resolve leniently: a nonexistent local time (spring-forward gap)
/// maps one hour later, an ambiguous one (fall-back repeat) takes the earlier
/// offset. Returns `None` only when the instant is unrepresentable.
pub fn to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _later) => Some(earlier.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = local.checked_add_signed(Duration::hours(1))?;
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
                LocalResult::Ambiguous(earlier, _later) => Some(earlier.with_timezone(&Utc)),
                LocalResult::None => None,
            }
        }
    }
}
