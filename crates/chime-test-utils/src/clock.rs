// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manually driven clock for deterministic scheduler tests.

use std::sync::Mutex;

use chime_core::Clock;
use chrono::{DateTime, Duration, Utc};

/// A clock that only moves when the test says so.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    /// Move forward (or backward, with a negative delta).
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn set_and_advance_are_visible_through_the_trait() {
        let t0 = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::at(t0);
        assert_eq!(clock.now_utc(), t0);

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now_utc(), t0 + Duration::minutes(90));

        let later = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now_utc(), later);
    }
}
