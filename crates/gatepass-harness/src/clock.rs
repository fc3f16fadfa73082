//! Settable wall clock.
//!
//! Pass issuing stamps `encodedAt` and clearance writes stamp `lastUpdated`;
//! pinning the clock makes both stable across runs, so staleness scenarios
//! (encode, revoke, scan) are scripted instead of raced.

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use gatepass_core::Clock;

/// A [`Clock`] that only moves when the test says so.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock pinned at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Moves the clock forward. An overflowing delta leaves it unchanged.
    #[allow(clippy::expect_used)]
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("Mutex poisoned");
        *now = now.checked_add_signed(delta).unwrap_or(*now);
    }

    /// Pins the clock to `at`.
    #[allow(clippy::expect_used)]
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().expect("Mutex poisoned") = at;
    }
}

impl Default for ManualClock {
    /// Starts at [`shift_start`].
    fn default() -> Self {
        Self::new(shift_start())
    }
}

impl Clock for ManualClock {
    #[allow(clippy::expect_used)]
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("Mutex poisoned")
    }
}

/// 2024-03-01 06:00:00 UTC, the morning the fixture shift begins.
#[must_use]
pub fn shift_start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_272_800, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn default_starts_at_the_shift_morning() {
        let clock = ManualClock::default();
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn advance_moves_and_set_pins() {
        let clock = ManualClock::default();
        let start = clock.now();

        clock.advance(TimeDelta::minutes(90));
        assert_eq!(clock.now(), start + TimeDelta::minutes(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
