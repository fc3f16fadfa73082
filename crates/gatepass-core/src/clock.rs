//! Wall-clock abstraction for deterministic testing.
//!
//! Pass issuing stamps `encodedAt` and the stores stamp `lastUpdated`; both
//! read time through this trait so tests can pin the clock instead of
//! sleeping or fuzzing around `Utc::now()`.

use chrono::{DateTime, Utc};

/// Source of wall-clock time.
///
/// Object-safe so stores can hold `Arc<dyn Clock>`. Civil time (not a
/// monotonic instant) because the timestamps end up inside documents read by
/// humans and other systems.
pub trait Clock: Send + Sync {
    /// Current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
