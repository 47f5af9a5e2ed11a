//! Timestamp source for operation log entries.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// A clock that provides the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wraps a clock so readings never go backwards, at millisecond precision.
///
/// If the inner clock steps back (NTP adjustment, a fake clock being reset),
/// the last issued instant is repeated until the inner clock catches up.
pub struct MonotonicClock {
    inner: Box<dyn Clock>,
    last_millis: AtomicI64,
}

impl MonotonicClock {
    pub fn new(inner: impl Clock + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            last_millis: AtomicI64::new(i64::MIN),
        }
    }

    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::system()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = self.inner.now().timestamp_millis();
        let prev = self.last_millis.fetch_max(wall, Ordering::AcqRel);
        let millis = prev.max(wall);
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<AtomicI64>,
}

impl FakeClock {
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance_millis(&self, millis: i64) {
        self.current.fetch_add(millis, Ordering::AcqRel);
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.current
            .store(instant.timestamp_millis(), Ordering::Release);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.current.load(Ordering::Acquire))
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn fake_clock_advances() {
        let clock = FakeClock::at(start());
        clock.advance_millis(1500);
        assert_eq!(clock.now().timestamp_millis(), start().timestamp_millis() + 1500);
    }

    #[test]
    fn monotonic_clock_never_steps_back() {
        let fake = FakeClock::at(start());
        let clock = MonotonicClock::new(fake.clone());

        let first = clock.now();
        fake.set(start() - chrono::Duration::seconds(30));
        let second = clock.now();
        assert_eq!(second, first);

        fake.set(start() + chrono::Duration::seconds(1));
        let third = clock.now();
        assert!(third > second);
    }

    #[test]
    fn monotonic_clock_truncates_to_millis() {
        let clock = MonotonicClock::system();
        let now = clock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
