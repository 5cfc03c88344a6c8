//! # Clock
//!
//! Source of "now" for expiry decisions.
//!
//! The engine never reads the ambient system time directly; it asks a
//! [`Clock`]. Production code uses [`SystemClock`], tests drive a
//! [`ManualClock`] to simulate elapsed time.
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::domain::services::clock::{Clock, ManualClock};
//! use offer_negotiation::domain::value_objects::Timestamp;
//!
//! let start = Timestamp::from_secs(1_700_000_000).unwrap();
//! let clock = ManualClock::new(start);
//! clock.advance_secs(90);
//!
//! assert_eq!(clock.now(), start.add_secs(90));
//! ```

use crate::domain::value_objects::Timestamp;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Provides the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: Timestamp) {
        *self.now.lock() = at;
    }

    /// Moves the clock forward by `secs` seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now = now.add_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let start = Timestamp::from_secs(1_000).unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();

        other.advance_secs(30);
        assert_eq!(clock.now(), start.add_secs(30));

        clock.set(start);
        assert_eq!(other.now(), start);
    }

    #[test]
    fn system_clock_moves_forward() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(!b.is_before(&a));
    }
}
