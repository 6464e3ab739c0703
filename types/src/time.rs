//! Timestamps and the clock seam.
//!
//! Timestamps are Unix epoch seconds (UTC). The execution environment is
//! assumed to provide a monotonic wall-clock-like time; operations take it
//! from a `Clock` so tests can drive time deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs` (saturating).
    pub fn offset(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Whether this timestamp, read as a deadline, has elapsed at `now`.
    ///
    /// A deadline is inclusive: it elapses strictly after the deadline
    /// second itself.
    pub fn is_past(&self, now: Timestamp) -> bool {
        now.0 > self.0
    }

    /// Big-endian byte encoding, used by the endorsement digest.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time for the authorization core.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_inclusive() {
        let deadline = Timestamp::new(100);
        assert!(!deadline.is_past(Timestamp::new(99)));
        assert!(!deadline.is_past(Timestamp::new(100)));
        assert!(deadline.is_past(Timestamp::new(101)));
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(Timestamp::new(u64::MAX).offset(10).as_secs(), u64::MAX);
    }
}
