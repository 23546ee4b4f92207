//! Wall-clock timestamps with second resolution.
//!
//! Events recorded within the same second replay back to back; only the
//! gaps between distinct seconds are reproduced.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    /// Real-time gap from `earlier` to `self`; zero if `earlier` is not before `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        let delta = self.0.saturating_sub(earlier.0);
        if delta > 0 {
            Duration::from_secs(delta as u64)
        } else {
            Duration::ZERO
        }
    }
}

/// Source of the current wall-clock time for stamping captured events.
pub trait WallClock {
    fn now(&self) -> Timestamp;
}

/// The system's real-time clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_else(|e| -(e.duration().as_secs() as i64));
        Timestamp(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_since_forward_gap() {
        let t = Timestamp::from_secs(100);
        assert_eq!(
            Timestamp::from_secs(103).duration_since(t),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn duration_since_clamps_backwards_to_zero() {
        let t = Timestamp::from_secs(100);
        assert_eq!(t.duration_since(t), Duration::ZERO);
        assert_eq!(
            Timestamp::from_secs(90).duration_since(t),
            Duration::ZERO
        );
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }
}
