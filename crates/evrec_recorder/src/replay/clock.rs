//! Replay pacing.
//!
//! Converts the gap between two recorded timestamps into a real-time wait,
//! scaled by the playback speed.

use crate::timestamp::Timestamp;
use std::time::Duration;

/// Lowest accepted playback speed
pub const MIN_SPEED: f64 = 0.1;
/// Highest accepted playback speed
pub const MAX_SPEED: f64 = 10.0;

/// Blocks the replay thread between record dispatches.
pub trait Pacer {
    fn wait(&mut self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Tracks the replay position in recorded time and yields the wait before
/// each record.
#[derive(Debug)]
pub struct ReplayClock {
    /// Timestamp of the last dispatched record
    current: Option<Timestamp>,
    /// Playback speed multiplier (1.0 = recorded pace, 2.0 = twice as fast)
    speed: f64,
}

impl ReplayClock {
    pub fn new(speed: f64) -> Self {
        Self {
            current: None,
            speed: clamp_speed(speed),
        }
    }

    /// Current position in recorded time, if any record has been reached
    pub fn position(&self) -> Option<Timestamp> {
        self.current
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the playback speed, clamped to a sane range
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = clamp_speed(speed);
    }

    /// Advance to `next` and return how long to wait before dispatching it.
    ///
    /// The first record establishes the baseline and never waits. Records at
    /// or before the current position do not wait either.
    pub fn advance_to(&mut self, next: Timestamp) -> Duration {
        let wait = match self.current {
            None => Duration::ZERO,
            Some(current) => next.duration_since(current),
        };
        self.current = Some(next);

        if wait.is_zero() {
            wait
        } else {
            // Slow playback of a huge gap can overflow; wait forever instead
            Duration::try_from_secs_f64(wait.as_secs_f64() / self.speed).unwrap_or(Duration::MAX)
        }
    }

    /// Forget the baseline
    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        1.0
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}
