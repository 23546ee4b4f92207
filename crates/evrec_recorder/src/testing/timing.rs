//! Deterministic clock and pacer doubles.

use crate::replay::Pacer;
use crate::timestamp::{Timestamp, WallClock};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// A wall clock that replays a fixed sequence of readings.
///
/// Each `now()` consumes one reading; the last reading repeats forever.
#[derive(Debug)]
pub struct ScriptedClock {
    readings: Mutex<VecDeque<Timestamp>>,
    last: Mutex<Timestamp>,
}

impl ScriptedClock {
    pub fn new(readings: impl IntoIterator<Item = i64>) -> Self {
        Self {
            readings: Mutex::new(readings.into_iter().map(Timestamp::from_secs).collect()),
            last: Mutex::new(Timestamp::default()),
        }
    }

    /// A clock stuck at one second
    pub fn fixed(secs: i64) -> Self {
        Self::new([secs])
    }
}

impl WallClock for ScriptedClock {
    fn now(&self) -> Timestamp {
        let mut last = self.last.lock();
        if let Some(next) = self.readings.lock().pop_front() {
            *last = next;
        }
        *last
    }
}

/// A pacer that records requested waits instead of sleeping.
///
/// Clones share the same log, so a clone can be kept for assertions after
/// the first is moved into a player.
#[derive(Clone, Debug, Default)]
pub struct RecordingPacer {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }

    /// Sum of all requested waits
    pub fn total(&self) -> Duration {
        self.waits.lock().iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn wait(&mut self, duration: Duration) {
        self.waits.lock().push(duration);
    }
}
