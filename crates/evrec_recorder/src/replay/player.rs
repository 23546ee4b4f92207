//! Replay player for recorded event logs.
//!
//! Loads a whole log into memory, then dispatches records in file order,
//! waiting out the recorded gap between consecutive timestamps.

use super::clock::{Pacer, ReplayClock, ThreadPacer};
use super::reactions::apply_default_reaction;
use crate::error::{RecorderError, Result};
use crate::format::{decode_records, TimestampedEvent};
use evrec_platform::{Event, EventSource};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Configuration for the replay player.
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Playback speed (1.0 = recorded pace)
    pub speed: f64,
    /// Apply built-in window reactions before the application handler
    pub default_reactions: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            default_reactions: true,
        }
    }
}

impl ReplayConfig {
    /// Set the playback speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Enable or disable the built-in window reactions.
    pub fn with_default_reactions(mut self, enabled: bool) -> Self {
        self.default_reactions = enabled;
        self
    }
}

/// A fully loaded event log.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    records: Vec<TimestampedEvent>,
    skipped: usize,
    trailing_bytes: usize,
}

impl EventLog {
    /// Build a log from records already in memory
    pub fn from_records(records: Vec<TimestampedEvent>) -> Self {
        Self {
            records,
            skipped: 0,
            trailing_bytes: 0,
        }
    }

    /// Decode a log from raw file bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let decoded = decode_records(bytes);
        Self {
            records: decoded.records,
            skipped: decoded.skipped,
            trailing_bytes: decoded.trailing_bytes,
        }
    }

    /// Read and decode the log at `path` in one pass.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| RecorderError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| RecorderError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let log = Self::from_bytes(&bytes);
        debug!(
            "Loaded {} records from {} ({} bytes, {} skipped, {} trailing)",
            log.len(),
            path.display(),
            bytes.len(),
            log.skipped,
            log.trailing_bytes
        );
        Ok(log)
    }

    /// Records in file order
    pub fn records(&self) -> &[TimestampedEvent] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Complete records that were dropped during decoding
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Bytes of an incomplete final record that were ignored
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    /// Recorded span from the first to the last record
    pub fn duration(&self) -> Duration {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last.timestamp.duration_since(first.timestamp),
            _ => Duration::ZERO,
        }
    }
}

/// Summary of a finished playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Records dispatched to the application
    pub dispatched: usize,
    /// Total time spent waiting between records
    pub waited: Duration,
    /// Live events discarded while the replay owned the window
    pub discarded_live: usize,
}

/// Replays event logs against a live event source.
pub struct ReplayPlayer<P: Pacer = ThreadPacer> {
    config: ReplayConfig,
    pacer: P,
}

impl ReplayPlayer<ThreadPacer> {
    /// Create a player that sleeps the calling thread between records
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            pacer: ThreadPacer,
        }
    }
}

impl Default for ReplayPlayer<ThreadPacer> {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}

impl<P: Pacer> ReplayPlayer<P> {
    /// Use a different pacer for the waits between records
    pub fn with_pacer<P2: Pacer>(self, pacer: P2) -> ReplayPlayer<P2> {
        ReplayPlayer {
            config: self.config,
            pacer,
        }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Load the log at `path` and play it.
    ///
    /// If the file cannot be opened nothing is dispatched.
    pub fn play_file<S, F, H>(
        &mut self,
        source: &mut S,
        path: impl AsRef<Path>,
        update_and_draw: F,
        on_event: H,
    ) -> Result<PlaybackStats>
    where
        S: EventSource,
        F: FnMut(),
        H: FnMut(&Event),
    {
        let path = path.as_ref();
        let log = EventLog::load(path)?;
        info!(
            "Playing back {} recorded events from {}",
            log.len(),
            path.display()
        );
        Ok(self.play(source, &log, update_and_draw, on_event))
    }

    /// Dispatch every record of `log` in order, paced by the recorded timestamps.
    ///
    /// Dispatching a record applies its default window reaction (if enabled),
    /// passes it to `on_event`, then calls `update_and_draw` once. The live
    /// source is pumped after each record so the window stays responsive;
    /// live events are discarded.
    pub fn play<S, F, H>(
        &mut self,
        source: &mut S,
        log: &EventLog,
        mut update_and_draw: F,
        mut on_event: H,
    ) -> PlaybackStats
    where
        S: EventSource,
        F: FnMut(),
        H: FnMut(&Event),
    {
        let mut clock = ReplayClock::new(self.config.speed);
        let mut stats = PlaybackStats::default();

        for record in log.records() {
            let wait = clock.advance_to(record.timestamp);
            if !wait.is_zero() {
                trace!("Waiting {:?} before next event", wait);
                self.pacer.wait(wait);
                stats.waited = stats.waited.saturating_add(wait);
            }

            if self.config.default_reactions {
                apply_default_reaction(source.window(), &record.event);
            }
            on_event(&record.event);
            update_and_draw();
            stats.dispatched += 1;

            source.pump_events();
            stats.discarded_live += source.drain_events();
        }

        info!(
            "Playback finished: {} events in {:?}",
            stats.dispatched, stats.waited
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HeadlessEventSource, HeadlessWindow, RecordingPacer};
    use crate::timestamp::Timestamp;

    fn record(secs: i64, event: Event) -> TimestampedEvent {
        TimestampedEvent::new(Timestamp::from_secs(secs), event)
    }

    fn create_test_log() -> EventLog {
        EventLog::from_records(vec![
            record(100, Event::WindowMoved { x: 10, y: 20 }),
            record(100, Event::CursorEntered),
            record(102, Event::CursorMoved { x: 5, y: 5 }),
            record(105, Event::WindowClosed),
        ])
    }

    fn headless_source() -> HeadlessEventSource {
        HeadlessEventSource::new(HeadlessWindow::default()).keep_open()
    }

    #[test]
    fn test_player_dispatch_order_and_waits() {
        let pacer = RecordingPacer::new();
        let mut player = ReplayPlayer::new(ReplayConfig::default()).with_pacer(pacer.clone());
        let mut source = headless_source();
        let mut seen = Vec::new();
        let mut frames = 0;

        let stats = player.play(
            &mut source,
            &create_test_log(),
            || frames += 1,
            |e| seen.push(e.kind()),
        );

        assert_eq!(
            seen,
            vec!["window_moved", "cursor_entered", "cursor_moved", "window_closed"]
        );
        assert_eq!(frames, 4);
        assert_eq!(stats.dispatched, 4);
        assert_eq!(
            pacer.waits(),
            vec![Duration::from_secs(2), Duration::from_secs(3)]
        );
        assert_eq!(stats.waited, Duration::from_secs(5));
    }

    #[test]
    fn test_huge_gaps_saturate_total_wait() {
        let pacer = RecordingPacer::new();
        let config = ReplayConfig::default().with_speed(0.1);
        let mut player = ReplayPlayer::new(config).with_pacer(pacer.clone());
        let mut source = headless_source();
        let log = EventLog::from_records(vec![
            record(i64::MIN, Event::CursorEntered),
            record(i64::MAX, Event::CursorLeft),
            record(i64::MIN, Event::CursorEntered),
            record(i64::MAX, Event::CursorLeft),
        ]);

        let stats = player.play(&mut source, &log, || {}, |_| {});

        assert_eq!(stats.dispatched, 4);
        assert_eq!(pacer.waits(), vec![Duration::MAX, Duration::MAX]);
        assert_eq!(stats.waited, Duration::MAX);
    }

    #[test]
    fn test_default_reactions_applied() {
        let mut player =
            ReplayPlayer::new(ReplayConfig::default()).with_pacer(RecordingPacer::new());
        let mut source = headless_source();

        player.play(&mut source, &create_test_log(), || {}, |_| {});

        let window = source.window();
        assert_eq!(window.position(), (10, 20));
        assert_eq!(window.cursor_position(), (5, 5));
        assert!(evrec_platform::Window::should_close(window));
    }

    #[test]
    fn test_default_reactions_can_be_skipped() {
        let config = ReplayConfig::default().with_default_reactions(false);
        let mut player = ReplayPlayer::new(config).with_pacer(RecordingPacer::new());
        assert!(!player.config().default_reactions);
        let mut source = headless_source();
        let mut handled = 0;

        player.play(&mut source, &create_test_log(), || {}, |_| handled += 1);

        assert_eq!(handled, 4);
        assert!(source.window().commands().is_empty());
    }

    #[test]
    fn test_speed_shortens_waits() {
        let pacer = RecordingPacer::new();
        let mut player =
            ReplayPlayer::new(ReplayConfig::default().with_speed(2.0)).with_pacer(pacer.clone());
        let mut source = headless_source();

        player.play(&mut source, &create_test_log(), || {}, |_| {});

        assert_eq!(
            pacer.waits(),
            vec![Duration::from_secs(1), Duration::from_millis(1500)]
        );
    }

    #[test]
    fn test_live_events_are_discarded() {
        let mut player =
            ReplayPlayer::new(ReplayConfig::default()).with_pacer(RecordingPacer::new());
        let mut source = HeadlessEventSource::new(HeadlessWindow::default())
            .with_frame([Event::CursorEntered, Event::CursorLeft])
            .keep_open();
        let mut seen = Vec::new();

        let stats = player.play(
            &mut source,
            &EventLog::from_records(vec![record(1, Event::WindowFocused)]),
            || {},
            |e| seen.push(e.clone()),
        );

        assert_eq!(seen, vec![Event::WindowFocused]);
        assert_eq!(stats.discarded_live, 2);
    }

    #[test]
    fn test_empty_log_is_noop() {
        let mut player =
            ReplayPlayer::new(ReplayConfig::default()).with_pacer(RecordingPacer::new());
        let mut source = headless_source();
        let mut frames = 0;

        let stats = player.play(&mut source, &EventLog::default(), || frames += 1, |_| {});

        assert_eq!(stats, PlaybackStats::default());
        assert_eq!(frames, 0);
        assert_eq!(source.pump_count(), 0);
    }

    #[test]
    fn test_log_duration() {
        assert_eq!(create_test_log().duration(), Duration::from_secs(5));
        assert_eq!(EventLog::default().duration(), Duration::ZERO);
    }

    #[test]
    fn test_missing_file_dispatches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut player =
            ReplayPlayer::new(ReplayConfig::default()).with_pacer(RecordingPacer::new());
        let mut source = headless_source();
        let mut handled = 0;

        let err = player
            .play_file(&mut source, dir.path().join("nope.bin"), || {}, |_| handled += 1)
            .unwrap_err();

        assert!(matches!(err, RecorderError::Open { .. }));
        assert_eq!(handled, 0);
        assert!(source.window().commands().is_empty());
    }
}
