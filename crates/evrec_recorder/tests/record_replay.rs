//! End-to-end record and replay through real log files.

use evrec_platform::{Event, EventSource, KeyCode, Modifiers, Window};
use evrec_recorder::format::{write_record, LENGTH_PREFIX_SIZE};
use evrec_recorder::testing::{
    HeadlessEventSource, HeadlessWindow, RecordingPacer, ScriptedClock,
};
use evrec_recorder::{
    save_png, EventLog, Recorder, RecorderError, ReplayConfig, ReplayPlayer, ScreenshotError,
    Timestamp, TimestampedEvent,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn session_events() -> Vec<Event> {
    vec![
        Event::WindowMoved { x: 120, y: 80 },
        Event::CursorEntered,
        Event::CursorMoved { x: 10, y: 12 },
        Event::KeyPressed {
            key: KeyCode::A,
            scancode: 0x1e,
            mods: Modifiers::new(true, false, false, false),
        },
        Event::CodepointInput { codepoint: 'A' as u32 },
        Event::Scrolled { x: 0.0, y: -1.5 },
        Event::FileDropped {
            paths: vec![PathBuf::from("/tmp/a.txt"), PathBuf::from("/tmp/b c.txt")],
        },
        Event::WindowResized {
            width: 1024,
            height: 768,
        },
    ]
}

fn record_session(path: &Path, events: Vec<Event>, clock: ScriptedClock) -> usize {
    let mut source = HeadlessEventSource::new(HeadlessWindow::default()).with_events(events);
    Recorder::new(path)
        .with_clock(clock)
        .with_echo(false)
        .run(&mut source, || {}, |_| {})
        .unwrap()
        .events
}

fn replay_session(
    path: &Path,
    config: ReplayConfig,
) -> (Vec<Event>, HeadlessEventSource, RecordingPacer) {
    let pacer = RecordingPacer::new();
    let mut player = ReplayPlayer::new(config).with_pacer(pacer.clone());
    let mut source = HeadlessEventSource::new(HeadlessWindow::default()).keep_open();
    let mut seen = Vec::new();
    player
        .play_file(&mut source, path, || {}, |e| seen.push(e.clone()))
        .unwrap();
    (seen, source, pacer)
}

#[test]
fn replay_preserves_recorded_order_and_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");

    let recorded = record_session(
        &path,
        session_events(),
        ScriptedClock::fixed(1_700_000_000),
    );
    assert_eq!(recorded, session_events().len());

    let (seen, _, _) = replay_session(&path, ReplayConfig::default());
    assert_eq!(seen, session_events());
}

#[test]
fn replaying_twice_dispatches_the_same_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    record_session(&path, session_events(), ScriptedClock::new([10, 10, 11, 13]));

    let (first, _, first_pacer) = replay_session(&path, ReplayConfig::default());
    let (second, _, second_pacer) = replay_session(&path, ReplayConfig::default());

    assert_eq!(first, second);
    assert_eq!(first_pacer.waits(), second_pacer.waits());
    assert!(!fs::read(&path).unwrap().is_empty());
}

#[test]
fn waits_follow_recorded_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    record_session(
        &path,
        vec![Event::WindowFocused, Event::WindowDefocused],
        ScriptedClock::new([50, 53]),
    );

    let (seen, _, pacer) = replay_session(&path, ReplayConfig::default());

    assert_eq!(seen.len(), 2);
    assert_eq!(pacer.waits(), vec![Duration::from_secs(3)]);
}

#[test]
fn thread_pacer_sleeps_through_recorded_gap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    record_session(
        &path,
        vec![Event::CursorEntered, Event::CursorLeft],
        ScriptedClock::new([200, 201]),
    );

    let mut player = ReplayPlayer::default();
    let mut source = HeadlessEventSource::new(HeadlessWindow::default()).keep_open();
    let mut seen = Vec::new();

    let started = Instant::now();
    let stats = player
        .play_file(&mut source, &path, || {}, |e| seen.push(e.clone()))
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(seen, vec![Event::CursorEntered, Event::CursorLeft]);
    assert_eq!(stats.waited, Duration::from_secs(1));
    assert!(elapsed >= Duration::from_millis(950), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
}

#[test]
fn default_reactions_reproduce_window_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    record_session(&path, session_events(), ScriptedClock::fixed(0));

    let (_, source, _) = replay_session(&path, ReplayConfig::default());
    let window = source.window();
    assert_eq!(window.position(), (120, 80));
    assert_eq!(window.cursor_position(), (10, 12));
    assert_eq!(window.size(), (1024, 768));

    let (_, untouched, _) =
        replay_session(&path, ReplayConfig::default().with_default_reactions(false));
    assert!(untouched.window().commands().is_empty());
}

#[test]
fn empty_log_plays_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    fs::File::create(&path).unwrap();

    let (seen, source, pacer) = replay_session(&path, ReplayConfig::default());

    assert!(seen.is_empty());
    assert!(pacer.waits().is_empty());
    assert_eq!(source.pump_count(), 0);
}

#[test]
fn truncated_final_record_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");

    let mut bytes = Vec::new();
    for (secs, event) in [(1, Event::WindowFocused), (2, Event::CursorEntered)] {
        write_record(
            &mut bytes,
            &TimestampedEvent::new(Timestamp::from_secs(secs), event),
        )
        .unwrap();
    }
    let full_len = bytes.len();
    write_record(
        &mut bytes,
        &TimestampedEvent::new(Timestamp::from_secs(3), Event::WindowClosed),
    )
    .unwrap();
    // Keep the length prefix and part of the body
    bytes.truncate(full_len + LENGTH_PREFIX_SIZE + 3);
    fs::File::create(&path).unwrap().write_all(&bytes).unwrap();

    let log = EventLog::load(&path).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.trailing_bytes(), LENGTH_PREFIX_SIZE + 3);

    let (seen, source, _) = replay_session(&path, ReplayConfig::default());
    assert_eq!(seen, vec![Event::WindowFocused, Event::CursorEntered]);
    assert!(!source.window().should_close());
}

#[test]
fn missing_log_reports_error_and_dispatches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut player = ReplayPlayer::default().with_pacer(RecordingPacer::new());
    let mut source = HeadlessEventSource::new(HeadlessWindow::default()).keep_open();
    let mut handled = 0;
    let mut frames = 0;

    let err = player
        .play_file(
            &mut source,
            dir.path().join("does-not-exist.bin"),
            || frames += 1,
            |_| handled += 1,
        )
        .unwrap_err();

    assert!(matches!(err, RecorderError::Open { .. }));
    assert_eq!((handled, frames), (0, 0));
}

#[test]
fn recorder_reports_unwritable_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("data.bin");
    let mut source =
        HeadlessEventSource::new(HeadlessWindow::default()).with_events([Event::WindowFocused]);
    let mut frames = 0;

    let err = Recorder::new(&path)
        .with_echo(false)
        .run(&mut source, || frames += 1, |_| {})
        .unwrap_err();

    assert!(matches!(err, RecorderError::Open { .. }));
    assert_eq!(frames, 0);
}

#[test]
fn screenshot_of_empty_readback_fails_without_file() {
    struct Blank;
    impl evrec_recorder::FrameReadback for Blank {
        fn read_front_buffer(&self, _: u32, _: u32, _: u32, _: u32) -> Vec<u8> {
            Vec::new()
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screenshot.png");

    let err = save_png(&Blank, &path, 800, 600).unwrap_err();

    assert!(matches!(err, ScreenshotError::BufferSize { actual: 0, .. }));
    assert!(!path.exists());
}
