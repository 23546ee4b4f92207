//! Frame loop mode selection.

use crate::capture::Recorder;
use crate::error::Result;
use crate::replay::{ReplayConfig, ReplayPlayer};
use evrec_platform::{Event, EventSource, Window};
use std::path::PathBuf;

/// Default event log file name
pub const DEFAULT_LOG_FILE: &str = "data.bin";

/// How the frame loop treats events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// No recording, no playback
    #[default]
    Live,
    /// Record live events into the log
    Record,
    /// Play the log back instead of live input
    Playback,
}

/// Immutable settings for one record or playback session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub log_path: PathBuf,
    pub replay: ReplayConfig,
    /// Echo every captured event while recording
    pub echo: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            replay: ReplayConfig::default(),
            echo: true,
        }
    }
}

impl SessionConfig {
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    pub fn with_replay(mut self, replay: ReplayConfig) -> Self {
        self.replay = replay;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

/// Drive the application's frame loop in the given mode.
pub fn render<S, F, H>(
    source: &mut S,
    mode: RenderMode,
    session: &SessionConfig,
    mut update_and_draw: F,
    mut on_event: H,
) -> Result<()>
where
    S: EventSource,
    F: FnMut(),
    H: FnMut(&Event),
{
    match mode {
        RenderMode::Record => {
            Recorder::new(&session.log_path)
                .with_echo(session.echo)
                .run(source, update_and_draw, on_event)?;
        }
        RenderMode::Playback => {
            ReplayPlayer::new(session.replay.clone()).play_file(
                source,
                &session.log_path,
                update_and_draw,
                on_event,
            )?;
        }
        RenderMode::Live => {
            while !source.window().should_close() {
                source.pump_events();
                while let Some(event) = source.poll_event() {
                    on_event(&event);
                }
                update_and_draw();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::EventLog;
    use crate::testing::{HeadlessEventSource, HeadlessWindow};

    #[test]
    fn live_mode_loops_until_close() {
        let mut source = HeadlessEventSource::new(HeadlessWindow::default())
            .with_events([Event::WindowFocused, Event::CursorEntered]);
        let mut frames = 0;
        let mut events = 0;

        render(
            &mut source,
            RenderMode::Live,
            &SessionConfig::default(),
            || frames += 1,
            |_| events += 1,
        )
        .unwrap();

        assert_eq!(events, 2);
        assert_eq!(frames, 3);
    }

    #[test]
    fn record_then_playback_through_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionConfig::default()
            .with_log_path(dir.path().join("data.bin"))
            .with_echo(false);

        let mut recording = HeadlessEventSource::new(HeadlessWindow::default())
            .with_frame([Event::WindowMaximized, Event::CodepointInput { codepoint: 0x61 }]);
        render(&mut recording, RenderMode::Record, &session, || {}, |_| {}).unwrap();
        assert_eq!(EventLog::load(&session.log_path).unwrap().len(), 2);

        let mut replaying = HeadlessEventSource::new(HeadlessWindow::default()).keep_open();
        let mut seen = Vec::new();
        render(
            &mut replaying,
            RenderMode::Playback,
            &session,
            || {},
            |e| seen.push(e.clone()),
        )
        .unwrap();

        assert_eq!(
            seen,
            vec![Event::WindowMaximized, Event::CodepointInput { codepoint: 0x61 }]
        );
        assert!(replaying.window().is_maximized());
    }

    #[test]
    fn default_session_uses_data_bin() {
        assert_eq!(
            SessionConfig::default().log_path,
            PathBuf::from(DEFAULT_LOG_FILE)
        );
        assert_eq!(RenderMode::default(), RenderMode::Live);
    }
}
