//! Event log writer.
//!
//! Drains the host's event queue once per frame, stamps each event with the
//! current wall-clock second and appends it to the log file.

use crate::echo::echo_event;
use crate::error::{RecorderError, Result};
use crate::format::{write_record, TimestampedEvent};
use crate::timestamp::{SystemClock, WallClock};
use evrec_platform::{Event, EventSource, Window};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary of a finished recording session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordingStats {
    /// Events drained and written to the log
    pub events: usize,
    /// Frames rendered during the session
    pub frames: u64,
    /// Bytes written to the log
    pub bytes: u64,
}

/// Records a live session into an event log file.
pub struct Recorder<C: WallClock = SystemClock> {
    path: PathBuf,
    clock: C,
    echo: bool,
}

impl Recorder<SystemClock> {
    /// Create a recorder writing to `path`, stamped by the system clock
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: SystemClock,
            echo: true,
        }
    }
}

impl<C: WallClock> Recorder<C> {
    /// Use a different clock for stamping events
    pub fn with_clock<C2: WallClock>(self, clock: C2) -> Recorder<C2> {
        Recorder {
            path: self.path,
            clock,
            echo: self.echo,
        }
    }

    /// Enable or disable the per-event diagnostic echo
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Path of the log being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the capture loop until the window is asked to close.
    ///
    /// The log is created (or truncated) before the first frame; if that
    /// fails nothing else happens. Each frame pumps the source, appends every
    /// pending event, hands it to `on_event`, and then calls
    /// `update_and_draw` once.
    pub fn run<S, F, H>(
        &self,
        source: &mut S,
        mut update_and_draw: F,
        mut on_event: H,
    ) -> Result<RecordingStats>
    where
        S: EventSource,
        F: FnMut(),
        H: FnMut(&Event),
    {
        let file = File::create(&self.path).map_err(|source| RecorderError::Open {
            path: self.path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let mut stats = RecordingStats::default();

        info!("Recording events into {}", self.path.display());

        while !source.window().should_close() {
            source.pump_events();

            while let Some(event) = source.poll_event() {
                if self.echo {
                    echo_event(source.window(), &event);
                }

                let record = TimestampedEvent::new(self.clock.now(), event);
                let written = write_record(&mut out, &record).map_err(RecorderError::Write)?;
                stats.events += 1;
                stats.bytes += written as u64;

                on_event(&record.event);
                // `record` drops here, releasing owned payloads such as path lists
            }

            update_and_draw();
            stats.frames += 1;
        }

        out.flush().map_err(RecorderError::Write)?;
        debug!(
            "Recording finished after {} frames ({} bytes)",
            stats.frames, stats.bytes
        );
        info!(
            "Recorded {} events into {}",
            stats.events,
            self.path.display()
        );

        Ok(stats)
    }
}

/// Record a session into `path` with the system clock and echo enabled.
pub fn record_into_log<S, F, H>(
    source: &mut S,
    path: impl AsRef<Path>,
    update_and_draw: F,
    on_event: H,
) -> Result<RecordingStats>
where
    S: EventSource,
    F: FnMut(),
    H: FnMut(&Event),
{
    Recorder::new(path.as_ref()).run(source, update_and_draw, on_event)
}
