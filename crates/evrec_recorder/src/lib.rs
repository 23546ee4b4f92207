//! evrec Recorder
//!
//! Event log recording, timed replay and screenshot capture for windowed
//! applications.
//!
//! # Features
//!
//! - Record every window and input event with a wall-clock timestamp
//! - Replay a log at the recorded pace, optionally sped up or slowed down
//! - Built-in window reactions so replays reproduce geometry changes
//! - Front-buffer screenshots as PNG or TGA
//! - Headless test doubles for driving sessions without a display

pub mod capture;
pub mod echo;
pub mod error;
pub mod format;
pub mod render;
pub mod replay;
pub mod screenshot;
pub mod testing;
pub mod timestamp;

pub use capture::{record_into_log, Recorder, RecordingStats};
pub use error::{FormatError, RecorderError, Result, ScreenshotError};
pub use format::TimestampedEvent;
pub use render::{render, RenderMode, SessionConfig, DEFAULT_LOG_FILE};
pub use replay::{EventLog, PlaybackStats, ReplayConfig, ReplayPlayer};
pub use screenshot::{save_png, save_tga, CapturedFrame, FrameReadback, TestPattern};
pub use timestamp::{SystemClock, Timestamp, WallClock};
