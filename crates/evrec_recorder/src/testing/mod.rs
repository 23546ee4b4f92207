//! Test doubles for driving sessions without a display or real time.

mod headless;
mod timing;

pub use headless::{HeadlessEventSource, HeadlessWindow, WindowCommand};
pub use timing::{RecordingPacer, ScriptedClock};
