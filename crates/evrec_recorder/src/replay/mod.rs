//! Replay engine for recorded event logs.
//!
//! This module provides:
//! - `EventLog` - A log loaded wholesale into memory
//! - `ReplayClock` / `Pacer` - Recorded-time pacing between records
//! - `ReplayPlayer` - Dispatch records to a live window at the recorded pace
//!
//! # Example
//!
//! ```ignore
//! use evrec_recorder::replay::{ReplayConfig, ReplayPlayer};
//!
//! let mut player = ReplayPlayer::new(ReplayConfig::default().with_speed(2.0));
//! player.play_file(&mut source, "data.bin", || app.update_and_draw(), |event| {
//!     app.handle(event);
//! })?;
//! ```

mod clock;
mod player;
mod reactions;

pub use clock::{Pacer, ReplayClock, ThreadPacer, MAX_SPEED, MIN_SPEED};
pub use player::{EventLog, PlaybackStats, ReplayConfig, ReplayPlayer};
pub use reactions::{apply_default_reaction, has_default_reaction};
