//! evrec Platform Abstraction
//!
//! Shared vocabulary between window backends and the event recorder:
//!
//! - **Events**: window, pointer, keyboard, file-drop and hot-plug events
//! - **Window**: the mutators a replay applies to a live window
//! - **EventSource**: non-blocking pump and drain of a host event queue

pub mod error;
pub mod event;
pub mod window;

pub use error::{PlatformError, Result};
pub use event::{Event, KeyCode, Modifiers, MonitorId};
pub use window::{EventSource, Window, WindowConfig};
