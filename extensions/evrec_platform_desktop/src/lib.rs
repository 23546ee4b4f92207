//! evrec Desktop Platform
//!
//! Windowing and a non-blocking event pump for macOS, Windows, and Linux.

pub mod event_loop;
pub mod input;
pub mod window;

pub use event_loop::DesktopEventSource;
pub use window::DesktopWindow;
