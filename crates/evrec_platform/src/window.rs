//! Window control and event source traits

use crate::event::{Event, MonitorId};

/// Window creation settings
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "evrec".to_string(),
            width: 800,
            height: 600,
            resizable: true,
        }
    }
}

/// A live window that replayed events can be applied against.
///
/// Methods take `&self`; backends synchronise internally.
pub trait Window {
    /// Inner size in physical pixels
    fn size(&self) -> (u32, u32);

    /// Move the window's top-left corner to screen coordinates
    fn set_position(&self, x: i32, y: i32);

    /// Resize the window's content area
    fn set_size(&self, width: u32, height: u32);

    fn maximize(&self);

    /// Restore from the maximized state
    fn restore(&self);

    /// Warp the cursor to window-relative coordinates
    fn set_cursor_position(&self, x: i32, y: i32);

    /// Raise or clear the close-request flag
    fn set_should_close(&self, close: bool);

    /// Whether the host has requested the window to close
    fn should_close(&self) -> bool;

    /// Human-readable monitor name, if the monitor is known
    fn monitor_name(&self, monitor: MonitorId) -> Option<String>;

    /// Human-readable joystick name, if the joystick is connected
    fn joystick_name(&self, joystick: i32) -> Option<String>;
}

/// A non-blocking source of window and input events.
///
/// `pump_events` moves pending OS events into the source's queue without
/// waiting; `poll_event` pops one queued event, returning `None` once the
/// queue is drained.
pub trait EventSource {
    type Window: Window;

    /// The window events are delivered for
    fn window(&self) -> &Self::Window;

    /// Process pending OS events without blocking
    fn pump_events(&mut self);

    /// Pop the next queued event
    fn poll_event(&mut self) -> Option<Event>;

    /// Discard everything currently queued, returning how many events were dropped
    fn drain_events(&mut self) -> usize {
        let mut dropped = 0;
        while self.poll_event().is_some() {
            dropped += 1;
        }
        dropped
    }
}
