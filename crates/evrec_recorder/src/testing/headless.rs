//! Headless window and event source.
//!
//! Stand-ins for a real window backend, useful for:
//! - Unit and integration testing of record/replay sessions
//! - Replaying logs in CI without a display
//! - Inspecting which window mutations a replay performed

use evrec_platform::{Event, EventSource, MonitorId, Window};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// A window mutation applied through the [`Window`] trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowCommand {
    SetPosition { x: i32, y: i32 },
    SetSize { width: u32, height: u32 },
    Maximize,
    Restore,
    SetCursorPosition { x: i32, y: i32 },
    SetShouldClose(bool),
}

#[derive(Debug)]
struct HeadlessState {
    position: (i32, i32),
    size: (u32, u32),
    maximized: bool,
    cursor: (i32, i32),
    should_close: bool,
    commands: Vec<WindowCommand>,
}

/// An in-memory window that records every mutation applied to it.
#[derive(Debug)]
pub struct HeadlessWindow {
    state: Mutex<HeadlessState>,
    monitors: HashMap<MonitorId, String>,
    joysticks: HashMap<i32, String>,
}

impl HeadlessWindow {
    /// Create a window with the given inner size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                position: (0, 0),
                size: (width, height),
                maximized: false,
                cursor: (0, 0),
                should_close: false,
                commands: Vec::new(),
            }),
            monitors: HashMap::new(),
            joysticks: HashMap::new(),
        }
    }

    /// Register a monitor name for diagnostic lookups
    pub fn with_monitor(mut self, monitor: MonitorId, name: impl Into<String>) -> Self {
        self.monitors.insert(monitor, name.into());
        self
    }

    /// Register a joystick name for diagnostic lookups
    pub fn with_joystick(mut self, joystick: i32, name: impl Into<String>) -> Self {
        self.joysticks.insert(joystick, name.into());
        self
    }

    pub fn position(&self) -> (i32, i32) {
        self.state.lock().position
    }

    pub fn is_maximized(&self) -> bool {
        self.state.lock().maximized
    }

    pub fn cursor_position(&self) -> (i32, i32) {
        self.state.lock().cursor
    }

    /// Every mutation applied so far, in order
    pub fn commands(&self) -> Vec<WindowCommand> {
        self.state.lock().commands.clone()
    }

    fn apply(&self, command: WindowCommand) {
        let mut state = self.state.lock();
        match command {
            WindowCommand::SetPosition { x, y } => state.position = (x, y),
            WindowCommand::SetSize { width, height } => state.size = (width, height),
            WindowCommand::Maximize => state.maximized = true,
            WindowCommand::Restore => state.maximized = false,
            WindowCommand::SetCursorPosition { x, y } => state.cursor = (x, y),
            WindowCommand::SetShouldClose(close) => state.should_close = close,
        }
        state.commands.push(command);
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Window for HeadlessWindow {
    fn size(&self) -> (u32, u32) {
        self.state.lock().size
    }

    fn set_position(&self, x: i32, y: i32) {
        self.apply(WindowCommand::SetPosition { x, y });
    }

    fn set_size(&self, width: u32, height: u32) {
        self.apply(WindowCommand::SetSize { width, height });
    }

    fn maximize(&self) {
        self.apply(WindowCommand::Maximize);
    }

    fn restore(&self) {
        self.apply(WindowCommand::Restore);
    }

    fn set_cursor_position(&self, x: i32, y: i32) {
        self.apply(WindowCommand::SetCursorPosition { x, y });
    }

    fn set_should_close(&self, close: bool) {
        self.apply(WindowCommand::SetShouldClose(close));
    }

    fn should_close(&self) -> bool {
        self.state.lock().should_close
    }

    fn monitor_name(&self, monitor: MonitorId) -> Option<String> {
        self.monitors.get(&monitor).cloned()
    }

    fn joystick_name(&self, joystick: i32) -> Option<String> {
        self.joysticks.get(&joystick).cloned()
    }
}

/// An event source fed from a script of per-frame event batches.
///
/// Each `pump_events` call queues the next batch. Once the script is
/// exhausted the window's close flag is raised, ending any capture loop,
/// unless the source was built with [`HeadlessEventSource::keep_open`].
pub struct HeadlessEventSource {
    window: HeadlessWindow,
    script: VecDeque<Vec<Event>>,
    queue: VecDeque<Event>,
    close_when_exhausted: bool,
    pump_count: u64,
}

impl HeadlessEventSource {
    pub fn new(window: HeadlessWindow) -> Self {
        Self {
            window,
            script: VecDeque::new(),
            queue: VecDeque::new(),
            close_when_exhausted: true,
            pump_count: 0,
        }
    }

    /// Append one frame's worth of events to the script
    pub fn with_frame(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.script.push_back(events.into_iter().collect());
        self
    }

    /// Append one frame per event
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.script.extend(events.into_iter().map(|e| vec![e]));
        self
    }

    /// Leave the close flag alone when the script runs out
    pub fn keep_open(mut self) -> Self {
        self.close_when_exhausted = false;
        self
    }

    /// Queue an event directly, bypassing the script
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Number of `pump_events` calls so far
    pub fn pump_count(&self) -> u64 {
        self.pump_count
    }

    /// Scripted frames not yet pumped
    pub fn remaining_frames(&self) -> usize {
        self.script.len()
    }
}

impl EventSource for HeadlessEventSource {
    type Window = HeadlessWindow;

    fn window(&self) -> &HeadlessWindow {
        &self.window
    }

    fn pump_events(&mut self) {
        self.pump_count += 1;
        match self.script.pop_front() {
            Some(batch) => self.queue.extend(batch),
            None if self.close_when_exhausted => self.window.set_should_close(true),
            None => {}
        }
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }
}
