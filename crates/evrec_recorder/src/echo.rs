//! Human-readable echo of captured events.

use evrec_platform::{Event, Window};

/// Tracing target used for echoed events
pub const ECHO_TARGET: &str = "evrec::events";

/// Describe an event, resolving monitor and joystick names through the window.
pub fn describe_event<W: Window + ?Sized>(window: &W, event: &Event) -> String {
    match event {
        Event::MonitorConnected { monitor } => match window.monitor_name(*monitor) {
            Some(name) => format!("Monitor \"{name}\" connected"),
            None => event.to_string(),
        },
        Event::MonitorDisconnected { monitor } => match window.monitor_name(*monitor) {
            Some(name) => format!("Monitor \"{name}\" disconnected"),
            None => event.to_string(),
        },
        Event::JoystickConnected { joystick } => match window.joystick_name(*joystick) {
            Some(name) => format!("Joystick {joystick} \"{name}\" connected"),
            None => event.to_string(),
        },
        _ => event.to_string(),
    }
}

/// Log the event's diagnostic line.
pub fn echo_event<W: Window + ?Sized>(window: &W, event: &Event) {
    tracing::info!(target: ECHO_TARGET, "{}", describe_event(window, event));
}
