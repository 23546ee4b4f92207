//! Built-in reactions to replayed structural events.
//!
//! Window geometry, maximize state, cursor position and close requests are
//! applied straight to the live window so a replay reproduces them even when
//! the application handler ignores them.

use evrec_platform::{Event, Window};

/// Apply the default reaction for `event`, returning whether the window was touched.
pub fn apply_default_reaction<W: Window + ?Sized>(window: &W, event: &Event) -> bool {
    match *event {
        Event::WindowMoved { x, y } => window.set_position(x, y),
        Event::WindowClosed => window.set_should_close(true),
        Event::WindowResized { width, height } => window.set_size(width, height),
        Event::WindowMaximized => window.maximize(),
        Event::WindowUnmaximized => window.restore(),
        Event::CursorMoved { x, y } => window.set_cursor_position(x, y),
        _ => return false,
    }
    true
}

/// Whether `event` has a built-in reaction
pub fn has_default_reaction(event: &Event) -> bool {
    matches!(
        event,
        Event::WindowMoved { .. }
            | Event::WindowClosed
            | Event::WindowResized { .. }
            | Event::WindowMaximized
            | Event::WindowUnmaximized
            | Event::CursorMoved { .. }
    )
}
