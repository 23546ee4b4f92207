//! Window and input events
//!
//! A single tagged union covering everything the host event queue can
//! deliver: window state changes, pointer and keyboard input, file drops,
//! and monitor/joystick hot-plug notifications.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub struct KeyCode(pub u32);

impl KeyCode {
    // Alphanumeric keys map onto their uppercase ASCII value
    pub const A: KeyCode = KeyCode(0x41);
    pub const Z: KeyCode = KeyCode(0x5A);
    pub const KEY_0: KeyCode = KeyCode(0x30);
    pub const KEY_9: KeyCode = KeyCode(0x39);

    // Special keys
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const DELETE: KeyCode = KeyCode(0x7F);

    // Arrow keys
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);

    // Navigation keys
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const END: KeyCode = KeyCode(0x23);
    pub const PAGE_UP: KeyCode = KeyCode(0x21);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x22);

    // Modifier keys
    pub const SHIFT: KeyCode = KeyCode(0x10);
    pub const CONTROL: KeyCode = KeyCode(0x11);
    pub const ALT: KeyCode = KeyCode(0x12);
    pub const SUPER: KeyCode = KeyCode(0x5B);

    // Function keys, F1 = 0x70 .. F12 = 0x7B
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F12: KeyCode = KeyCode(0x7B);

    // Unknown/unmapped key
    pub const UNKNOWN: KeyCode = KeyCode(0);

    /// Function key `F<n>` for `n` in `1..=12`
    pub const fn function(n: u32) -> Option<KeyCode> {
        if n >= 1 && n <= 12 {
            Some(KeyCode(Self::F1.0 + n - 1))
        } else {
            None
        }
    }
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0x01;
    pub const CTRL: u8 = 0x02;
    pub const ALT: u8 = 0x04;
    pub const SUPER: u8 = 0x08;
    pub const CAPS_LOCK: u8 = 0x10;
    pub const NUM_LOCK: u8 = 0x20;

    /// Create new modifiers from flags
    pub const fn new(shift: bool, ctrl: bool, alt: bool, super_key: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if super_key {
            bits |= Self::SUPER;
        }
        Self { bits }
    }

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Raw bit representation, as stored in the event log
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub const fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub const fn super_key(&self) -> bool {
        self.bits & Self::SUPER != 0
    }

    /// Check if any modifier is pressed
    pub const fn any(&self) -> bool {
        self.bits != 0
    }
}

/// Opaque handle for a connected monitor, resolved by the window backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MonitorId(pub u32);

/// A window, input, monitor or joystick event
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Event {
    WindowMoved {
        x: i32,
        y: i32,
    },
    WindowResized {
        width: u32,
        height: u32,
    },
    /// The user asked to close the window
    WindowClosed,
    WindowRefresh,
    WindowFocused,
    WindowDefocused,
    WindowIconified,
    WindowUniconified,
    FramebufferResized {
        width: u32,
        height: u32,
    },
    ButtonPressed {
        button: u8,
        mods: Modifiers,
    },
    ButtonReleased {
        button: u8,
        mods: Modifiers,
    },
    CursorMoved {
        x: i32,
        y: i32,
    },
    CursorEntered,
    CursorLeft,
    Scrolled {
        x: f64,
        y: f64,
    },
    KeyPressed {
        key: KeyCode,
        scancode: u32,
        mods: Modifiers,
    },
    KeyRepeated {
        key: KeyCode,
        scancode: u32,
        mods: Modifiers,
    },
    KeyReleased {
        key: KeyCode,
        scancode: u32,
        mods: Modifiers,
    },
    /// Unicode character input
    CodepointInput {
        codepoint: u32,
    },
    MonitorConnected {
        monitor: MonitorId,
    },
    MonitorDisconnected {
        monitor: MonitorId,
    },
    /// One or more files dropped onto the window
    FileDropped {
        paths: Vec<PathBuf>,
    },
    JoystickConnected {
        joystick: i32,
    },
    JoystickDisconnected {
        joystick: i32,
    },
    WindowMaximized,
    WindowUnmaximized,
    WindowScaleChanged {
        x: f32,
        y: f32,
    },
}

impl Event {
    /// Short kind name, stable across payload values
    pub fn kind(&self) -> &'static str {
        match self {
            Event::WindowMoved { .. } => "window_moved",
            Event::WindowResized { .. } => "window_resized",
            Event::WindowClosed => "window_closed",
            Event::WindowRefresh => "window_refresh",
            Event::WindowFocused => "window_focused",
            Event::WindowDefocused => "window_defocused",
            Event::WindowIconified => "window_iconified",
            Event::WindowUniconified => "window_uniconified",
            Event::FramebufferResized { .. } => "framebuffer_resized",
            Event::ButtonPressed { .. } => "button_pressed",
            Event::ButtonReleased { .. } => "button_released",
            Event::CursorMoved { .. } => "cursor_moved",
            Event::CursorEntered => "cursor_entered",
            Event::CursorLeft => "cursor_left",
            Event::Scrolled { .. } => "scrolled",
            Event::KeyPressed { .. } => "key_pressed",
            Event::KeyRepeated { .. } => "key_repeated",
            Event::KeyReleased { .. } => "key_released",
            Event::CodepointInput { .. } => "codepoint_input",
            Event::MonitorConnected { .. } => "monitor_connected",
            Event::MonitorDisconnected { .. } => "monitor_disconnected",
            Event::FileDropped { .. } => "file_dropped",
            Event::JoystickConnected { .. } => "joystick_connected",
            Event::JoystickDisconnected { .. } => "joystick_disconnected",
            Event::WindowMaximized => "window_maximized",
            Event::WindowUnmaximized => "window_unmaximized",
            Event::WindowScaleChanged { .. } => "window_scale_changed",
        }
    }

    /// Check if this is a window state event
    pub fn is_window_event(&self) -> bool {
        matches!(
            self,
            Event::WindowMoved { .. }
                | Event::WindowResized { .. }
                | Event::WindowClosed
                | Event::WindowRefresh
                | Event::WindowFocused
                | Event::WindowDefocused
                | Event::WindowIconified
                | Event::WindowUniconified
                | Event::FramebufferResized { .. }
                | Event::WindowMaximized
                | Event::WindowUnmaximized
                | Event::WindowScaleChanged { .. }
        )
    }

    /// Check if this is a pointer or keyboard event
    pub fn is_input_event(&self) -> bool {
        matches!(
            self,
            Event::ButtonPressed { .. }
                | Event::ButtonReleased { .. }
                | Event::CursorMoved { .. }
                | Event::CursorEntered
                | Event::CursorLeft
                | Event::Scrolled { .. }
                | Event::KeyPressed { .. }
                | Event::KeyRepeated { .. }
                | Event::KeyReleased { .. }
                | Event::CodepointInput { .. }
        )
    }
}

/// Human-readable diagnostic line.
///
/// Monitor and joystick names are not known here; see the recorder's echo
/// for the name-resolving variant.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::WindowMoved { x, y } => write!(f, "Window moved to {x},{y}"),
            Event::WindowResized { width, height } => {
                write!(f, "Window resized to {width}x{height}")
            }
            Event::WindowClosed => f.write_str("Window close request"),
            Event::WindowRefresh => f.write_str("Window refresh request"),
            Event::WindowFocused => f.write_str("Window focused"),
            Event::WindowDefocused => f.write_str("Window defocused"),
            Event::WindowIconified => f.write_str("Window iconified"),
            Event::WindowUniconified => f.write_str("Window uniconified"),
            Event::WindowMaximized => f.write_str("Window maximized"),
            Event::WindowUnmaximized => f.write_str("Window unmaximized"),
            Event::WindowScaleChanged { x, y } => {
                write!(f, "Window content scale {x:.2}x{y:.2}")
            }
            Event::FramebufferResized { width, height } => {
                write!(f, "Framebuffer resized to {width}x{height}")
            }
            Event::ButtonPressed { button, mods } => {
                write!(f, "Mouse button {button} pressed (mods 0x{:x})", mods.bits())
            }
            Event::ButtonReleased { button, mods } => {
                write!(f, "Mouse button {button} released (mods 0x{:x})", mods.bits())
            }
            Event::CursorMoved { x, y } => write!(f, "Cursor moved to {x},{y}"),
            Event::CursorEntered => f.write_str("Cursor entered window"),
            Event::CursorLeft => f.write_str("Cursor left window"),
            Event::Scrolled { x, y } => write!(f, "Scrolled {x:.2},{y:.2}"),
            Event::KeyPressed {
                key,
                scancode,
                mods,
            } => write_key(f, "pressed", *key, *scancode, *mods),
            Event::KeyRepeated {
                key,
                scancode,
                mods,
            } => write_key(f, "repeated", *key, *scancode, *mods),
            Event::KeyReleased {
                key,
                scancode,
                mods,
            } => write_key(f, "released", *key, *scancode, *mods),
            Event::CodepointInput { codepoint } => write!(f, "Codepoint U+{codepoint:05X} input"),
            Event::FileDropped { paths } => {
                write!(f, "{} files dropped", paths.len())?;
                for path in paths {
                    write!(f, "\n\t{}", path.display())?;
                }
                Ok(())
            }
            Event::MonitorConnected { monitor } => write!(f, "Monitor #{} connected", monitor.0),
            Event::MonitorDisconnected { monitor } => {
                write!(f, "Monitor #{} disconnected", monitor.0)
            }
            Event::JoystickConnected { joystick } => write!(f, "Joystick {joystick} connected"),
            Event::JoystickDisconnected { joystick } => {
                write!(f, "Joystick {joystick} disconnected")
            }
        }
    }
}

fn write_key(
    f: &mut fmt::Formatter<'_>,
    action: &str,
    key: KeyCode,
    scancode: u32,
    mods: Modifiers,
) -> fmt::Result {
    write!(
        f,
        "Key 0x{:02x} {action} (scancode 0x{scancode:x} mods 0x{:x})",
        key.0,
        mods.bits()
    )
}
