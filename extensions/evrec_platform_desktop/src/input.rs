//! Conversion of winit input into evrec events

use evrec_platform::{Event, KeyCode, Modifiers};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};
use winit::platform::scancode::PhysicalKeyExtScancode;

/// Pixel deltas are scaled down to roughly match line deltas
const PIXELS_PER_SCROLL_LINE: f64 = 10.0;

const LETTERS: [WinitKeyCode; 26] = [
    WinitKeyCode::KeyA,
    WinitKeyCode::KeyB,
    WinitKeyCode::KeyC,
    WinitKeyCode::KeyD,
    WinitKeyCode::KeyE,
    WinitKeyCode::KeyF,
    WinitKeyCode::KeyG,
    WinitKeyCode::KeyH,
    WinitKeyCode::KeyI,
    WinitKeyCode::KeyJ,
    WinitKeyCode::KeyK,
    WinitKeyCode::KeyL,
    WinitKeyCode::KeyM,
    WinitKeyCode::KeyN,
    WinitKeyCode::KeyO,
    WinitKeyCode::KeyP,
    WinitKeyCode::KeyQ,
    WinitKeyCode::KeyR,
    WinitKeyCode::KeyS,
    WinitKeyCode::KeyT,
    WinitKeyCode::KeyU,
    WinitKeyCode::KeyV,
    WinitKeyCode::KeyW,
    WinitKeyCode::KeyX,
    WinitKeyCode::KeyY,
    WinitKeyCode::KeyZ,
];

const DIGITS: [WinitKeyCode; 10] = [
    WinitKeyCode::Digit0,
    WinitKeyCode::Digit1,
    WinitKeyCode::Digit2,
    WinitKeyCode::Digit3,
    WinitKeyCode::Digit4,
    WinitKeyCode::Digit5,
    WinitKeyCode::Digit6,
    WinitKeyCode::Digit7,
    WinitKeyCode::Digit8,
    WinitKeyCode::Digit9,
];

const FUNCTION_KEYS: [WinitKeyCode; 12] = [
    WinitKeyCode::F1,
    WinitKeyCode::F2,
    WinitKeyCode::F3,
    WinitKeyCode::F4,
    WinitKeyCode::F5,
    WinitKeyCode::F6,
    WinitKeyCode::F7,
    WinitKeyCode::F8,
    WinitKeyCode::F9,
    WinitKeyCode::F10,
    WinitKeyCode::F11,
    WinitKeyCode::F12,
];

/// Convert winit modifier state
pub fn convert_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers::new(
        state.shift_key(),
        state.control_key(),
        state.alt_key(),
        state.super_key(),
    )
}

/// Convert a physical key to a platform-neutral key code
pub fn convert_key(key: PhysicalKey) -> KeyCode {
    let PhysicalKey::Code(code) = key else {
        return KeyCode::UNKNOWN;
    };

    if let Some(i) = LETTERS.iter().position(|k| *k == code) {
        return KeyCode(KeyCode::A.0 + i as u32);
    }
    if let Some(i) = DIGITS.iter().position(|k| *k == code) {
        return KeyCode(KeyCode::KEY_0.0 + i as u32);
    }
    if let Some(i) = FUNCTION_KEYS.iter().position(|k| *k == code) {
        return KeyCode::function(i as u32 + 1).unwrap_or(KeyCode::UNKNOWN);
    }

    match code {
        WinitKeyCode::Backspace => KeyCode::BACKSPACE,
        WinitKeyCode::Tab => KeyCode::TAB,
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::ENTER,
        WinitKeyCode::Escape => KeyCode::ESCAPE,
        WinitKeyCode::Space => KeyCode::SPACE,
        WinitKeyCode::Delete => KeyCode::DELETE,
        WinitKeyCode::ArrowLeft => KeyCode::LEFT,
        WinitKeyCode::ArrowUp => KeyCode::UP,
        WinitKeyCode::ArrowRight => KeyCode::RIGHT,
        WinitKeyCode::ArrowDown => KeyCode::DOWN,
        WinitKeyCode::Home => KeyCode::HOME,
        WinitKeyCode::End => KeyCode::END,
        WinitKeyCode::PageUp => KeyCode::PAGE_UP,
        WinitKeyCode::PageDown => KeyCode::PAGE_DOWN,
        WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => KeyCode::SHIFT,
        WinitKeyCode::ControlLeft | WinitKeyCode::ControlRight => KeyCode::CONTROL,
        WinitKeyCode::AltLeft | WinitKeyCode::AltRight => KeyCode::ALT,
        WinitKeyCode::SuperLeft | WinitKeyCode::SuperRight => KeyCode::SUPER,
        _ => KeyCode::UNKNOWN,
    }
}

/// Convert a keyboard event into a press, repeat or release
pub fn convert_keyboard_event(event: &KeyEvent, mods: ModifiersState) -> Event {
    let key = convert_key(event.physical_key);
    let scancode = event.physical_key.to_scancode().unwrap_or(0);
    let mods = convert_modifiers(mods);

    match (event.state, event.repeat) {
        (ElementState::Pressed, false) => Event::KeyPressed {
            key,
            scancode,
            mods,
        },
        (ElementState::Pressed, true) => Event::KeyRepeated {
            key,
            scancode,
            mods,
        },
        (ElementState::Released, _) => Event::KeyReleased {
            key,
            scancode,
            mods,
        },
    }
}

/// Character input events for committed text, skipping control characters
pub fn text_input(text: &str) -> impl Iterator<Item = Event> + '_ {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| Event::CodepointInput {
            codepoint: c as u32,
        })
}

/// Mouse button index: left 0, right 1, middle 2, then extra buttons
pub fn convert_mouse_button(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(n) => u8::try_from(n).unwrap_or(u8::MAX),
    }
}

/// Convert a mouse button change
pub fn convert_mouse_input(
    state: ElementState,
    button: MouseButton,
    mods: ModifiersState,
) -> Event {
    let button = convert_mouse_button(button);
    let mods = convert_modifiers(mods);
    match state {
        ElementState::Pressed => Event::ButtonPressed { button, mods },
        ElementState::Released => Event::ButtonReleased { button, mods },
    }
}

/// Scroll offsets in lines
pub fn scroll_delta(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
        MouseScrollDelta::PixelDelta(pos) => {
            (pos.x / PIXELS_PER_SCROLL_LINE, pos.y / PIXELS_PER_SCROLL_LINE)
        }
    }
}
