use std::fmt;

use glam::Vec2;

/// Keyboard key identifier.
///
/// Covers the keys the viewer binds (mode digits, preset letters, scrolling keys).
/// Anything else arrives as `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,

    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,

    /// Top-row digit `0..=9`.
    Digit(u8),
    /// Letter key, always lowercase ASCII.
    Letter(char),

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Wheel delta as reported by the platform.
///
/// `Line` is notched wheel input; `Pixel` is high precision (touchpads).
/// Positive `y` scrolls content up (towards the start of the page).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl WheelDelta {
    /// Logical pixels per wheel line.
    pub const LINE_PX: f32 = 48.0;

    /// Converts to logical pixels, positive `y` meaning "towards the end of the page".
    pub fn page_pixels(self) -> Vec2 {
        match self {
            WheelDelta::Line { x, y } => Vec2::new(-x, -y) * Self::LINE_PX,
            WheelDelta::Pixel { x, y } => Vec2::new(-x, -y),
        }
    }
}

/// Pointer button event with the tracked pointer position (logical pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub position: Vec2,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Pointer position in logical pixels, origin top-left.
    PointerMoved(Vec2),
    PointerButton(PointerButtonEvent),

    Wheel(WheelDelta),

    /// Pointer left the window surface.
    PointerLeft,

    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(d) => write!(f, "{d}"),
            Key::Letter(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_lines_scale_to_pixels() {
        let px = WheelDelta::Line { x: 0.0, y: -1.0 }.page_pixels();
        assert_eq!(px, Vec2::new(0.0, WheelDelta::LINE_PX));
    }

    #[test]
    fn wheel_pixels_flip_sign() {
        let px = WheelDelta::Pixel { x: 2.0, y: 30.0 }.page_pixels();
        assert_eq!(px, Vec2::new(-2.0, -30.0));
    }

    #[test]
    fn key_display() {
        assert_eq!(Key::Digit(2).to_string(), "2");
        assert_eq!(Key::Letter('r').to_string(), "R");
        assert_eq!(Key::Escape.to_string(), "Escape");
    }
}
