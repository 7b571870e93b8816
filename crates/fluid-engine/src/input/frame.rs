use std::collections::HashSet;

use glam::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` holds the current state (held keys/buttons, pointer position).
/// `InputFrame` holds the transitions and accumulations of the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame (repeats excluded).
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Primary-button clicks completed this frame, at release position (logical px).
    pub clicks: Vec<Vec2>,

    /// Accumulated wheel movement in logical pixels; positive `y` scrolls down the page.
    pub wheel: Vec2,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.clicks.clear();
        self.wheel = Vec2::ZERO;
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
