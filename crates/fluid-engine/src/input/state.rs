use std::collections::HashSet;

use glam::Vec2;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
};

/// Current input state for the window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels. `None` while outside the window.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(p) => self.pointer_pos = Some(*p),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, repeat } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) && !*repeat {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, position, modifiers }) => {
                self.pointer_pos = Some(*position);
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                            if *button == MouseButton::Left {
                                frame.clicks.push(*position);
                            }
                        }
                    }
                }
            }

            InputEvent::Wheel(delta) => frame.wheel += delta.page_pixels(),
        }

        frame.events.push(ev);
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::WheelDelta;

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            position: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        })
    }

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn click_recorded_on_release() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, button(MouseButtonState::Pressed, 10.0, 20.0));
        assert!(frame.clicks.is_empty());
        state.apply_event(&mut frame, button(MouseButtonState::Released, 12.0, 21.0));

        assert_eq!(frame.clicks, vec![Vec2::new(12.0, 21.0)]);
        assert_eq!(state.pointer_pos, Some(Vec2::new(12.0, 21.0)));
    }

    #[test]
    fn release_without_press_is_not_a_click() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, button(MouseButtonState::Released, 1.0, 1.0));
        assert!(frame.clicks.is_empty());
    }

    #[test]
    fn repeats_do_not_count_as_presses() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Digit(1), KeyState::Pressed, false));
        frame.clear();
        state.apply_event(&mut frame, key(Key::Digit(1), KeyState::Pressed, true));

        assert!(!frame.key_pressed(Key::Digit(1)));
        assert!(state.key_down(Key::Digit(1)));
    }

    #[test]
    fn wheel_accumulates_until_cleared() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Pixel { x: 0.0, y: -10.0 }));
        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Pixel { x: 0.0, y: -5.0 }));
        assert_eq!(frame.wheel.y, 15.0);

        frame.clear();
        assert_eq!(frame.wheel, Vec2::ZERO);
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.key_down(Key::Space));
    }
}
