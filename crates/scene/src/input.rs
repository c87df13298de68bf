//! Input snapshot read by the camera once per tick.
//!
//! The window layer records key and button transitions here as they arrive;
//! the camera reads the held-key sets and drains the event queue during its
//! `update`. Nothing reacts to input outside of the tick, so the scene is only
//! ever mutated from the update phase.

use std::collections::{HashSet, VecDeque};

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    ShiftLeft,
    ShiftRight,
    AltLeft,
    AltRight,
    ControlLeft,
    ControlRight,
    Escape,
    Enter,
}

impl Key {
    /// Keys that switch the camera from translating to rotating.
    pub const MODIFIERS: [Key; 6] = [
        Key::ShiftLeft,
        Key::ShiftRight,
        Key::AltLeft,
        Key::AltRight,
        Key::ControlLeft,
        Key::ControlRight,
    ];
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A discrete input transition, queued until the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    /// Cursor motion in pixels since the previous move event.
    MouseMoved { dx: f32, dy: f32 },
    /// The cursor left the window or the window lost focus.
    MouseLeft,
}

/// Tracks the current state of keyboard and mouse input.
#[derive(Debug, Default)]
pub struct InputState {
    /// Currently pressed keys
    pressed_keys: HashSet<Key>,
    /// Currently pressed mouse buttons
    pressed_buttons: HashSet<MouseButton>,
    /// Last known cursor position, if the cursor is inside the window
    mouse_position: Option<(f32, f32)>,
    /// Transitions not yet consumed by the camera
    events: VecDeque<InputEvent>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press event.
    pub fn on_key_pressed(&mut self, key: Key) {
        self.pressed_keys.insert(key);
    }

    /// Handle a key release event.
    pub fn on_key_released(&mut self, key: Key) {
        self.pressed_keys.remove(&key);
    }

    /// Handle a mouse button press event.
    pub fn on_mouse_pressed(&mut self, button: MouseButton) {
        self.pressed_buttons.insert(button);
        self.events.push_back(InputEvent::ButtonDown(button));
    }

    /// Handle a mouse button release event.
    pub fn on_mouse_released(&mut self, button: MouseButton) {
        self.pressed_buttons.remove(&button);
        self.events.push_back(InputEvent::ButtonUp(button));
    }

    /// Handle an absolute cursor position.
    ///
    /// The first position after entering the window only establishes the
    /// reference point; it does not produce motion.
    pub fn on_mouse_moved(&mut self, x: f32, y: f32) {
        if let Some((old_x, old_y)) = self.mouse_position.replace((x, y)) {
            self.on_mouse_delta(x - old_x, y - old_y);
        }
    }

    /// Handle relative cursor motion in pixels.
    pub fn on_mouse_delta(&mut self, dx: f32, dy: f32) {
        if dx != 0.0 || dy != 0.0 {
            self.events.push_back(InputEvent::MouseMoved { dx, dy });
        }
    }

    /// The cursor left the window.
    pub fn on_mouse_left(&mut self) {
        self.mouse_position = None;
        self.events.push_back(InputEvent::MouseLeft);
    }

    /// The window lost focus: nothing is held any more.
    ///
    /// Release events for keys and buttons held while focus moves away are
    /// never delivered, so everything is dropped here instead.
    pub fn on_focus_lost(&mut self) {
        self.pressed_keys.clear();
        self.pressed_buttons.clear();
        self.on_mouse_left();
    }

    /// Check if a key is currently pressed.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if any of `keys` is currently pressed.
    pub fn any_key_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|key| self.is_key_pressed(*key))
    }

    /// Check if a mouse button is currently pressed.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Take all queued events in arrival order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    /// Number of events waiting for the next tick.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}
