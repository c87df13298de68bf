//! Translation of winit input events into the scene's input snapshot.

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use frameview_scene::{InputState, Key, MouseButton};

/// Map a physical key to a viewer key, if the viewer uses it.
pub fn key_from_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyF => Key::F,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::AltLeft => Key::AltLeft,
        KeyCode::AltRight => Key::AltRight,
        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        _ => return None,
    };
    Some(key)
}

/// Map a winit mouse button; back/forward and extra buttons are ignored.
pub fn button_from_winit(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// A key transition the application itself reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Whether this press is an auto-repeat of a held key.
    pub repeat: bool,
}

/// Record `event` in `input`.
///
/// Returns the key if the event was a key press, so the caller can handle
/// application-level shortcuts.
pub fn handle_window_event(event: &WindowEvent, input: &mut InputState) -> Option<KeyPress> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let key = key_from_code(code)?;
            match event.state {
                ElementState::Pressed => {
                    input.on_key_pressed(key);
                    Some(KeyPress {
                        key,
                        repeat: event.repeat,
                    })
                }
                ElementState::Released => {
                    input.on_key_released(key);
                    None
                }
            }
        }
        WindowEvent::MouseInput { state, button, .. } => {
            if let Some(button) = button_from_winit(*button) {
                match state {
                    ElementState::Pressed => input.on_mouse_pressed(button),
                    ElementState::Released => input.on_mouse_released(button),
                }
            }
            None
        }
        WindowEvent::CursorMoved { position, .. } => {
            input.on_mouse_moved(position.x as f32, position.y as f32);
            None
        }
        WindowEvent::CursorLeft { .. } => {
            input.on_mouse_left();
            None
        }
        WindowEvent::Focused(false) => {
            input.on_focus_lost();
            None
        }
        _ => None,
    }
}
