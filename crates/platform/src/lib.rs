//! Platform layer for the viewer.
//!
//! This crate provides platform-specific functionality:
//! - Window management via winit
//! - Translation of winit input events into the scene's input snapshot

mod input;
mod window;

pub use input::{KeyPress, button_from_winit, handle_window_event, key_from_code};
pub use window::Window;

// Re-export winit types that users might need
pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
