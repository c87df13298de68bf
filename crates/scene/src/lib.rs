//! Scene graph and components.
//!
//! This crate provides the viewer's scene:
//! - Transform with current/target interpolation
//! - Frame hierarchy with pluggable drawables
//! - Flight camera driven by an input snapshot
//! - The immediate-mode backend interface frames render through

pub mod backend;
pub mod camera;
pub mod frame;
pub mod input;
pub mod shapes;
pub mod transform;

pub use backend::{Color, MatrixMode, Primitive, RenderBackend, Viewport};
pub use camera::{Camera, CameraBehavior, CameraSettings, DragState, Projection, FALLBACK_ASPECT};
pub use frame::{Drawable, Empty, Frame};
pub use input::{InputEvent, InputState, Key, MouseButton};
pub use shapes::{Axis, Cube, Grid, Overlay, Triangle};
pub use transform::{Transform, EPSILON};
