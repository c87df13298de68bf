//! Immediate-mode rendering interface consumed by the frame tree.
//!
//! Frames never talk to the GPU directly. They push and multiply matrices on
//! a transform stack and emit vertices between `begin`/`end` pairs, the way a
//! fixed-function pipeline is driven. Anything implementing [`RenderBackend`]
//! can sit underneath: the GPU-backed recorder in `frameview_renderer`, or a
//! plain recorder in tests.

use glam::{Mat4, Vec3};

/// Client rectangle of the window in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// A zero-sized viewport at the origin.
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Viewport of the given size at the origin.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Whether either dimension is zero (e.g. a minimized window).
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or `None` for a degenerate viewport.
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.is_degenerate() {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Build a color from 8-bit channels.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Which matrix stack the stack operations act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    Projection,
    ModelView,
}

/// Primitive assembled from the vertices between `begin` and `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Every two vertices form a segment.
    Lines,
    /// Every three vertices form a triangle.
    Triangles,
    /// Every four vertices form a quad (split into two triangles).
    Quads,
}

/// Transform stack plus immediate vertex emission.
///
/// Stack operations act on the stack selected by [`RenderBackend::matrix_mode`].
/// Vertices are transformed by the current projection and model-view matrices
/// at the moment they are emitted, so matrix changes between `begin` and `end`
/// affect only the vertices that follow.
pub trait RenderBackend {
    /// Set the viewport rectangle subsequent draws map to.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clear color and depth for a new frame.
    fn clear(&mut self);

    /// Select the matrix stack targeted by stack operations.
    fn matrix_mode(&mut self, mode: MatrixMode);

    /// Duplicate the top of the current stack.
    fn push_matrix(&mut self);

    /// Discard the top of the current stack.
    fn pop_matrix(&mut self);

    /// Replace the top of the current stack with identity.
    fn load_identity(&mut self);

    /// Replace the top of the current stack with `matrix`.
    fn load_matrix(&mut self, matrix: Mat4);

    /// Post-multiply the top of the current stack by `matrix`.
    fn multiply_matrix(&mut self, matrix: Mat4);

    /// Top of the current stack.
    fn current_matrix(&self) -> Mat4;

    /// Start assembling a primitive.
    fn begin(&mut self, primitive: Primitive);

    /// Set the color for subsequent vertices.
    fn color(&mut self, color: Color);

    /// Set the normal for subsequent vertices.
    fn normal(&mut self, normal: Vec3);

    /// Emit a vertex.
    fn vertex(&mut self, position: Vec3);

    /// Finish the primitive started by `begin`.
    fn end(&mut self);

    /// Width used for subsequent line primitives.
    fn set_line_width(&mut self, width: f32);

    /// Whether subsequent line primitives are drawn dashed.
    fn set_line_stipple(&mut self, enabled: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_aspect() {
        assert_eq!(Viewport::new(800, 600).aspect_ratio(), Some(800.0 / 600.0));
        assert_eq!(Viewport::new(800, 0).aspect_ratio(), None);
        assert_eq!(Viewport::new(0, 600).aspect_ratio(), None);
        assert!(Viewport::EMPTY.is_degenerate());
    }

    #[test]
    fn test_color_rgba8() {
        let c = Color::rgba8(255, 0, 51, 255);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 1.0]);
    }
}
