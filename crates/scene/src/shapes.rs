//! Built-in drawables: reference geometry and a screen-space panel.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::Rng;

use crate::backend::{Color, MatrixMode, Primitive, RenderBackend, Viewport};
use crate::camera::Projection;
use crate::frame::{Drawable, Frame};
use crate::transform::Transform;

/// Half length of each axis line.
const AXIS_EXTENT: f32 = 150.0;

/// World axes through the origin. Negative halves are dashed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Axis;

impl Drawable for Axis {
    fn draw(&self, backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {
        let axes = [
            (Color::RED, Vec3::X),
            (Color::GREEN, Vec3::Y),
            (Color::BLUE, Vec3::Z),
        ];

        backend.set_line_width(2.0);

        backend.set_line_stipple(true);
        backend.begin(Primitive::Lines);
        for (color, axis) in axes {
            backend.color(color);
            backend.vertex(-axis * AXIS_EXTENT);
            backend.vertex(Vec3::ZERO);
        }
        backend.end();

        backend.set_line_stipple(false);
        backend.begin(Primitive::Lines);
        for (color, axis) in axes {
            backend.color(color);
            backend.vertex(Vec3::ZERO);
            backend.vertex(axis * AXIS_EXTENT);
        }
        backend.end();

        backend.set_line_width(1.0);
    }
}

/// Line grid on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub step: f32,
    pub size: f32,
}

impl Grid {
    pub const COLOR: Color = Color::rgba(0.33, 0.33, 0.33, 0.33);

    pub fn new(step: f32, size: f32) -> Self {
        Self { step, size }
    }

    /// Distances from the origin at which grid lines are drawn.
    pub fn offsets(&self) -> impl Iterator<Item = f32> + '_ {
        let count = if self.step > 0.0 && self.size >= self.step {
            (self.size / self.step).floor() as u32
        } else {
            0
        };
        (1..=count).map(|i| i as f32 * self.step)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

impl Drawable for Grid {
    fn draw(&self, backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {
        let size = self.size;

        backend.begin(Primitive::Lines);
        backend.color(Self::COLOR);
        for i in self.offsets() {
            backend.vertex(Vec3::new(-size, 0.0, i));
            backend.vertex(Vec3::new(size, 0.0, i));
            backend.vertex(Vec3::new(-size, 0.0, -i));
            backend.vertex(Vec3::new(size, 0.0, -i));

            backend.vertex(Vec3::new(i, 0.0, -size));
            backend.vertex(Vec3::new(i, 0.0, size));
            backend.vertex(Vec3::new(-i, 0.0, -size));
            backend.vertex(Vec3::new(-i, 0.0, size));
        }
        backend.end();
    }
}

/// Faces of the unit cube: normal, then corners counter-clockwise seen from outside.
const CUBE_FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::Z,
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ],
    ),
    (
        Vec3::X,
        [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
    ),
];

/// A solid cube spanning `[-1, 1]` on every axis, in a single color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
    pub color: Color,
}

impl Cube {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    /// A cube with every channel (alpha included) drawn from `55..200`.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut channel = || rng.gen_range(55u8..200);
        Self::new(Color::rgba8(channel(), channel(), channel(), channel()))
    }

    /// A randomly colored cube frame at `position`, scaled uniformly by `scale`.
    pub fn frame(rng: &mut impl Rng, position: Vec3, scale: f32) -> Frame {
        Frame::new(Self::random(rng))
            .with_position(position)
            .with_scale(Vec3::splat(scale))
    }
}

impl Drawable for Cube {
    fn draw(&self, backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {
        backend.begin(Primitive::Quads);
        for (normal, corners) in CUBE_FACES {
            backend.color(self.color);
            backend.normal(normal);
            for corner in corners {
                backend.vertex(corner);
            }
        }
        backend.end();
    }
}

/// A spinning triangle with red, green and blue corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    angle: f32,
}

impl Triangle {
    /// Radians added to the spin angle each tick.
    pub const SPIN_STEP: f32 = 0.01;
    /// The angle wraps back to zero once it passes this value.
    pub const SPIN_WRAP: f32 = 360.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// A triangle frame at `position`.
    pub fn frame(position: Vec3) -> Frame {
        Frame::new(Self::new()).with_position(position)
    }

    /// Current spin angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Drawable for Triangle {
    fn draw(&self, backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {
        backend.begin(Primitive::Triangles);
        backend.color(Color::rgba(1.0, 0.0, 0.0, 0.333));
        backend.vertex(Vec3::new(0.0, 1.0, 0.0));
        backend.color(Color::rgba(0.0, 1.0, 0.0, 0.333));
        backend.vertex(Vec3::new(-1.0, -1.0, 0.0));
        backend.color(Color::rgba(0.0, 0.0, 1.0, 0.333));
        backend.vertex(Vec3::new(1.0, -1.0, 0.0));
        backend.end();
    }

    fn update(&mut self, transform: &mut Transform, _dt: f32) {
        self.angle += Self::SPIN_STEP;
        if self.angle > Self::SPIN_WRAP {
            self.angle = 0.0;
        }
        let up = transform.up().normalize_or(Vec3::Y);
        transform.set_orientation(Quat::from_axis_angle(up, self.angle));
    }
}

/// Translucent panel drawn in normalized screen coordinates.
///
/// Ignores the transforms of the tree it hangs in and never renders children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    /// Lower left corner, `(0, 0)` being the bottom left of the window.
    pub bottom_left: Vec2,
    pub top_right: Vec2,
    pub color: Color,
}

impl Overlay {
    pub const DEFAULT_COLOR: Color = Color::rgba(33.0 / 255.0, 33.0 / 255.0, 33.0 / 255.0, 33.0 / 255.0);

    /// Depth of the outer quad; the inner quad sits slightly in front of it.
    const OUTER_DEPTH: f32 = 0.99;
    const INNER_DEPTH: f32 = 0.999;
    /// Border inset per pixel of window size.
    const BORDER_PER_PIXEL: f32 = 0.00001;

    /// The panel projection: `[0, 1]` on both screen axes.
    pub const PROJECTION: Projection = Projection::Orthographic {
        left: 0.0,
        right: 1.0,
        bottom: 0.0,
        top: 1.0,
        near: -1.0,
        far: 1.0,
    };

    pub fn new(bottom_left: Vec2, top_right: Vec2) -> Self {
        Self {
            bottom_left,
            top_right,
            color: Self::DEFAULT_COLOR,
        }
    }

    pub fn projection() -> Mat4 {
        Self::PROJECTION.matrix()
    }

    fn quad(backend: &mut dyn RenderBackend, min: Vec2, max: Vec2, z: f32) {
        backend.vertex(Vec3::new(min.x, min.y, z));
        backend.vertex(Vec3::new(max.x, min.y, z));
        backend.vertex(Vec3::new(max.x, max.y, z));
        backend.vertex(Vec3::new(min.x, max.y, z));
    }
}

impl Drawable for Overlay {
    fn draw(&self, backend: &mut dyn RenderBackend, viewport: Viewport, _time: f64) {
        // Horizontal inset follows the width and vertical follows the height.
        let inset = Vec2::new(viewport.width as f32, viewport.height as f32) * Self::BORDER_PER_PIXEL;

        backend.begin(Primitive::Quads);
        backend.color(self.color);
        Self::quad(backend, self.bottom_left, self.top_right, Self::OUTER_DEPTH);
        Self::quad(
            backend,
            self.bottom_left + inset,
            self.top_right - inset,
            Self::INNER_DEPTH,
        );
        backend.end();
    }

    fn render(&self, frame: &Frame, backend: &mut dyn RenderBackend, time: f64) {
        backend.matrix_mode(MatrixMode::Projection);
        backend.push_matrix();
        backend.load_matrix(Self::projection());

        backend.matrix_mode(MatrixMode::ModelView);
        backend.push_matrix();
        let inverse = backend.current_matrix().inverse();
        backend.multiply_matrix(inverse);

        self.draw(backend, frame.viewport(), time);

        backend.pop_matrix();
        backend.matrix_mode(MatrixMode::Projection);
        backend.pop_matrix();
        backend.matrix_mode(MatrixMode::ModelView);
    }
}
