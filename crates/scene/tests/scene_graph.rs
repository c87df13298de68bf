//! Traversal tests for the frame tree, driven through a recording backend.

use std::cell::RefCell;
use std::rc::Rc;

use frameview_scene::{
    Axis, Camera, CameraBehavior, Color, Drawable, FALLBACK_ASPECT, Frame, InputState, Key,
    MatrixMode, MouseButton, Overlay, Primitive, Projection, RenderBackend, Transform, Viewport,
};
use glam::{Mat4, Quat, Vec2, Vec3};

const TOLERANCE: f32 = 1e-4;

fn approx_eq_mat4(a: Mat4, b: Mat4) -> bool {
    a.abs_diff_eq(b, TOLERANCE)
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Viewport(Viewport),
    Clear,
    Mode(MatrixMode),
    Push,
    Pop,
    Begin(Primitive),
    End,
    Stipple(bool),
}

/// Records calls and keeps real matrix stacks so emitted vertices can be checked.
#[derive(Debug)]
struct RecordingBackend {
    mode: MatrixMode,
    projection: Vec<Mat4>,
    model_view: Vec<Mat4>,
    calls: Vec<Call>,
    /// Model-view matrix in effect for each emitted vertex, with the raw vertex.
    vertices: Vec<(Mat4, Vec3)>,
}

impl RecordingBackend {
    fn new() -> Self {
        Self {
            mode: MatrixMode::ModelView,
            projection: vec![Mat4::IDENTITY],
            model_view: vec![Mat4::IDENTITY],
            calls: Vec::new(),
            vertices: Vec::new(),
        }
    }

    fn stack(&mut self) -> &mut Vec<Mat4> {
        match self.mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.model_view,
        }
    }

    fn top(&mut self) -> &mut Mat4 {
        self.stack().last_mut().expect("stack never empties")
    }

    fn world_vertices(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|(m, v)| m.transform_point3(*v))
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push(Call::Viewport(viewport));
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
        self.calls.push(Call::Mode(mode));
    }

    fn push_matrix(&mut self) {
        let top = *self.top();
        self.stack().push(top);
        self.calls.push(Call::Push);
    }

    fn pop_matrix(&mut self) {
        if self.stack().len() > 1 {
            self.stack().pop();
        }
        self.calls.push(Call::Pop);
    }

    fn load_identity(&mut self) {
        *self.top() = Mat4::IDENTITY;
    }

    fn load_matrix(&mut self, matrix: Mat4) {
        *self.top() = matrix;
    }

    fn multiply_matrix(&mut self, matrix: Mat4) {
        let top = self.top();
        *top = *top * matrix;
    }

    fn current_matrix(&self) -> Mat4 {
        match self.mode {
            MatrixMode::Projection => *self.projection.last().expect("stack never empties"),
            MatrixMode::ModelView => *self.model_view.last().expect("stack never empties"),
        }
    }

    fn begin(&mut self, primitive: Primitive) {
        self.calls.push(Call::Begin(primitive));
    }

    fn color(&mut self, _color: Color) {}

    fn normal(&mut self, _normal: Vec3) {}

    fn vertex(&mut self, position: Vec3) {
        let model_view = *self.model_view.last().expect("stack never empties");
        self.vertices.push((model_view, position));
    }

    fn end(&mut self) {
        self.calls.push(Call::End);
    }

    fn set_line_width(&mut self, _width: f32) {}

    fn set_line_stipple(&mut self, enabled: bool) {
        self.calls.push(Call::Stipple(enabled));
    }
}

/// Emits one vertex at its local origin, tagged by the x offset it is drawn at.
#[derive(Debug)]
struct Marker;

impl Drawable for Marker {
    fn draw(&self, backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {
        backend.begin(Primitive::Lines);
        backend.vertex(Vec3::ZERO);
        backend.end();
    }
}

fn marker_at(x: f32) -> Frame {
    Frame::new(Marker).with_position(Vec3::new(x, 0.0, 0.0))
}

#[test]
fn test_children_render_in_insertion_order() {
    let root = Frame::group()
        .with_child(marker_at(1.0))
        .with_child(marker_at(2.0))
        .with_child(marker_at(3.0));

    let mut backend = RecordingBackend::new();
    root.render(&mut backend, 0.0);

    let xs: Vec<f32> = backend.world_vertices().iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
}

/// Logs its id on every update and every draw.
#[derive(Debug)]
struct Tracer {
    id: u32,
    log: Rc<RefCell<Vec<(char, u32)>>>,
}

impl Drawable for Tracer {
    fn draw(&self, _backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {
        self.log.borrow_mut().push(('r', self.id));
    }

    fn update(&mut self, _transform: &mut Transform, _dt: f32) {
        self.log.borrow_mut().push(('u', self.id));
    }
}

#[test]
fn test_update_and_render_visit_same_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let tracer = |id| {
        Frame::new(Tracer {
            id,
            log: Rc::clone(&log),
        })
    };
    let mut root = Frame::group()
        .with_child(tracer(1).with_child(tracer(2)))
        .with_child(tracer(3));

    root.update(0.016);
    root.render(&mut RecordingBackend::new(), 0.016);

    let log = log.borrow();
    let updates: Vec<u32> = log.iter().filter(|(k, _)| *k == 'u').map(|(_, id)| *id).collect();
    let renders: Vec<u32> = log.iter().filter(|(k, _)| *k == 'r').map(|(_, id)| *id).collect();
    // Children finish before their parent in both traversals.
    assert_eq!(updates, vec![2, 1, 3]);
    assert_eq!(renders, updates);
}

#[test]
fn test_child_drawn_relative_to_parent() {
    let parent = Frame::group()
        .with_position(Vec3::new(10.0, 0.0, 0.0))
        .with_child(marker_at(1.0));
    let root = Frame::group().with_child(parent).with_child(marker_at(0.5));

    let mut backend = RecordingBackend::new();
    root.render(&mut backend, 0.0);

    let world = backend.world_vertices();
    assert_eq!(world[0], Vec3::new(11.0, 0.0, 0.0));
    // The parent's translation must not leak into its sibling.
    assert_eq!(world[1], Vec3::new(0.5, 0.0, 0.0));
    assert_eq!(backend.model_view.len(), 1);
}

#[test]
fn test_scale_applies_before_translation() {
    let frame = Frame::group()
        .with_position(Vec3::new(1.0, 0.0, 0.0))
        .with_scale(Vec3::splat(2.0))
        .with_child(Frame::new(Marker).with_position(Vec3::new(1.0, 0.0, 0.0)));

    let mut backend = RecordingBackend::new();
    frame.render(&mut backend, 0.0);

    assert_eq!(backend.world_vertices()[0], Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_push_pop_balanced() {
    let root = Frame::group()
        .with_child(Frame::new(Axis))
        .with_child(Frame::group().with_child(marker_at(1.0)));

    let mut backend = RecordingBackend::new();
    root.render(&mut backend, 0.0);

    let pushes = backend.calls.iter().filter(|c| **c == Call::Push).count();
    let pops = backend.calls.iter().filter(|c| **c == Call::Pop).count();
    assert_eq!(pushes, pops);
    assert_eq!(pushes, 4);
}

#[test]
fn test_axis_stipples_negative_halves_first() {
    let mut backend = RecordingBackend::new();
    Frame::new(Axis).render(&mut backend, 0.0);

    let stipples: Vec<&Call> = backend
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Stipple(_)))
        .collect();
    assert_eq!(stipples, vec![&Call::Stipple(true), &Call::Stipple(false)]);

    let world = backend.world_vertices();
    assert_eq!(world.len(), 12);
    assert_eq!(world[0], Vec3::new(-150.0, 0.0, 0.0));
    assert_eq!(world[11], Vec3::new(0.0, 0.0, 150.0));
}

#[test]
fn test_camera_resize_sets_projection() {
    let mut camera = Camera::new(CameraBehavior::Flight);
    let mut backend = RecordingBackend::new();

    camera.resize(Viewport::new(800, 600), &mut backend);

    assert_eq!(backend.calls[0], Call::Viewport(Viewport::new(800, 600)));
    let expected = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, 1.0, 3000.0);
    assert!(approx_eq_mat4(backend.projection[0], expected));
    assert_eq!(backend.mode, MatrixMode::ModelView);
    assert_eq!(camera.frame().viewport(), Viewport::new(800, 600));
}

#[test]
fn test_camera_zero_viewport_uses_fallback_aspect() {
    let mut camera = Camera::default();
    camera.push_child(marker_at(1.0));
    let mut backend = RecordingBackend::new();

    camera.resize(Viewport::new(0, 0), &mut backend);

    assert!(matches!(
        camera.projection(),
        Projection::Perspective { aspect, .. } if aspect == FALLBACK_ASPECT
    ));
    assert!(backend.projection[0].is_finite());
    assert_eq!(camera.children()[0].viewport(), Viewport::new(0, 0));
}

#[test]
fn test_camera_render_clears_then_draws_under_view() {
    let mut camera = Camera::default();
    camera.push_child(marker_at(1.0));
    camera
        .transform_mut()
        .set_position(Vec3::new(0.0, 0.0, 5.0));

    let mut backend = RecordingBackend::new();
    backend.model_view[0] = Mat4::from_scale(Vec3::splat(9.0));
    camera.render(&mut backend, 0.016);

    assert_eq!(backend.calls[0], Call::Clear);
    // Model-view was reset before the camera's transform was applied.
    assert_eq!(backend.world_vertices()[0], Vec3::new(1.0, 0.0, 5.0));
}

#[test]
fn test_camera_rotates_the_world_around_it() {
    let mut camera = Camera::default();
    camera.push_child(marker_at(1.0));
    camera
        .transform_mut()
        .set_orientation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

    let mut backend = RecordingBackend::new();
    camera.render(&mut backend, 0.0);

    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * Vec3::X;
    assert!(backend.world_vertices()[0].abs_diff_eq(expected, TOLERANCE));
}

#[test]
fn test_overlay_ignores_tree_transforms() {
    let mut camera = Camera::default();
    camera
        .transform_mut()
        .set_position(Vec3::new(3.0, -2.0, 7.0));
    camera.push_child(
        Frame::new(Overlay::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)))
            .with_position(Vec3::new(50.0, 50.0, 50.0))
            .with_child(marker_at(1.0)),
    );
    let mut backend = RecordingBackend::new();
    camera.resize(Viewport::new(1000, 1000), &mut backend);
    let projection = backend.projection[0];

    camera.render(&mut backend, 0.0);

    let world = backend.world_vertices();
    // Two quads, no child marker.
    assert_eq!(world.len(), 8);
    assert!(world[0].abs_diff_eq(Vec3::new(0.0, 0.0, 0.99), TOLERANCE));
    assert!(world[4].abs_diff_eq(Vec3::new(0.01, 0.01, 0.999), TOLERANCE));
    // Both stacks are restored.
    assert_eq!(backend.projection, vec![projection]);
    assert_eq!(backend.model_view.len(), 1);
    assert_eq!(backend.mode, MatrixMode::ModelView);
}

#[test]
fn test_held_key_moves_camera_smoothly() {
    let mut camera = Camera::default();
    let mut input = InputState::new();
    input.on_key_pressed(Key::W);

    for _ in 0..10 {
        camera.update(0.1, &mut input);
    }
    input.on_key_released(Key::W);

    let t = camera.transform();
    assert!((t.target_position().z - 1.0).abs() < TOLERANCE);
    assert!(t.position().z > 0.0);
    assert!(t.position().z < t.target_position().z);

    for _ in 0..200 {
        camera.update(0.1, &mut input);
    }
    assert!(camera.transform().is_settled());
}

#[test]
fn test_middle_click_cancels_motion() {
    let mut camera = Camera::default();
    let mut input = InputState::new();
    input.on_key_pressed(Key::S);
    camera.update(0.2, &mut input);
    input.on_key_released(Key::S);
    assert_ne!(*camera.transform(), Transform::default());

    input.on_mouse_pressed(MouseButton::Middle);
    input.on_mouse_released(MouseButton::Middle);
    camera.update(0.2, &mut input);

    assert_eq!(*camera.transform(), Transform::default());
}

#[test]
fn test_drag_survives_only_while_held() {
    let mut camera = Camera::default();
    let mut input = InputState::new();
    input.on_mouse_pressed(MouseButton::Left);
    input.on_mouse_moved(100.0, 100.0);
    input.on_mouse_moved(110.0, 100.0);
    camera.update(0.0, &mut input);
    let rotated = camera.transform().target_orientation();
    assert_ne!(rotated, Quat::IDENTITY);

    input.on_focus_lost();
    input.on_mouse_moved(0.0, 0.0);
    input.on_mouse_moved(50.0, 50.0);
    camera.update(0.0, &mut input);

    assert!(!camera.drag().is_active());
    assert_eq!(camera.transform().target_orientation(), rotated);
}

#[test]
fn test_overlay_projection_is_unit_ortho() {
    assert_eq!(
        Overlay::projection(),
        Mat4::orthographic_rh(0.0, 1.0, 0.0, 1.0, -1.0, 1.0)
    );
    assert!(matches!(Overlay::PROJECTION, Projection::Orthographic { .. }));
}

#[test]
fn test_overlay_inset_follows_window_axes() {
    let overlay = Overlay::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
    let mut backend = RecordingBackend::new();

    overlay.draw(&mut backend, Viewport::new(1000, 100), 0.0);

    let raw: Vec<Vec3> = backend.vertices.iter().map(|(_, v)| *v).collect();
    assert_eq!(raw.len(), 8);
    // Inner quad: wide window insets x by 1000 * 1e-5, y by 100 * 1e-5.
    assert!(raw[4].abs_diff_eq(Vec3::new(0.01, 0.001, 0.999), 1e-6));
    assert!(raw[6].abs_diff_eq(Vec3::new(0.99, 0.999, 0.999), 1e-6));
}
