//! Flight camera: the root of the frame tree.
//!
//! The camera turns the per-tick input snapshot into changes of its *target*
//! transform and lets the frame interpolation carry the current transform
//! after it, so motion always eases in. It also owns the projection, which is
//! rebuilt on every resize, and prepares the frame buffer before the tree is
//! rendered.

use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::backend::{MatrixMode, RenderBackend, Viewport};
use crate::frame::Frame;
use crate::input::{InputEvent, InputState, Key, MouseButton};
use crate::transform::Transform;

/// Aspect ratio used while the viewport has a zero dimension.
pub const FALLBACK_ASPECT: f32 = 4.0 / 3.0;

/// Projection type for the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Get the projection matrix (right-handed, depth in `[0, 1]`).
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic_rh(left, right, bottom, top, near, far),
        }
    }
}

/// How the camera is allowed to move.
///
/// `FirstPerson` is accepted but currently moves exactly like `Flight`;
/// it is where a roll lock would go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraBehavior {
    #[default]
    Flight,
    FirstPerson,
}

/// Tunable camera constants.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians per key press tick, and per pixel of mouse drag.
    pub rotate_scale: f32,
    /// World units per key press tick.
    pub translate_scale: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_scale: 0.01,
            translate_scale: 0.1,
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 3000.0,
        }
    }
}

/// Mouse buttons currently dragging the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    pub left: bool,
    pub right: bool,
}

impl DragState {
    /// Whether mouse motion should rotate the camera.
    pub fn is_active(&self) -> bool {
        self.left || self.right
    }
}

/// The flight camera and root of the scene.
#[derive(Debug)]
pub struct Camera {
    frame: Frame,
    behavior: CameraBehavior,
    settings: CameraSettings,
    projection: Projection,
    drag: DragState,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraBehavior::default())
    }
}

impl Camera {
    /// Create a camera at the origin with default settings.
    pub fn new(behavior: CameraBehavior) -> Self {
        Self::with_settings(behavior, CameraSettings::default())
    }

    /// Create a camera with explicit settings.
    pub fn with_settings(behavior: CameraBehavior, settings: CameraSettings) -> Self {
        Self {
            frame: Frame::group(),
            behavior,
            settings,
            projection: Projection::Perspective {
                fov_y: settings.fov_y_degrees.to_radians(),
                aspect: FALLBACK_ASPECT,
                near: settings.near,
                far: settings.far,
            },
            drag: DragState::default(),
        }
    }

    pub fn behavior(&self) -> CameraBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: CameraBehavior) {
        self.behavior = behavior;
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Projection computed by the last resize.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// The root frame the scene hangs off.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn transform(&self) -> &Transform {
        self.frame.transform()
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        self.frame.transform_mut()
    }

    pub fn children(&self) -> &[Frame] {
        self.frame.children()
    }

    pub fn children_mut(&mut self) -> &mut Vec<Frame> {
        self.frame.children_mut()
    }

    pub fn push_child(&mut self, child: Frame) {
        self.frame.push_child(child);
    }

    /// Snap back to the origin, cancelling any motion still in flight.
    pub fn reset(&mut self) {
        self.frame.transform_mut().reset();
        debug!("Camera reset to origin");
    }

    /// Cancel both drags (cursor left the window or focus was lost).
    pub fn stop_drag(&mut self) {
        if self.drag.is_active() {
            debug!("Camera drag cancelled");
        }
        self.drag = DragState::default();
    }

    /// Apply one queued input transition.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::ButtonDown(MouseButton::Left) => {
                self.drag.left = true;
                debug!("Left drag started");
            }
            InputEvent::ButtonDown(MouseButton::Right) => {
                self.drag.right = true;
                debug!("Right drag started");
            }
            InputEvent::ButtonDown(MouseButton::Middle) => self.reset(),
            InputEvent::ButtonUp(MouseButton::Left) => self.drag.left = false,
            InputEvent::ButtonUp(MouseButton::Right) => self.drag.right = false,
            InputEvent::ButtonUp(MouseButton::Middle) => {}
            InputEvent::MouseMoved { dx, dy } => {
                if self.drag.is_active() {
                    self.drag_rotate(dx, dy);
                }
            }
            InputEvent::MouseLeft => self.stop_drag(),
        }
    }

    /// Consume this tick's input, steer the target transform, then advance
    /// the whole tree by `dt`.
    pub fn update(&mut self, dt: f32, input: &mut InputState) {
        for event in input.drain_events() {
            self.handle_event(event);
        }

        let (translate, rotate) = self.directions(input);
        let rotate_scale = self.settings.rotate_scale;
        let transform = self.frame.transform_mut();

        // Only the direction of the accumulated vector matters; the angle is
        // always one rotate step however many keys contributed.
        if let Some(axis) = rotate.try_normalize() {
            let target = transform.target_orientation() * Quat::from_axis_angle(axis, rotate_scale);
            transform.set_target_orientation(target);
        }
        if translate != Vec3::ZERO {
            let target = transform.target_position() + translate;
            transform.set_target_position(target);
        }

        self.frame.update(dt);
    }

    /// Rebuild the projection for `viewport` and pass the size down the tree.
    pub fn resize(&mut self, viewport: Viewport, backend: &mut dyn RenderBackend) {
        backend.set_viewport(viewport);

        let aspect = viewport.aspect_ratio().unwrap_or_else(|| {
            warn!(
                "Degenerate viewport {}x{}, using fallback aspect",
                viewport.width, viewport.height
            );
            FALLBACK_ASPECT
        });
        self.projection = Projection::Perspective {
            fov_y: self.settings.fov_y_degrees.to_radians(),
            aspect,
            near: self.settings.near,
            far: self.settings.far,
        };
        debug!(
            "Camera resized to {}x{} (aspect {:.3})",
            viewport.width, viewport.height, aspect
        );

        backend.matrix_mode(MatrixMode::Projection);
        backend.load_matrix(self.projection.matrix());
        backend.matrix_mode(MatrixMode::ModelView);

        self.frame.resize(viewport);
    }

    /// Clear the frame buffer and render the tree under this camera's transform.
    pub fn render(&self, backend: &mut dyn RenderBackend, time: f64) {
        backend.clear();
        backend.matrix_mode(MatrixMode::ModelView);
        backend.load_identity();
        self.frame.render_base(backend, time);
    }

    fn drag_rotate(&mut self, dx: f32, dy: f32) {
        let scale = self.settings.rotate_scale;
        let transform = self.frame.transform_mut();
        let (right, up) = (transform.right(), transform.up());
        let (Some(right), Some(up)) = (right.try_normalize(), up.try_normalize()) else {
            return;
        };
        let target = transform.target_orientation()
            * Quat::from_axis_angle(right, dy * scale)
            * Quat::from_axis_angle(up, dx * scale);
        transform.set_target_orientation(target);
    }

    /// Translation and rotation deltas requested by the held keys and buttons.
    fn directions(&self, input: &InputState) -> (Vec3, Vec3) {
        let transform = self.frame.transform();
        let (forward, right, up) = (transform.forward(), transform.right(), transform.up());
        let rs = self.settings.rotate_scale;
        let ts = self.settings.translate_scale;
        let held = |keys: &[Key]| input.any_key_pressed(keys);

        let mut translate = Vec3::ZERO;
        let mut rotate = Vec3::ZERO;

        if held(&Key::MODIFIERS) {
            if held(&[Key::Up, Key::W]) {
                rotate += right * rs;
            }
            if held(&[Key::Down, Key::S]) {
                rotate -= right * rs;
            }
            if held(&[Key::Left, Key::A]) {
                rotate -= up * rs;
            }
            if held(&[Key::Right, Key::D]) {
                rotate += up * rs;
            }
            if held(&[Key::PageUp, Key::R]) {
                rotate += forward * rs;
            }
            if held(&[Key::PageDown, Key::F]) {
                rotate -= forward * rs;
            }
        } else {
            if held(&[Key::Up, Key::W]) {
                translate += forward * ts;
            }
            if held(&[Key::Down, Key::S]) {
                translate -= forward * ts;
            }
            if held(&[Key::Left, Key::A]) {
                translate += right * ts;
            }
            if held(&[Key::Right, Key::D]) {
                translate -= right * ts;
            }
            if held(&[Key::PageUp, Key::R]) {
                translate -= up * ts;
            }
            if held(&[Key::PageDown, Key::F]) {
                translate += up * ts;
            }
        }

        if held(&[Key::Q]) {
            rotate -= up * rs;
        }
        if held(&[Key::E]) {
            rotate += up * rs;
        }

        if input.is_mouse_pressed(MouseButton::Left) && input.is_mouse_pressed(MouseButton::Right)
        {
            translate += forward * ts;
        }

        (translate, rotate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < TOLERANCE
    }

    fn pressed(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.on_key_pressed(*key);
        }
        input
    }

    #[test]
    fn test_camera_default() {
        let camera = Camera::default();
        assert_eq!(camera.behavior(), CameraBehavior::Flight);
        assert_eq!(*camera.transform(), Transform::default());
        assert!(!camera.drag().is_active());
        assert_eq!(camera.settings().fov_y_degrees, 45.0);
    }

    #[test]
    fn test_forward_key_translates_target_only() {
        let mut camera = Camera::default();
        let mut input = pressed(&[Key::W]);

        camera.update(0.0, &mut input);

        let t = camera.transform();
        assert!(approx_eq_vec3(t.target_position(), Vec3::new(0.0, 0.0, 0.1)));
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.target_orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_arrow_keys_match_letter_keys() {
        let mut a = Camera::default();
        let mut b = Camera::default();
        a.update(0.0, &mut pressed(&[Key::Left, Key::PageDown]));
        b.update(0.0, &mut pressed(&[Key::A, Key::F]));
        assert_eq!(a.transform().target_position(), b.transform().target_position());
        assert!(approx_eq_vec3(
            a.transform().target_position(),
            Vec3::new(0.1, 0.1, 0.0)
        ));
    }

    #[test]
    fn test_modifier_switches_to_rotation() {
        let mut camera = Camera::default();
        let mut input = pressed(&[Key::ShiftLeft, Key::Up]);

        camera.update(0.0, &mut input);

        let t = camera.transform();
        assert_eq!(t.target_position(), Vec3::ZERO);
        let expected = Quat::from_axis_angle(Vec3::X, 0.01);
        assert!(t.target_orientation().abs_diff_eq(expected, TOLERANCE));
        assert_eq!(t.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_rotation_angle_ignores_key_count() {
        let mut one = Camera::default();
        let mut two = Camera::default();
        one.update(0.0, &mut pressed(&[Key::E]));
        two.update(0.0, &mut pressed(&[Key::E, Key::ControlRight, Key::D]));

        let single = one.transform().target_orientation();
        let double = two.transform().target_orientation();
        assert!((single.to_axis_angle().1 - 0.01).abs() < 1e-4);
        assert!((double.to_axis_angle().1 - 0.01).abs() < 1e-4);
    }

    #[test]
    fn test_opposing_keys_cancel_rotation() {
        let mut camera = Camera::default();
        camera.update(0.0, &mut pressed(&[Key::Q, Key::E]));
        assert_eq!(camera.transform().target_orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_q_rotates_even_with_modifier() {
        let mut camera = Camera::default();
        camera.update(0.0, &mut pressed(&[Key::Q, Key::AltLeft]));
        let expected = Quat::from_axis_angle(-Vec3::Y, 0.01);
        assert!(
            camera
                .transform()
                .target_orientation()
                .abs_diff_eq(expected, TOLERANCE)
        );
    }

    #[test]
    fn test_both_buttons_boost_forward() {
        let mut camera = Camera::default();
        let mut input = InputState::new();
        input.on_mouse_pressed(MouseButton::Left);
        input.on_mouse_pressed(MouseButton::Right);

        camera.update(0.0, &mut input);

        assert!(approx_eq_vec3(
            camera.transform().target_position(),
            Vec3::new(0.0, 0.0, 0.1)
        ));
        assert!(camera.drag().left && camera.drag().right);
    }

    #[test]
    fn test_drag_rotates_on_move() {
        let mut camera = Camera::default();
        camera.handle_event(InputEvent::MouseMoved { dx: 10.0, dy: 0.0 });
        assert_eq!(camera.transform().target_orientation(), Quat::IDENTITY);

        camera.handle_event(InputEvent::ButtonDown(MouseButton::Right));
        camera.handle_event(InputEvent::MouseMoved { dx: 10.0, dy: 0.0 });

        let expected = Quat::from_axis_angle(Vec3::Y, 0.1);
        assert!(
            camera
                .transform()
                .target_orientation()
                .abs_diff_eq(expected, TOLERANCE)
        );
    }

    #[test]
    fn test_button_up_and_leave_end_drag() {
        let mut camera = Camera::default();
        camera.handle_event(InputEvent::ButtonDown(MouseButton::Left));
        camera.handle_event(InputEvent::ButtonUp(MouseButton::Left));
        assert!(!camera.drag().is_active());

        camera.handle_event(InputEvent::ButtonDown(MouseButton::Left));
        camera.handle_event(InputEvent::ButtonDown(MouseButton::Right));
        camera.handle_event(InputEvent::MouseLeft);
        assert!(!camera.drag().is_active());

        camera.handle_event(InputEvent::MouseMoved { dx: 5.0, dy: 5.0 });
        assert_eq!(camera.transform().target_orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_middle_button_resets_mid_drag() {
        let mut camera = Camera::default();
        camera
            .transform_mut()
            .set_target_position(Vec3::new(5.0, 5.0, 5.0));
        camera.update(1.0, &mut InputState::new());
        assert_eq!(camera.transform().position(), Vec3::new(5.0, 5.0, 5.0));
        camera.handle_event(InputEvent::ButtonDown(MouseButton::Left));
        camera.handle_event(InputEvent::MouseMoved { dx: 3.0, dy: 4.0 });

        camera.handle_event(InputEvent::ButtonDown(MouseButton::Middle));

        assert_eq!(*camera.transform(), Transform::default());
        // Left is still held, so the drag continues from the reset pose.
        assert!(camera.drag().left);

        camera.handle_event(InputEvent::ButtonUp(MouseButton::Left));
        camera.handle_event(InputEvent::MouseMoved { dx: 3.0, dy: 4.0 });
        assert_eq!(*camera.transform(), Transform::default());
    }

    #[test]
    fn test_update_drains_queue_before_keys() {
        let mut camera = Camera::default();
        let mut input = InputState::new();
        input.on_key_pressed(Key::W);
        input.on_mouse_pressed(MouseButton::Middle);

        camera.update(0.0, &mut input);

        assert_eq!(input.pending_events(), 0);
        // Reset happened first, then the held key moved the target.
        assert!(approx_eq_vec3(
            camera.transform().target_position(),
            Vec3::new(0.0, 0.0, 0.1)
        ));
    }

    #[test]
    fn test_update_eases_toward_target() {
        let mut camera = Camera::default();
        let mut input = pressed(&[Key::W]);
        camera.update(0.5, &mut input);

        let t = camera.transform();
        assert!(approx_eq_vec3(t.target_position(), Vec3::new(0.0, 0.0, 0.1)));
        assert!(approx_eq_vec3(t.position(), Vec3::new(0.0, 0.0, 0.05)));
    }

    #[test]
    fn test_projection_matrix_perspective() {
        let projection = Projection::Perspective {
            fov_y: 45f32.to_radians(),
            aspect: 2.0,
            near: 1.0,
            far: 3000.0,
        };
        assert_eq!(
            projection.matrix(),
            Mat4::perspective_rh(45f32.to_radians(), 2.0, 1.0, 3000.0)
        );
    }

    #[test]
    fn test_key_bindings_translate() {
        // (keys, expected target position delta) with the default pose:
        // forward +Z, right +X, up +Y.
        let bindings: [(&[Key], Vec3); 6] = [
            (&[Key::W, Key::Up], Vec3::Z),
            (&[Key::S, Key::Down], -Vec3::Z),
            (&[Key::A, Key::Left], Vec3::X),
            (&[Key::D, Key::Right], -Vec3::X),
            (&[Key::R, Key::PageUp], -Vec3::Y),
            (&[Key::F, Key::PageDown], Vec3::Y),
        ];

        for (keys, direction) in bindings {
            for key in keys {
                let mut camera = Camera::default();
                camera.update(0.0, &mut pressed(&[*key]));

                let t = camera.transform();
                assert!(
                    approx_eq_vec3(t.target_position(), direction * 0.1),
                    "{key:?} moved to {:?}",
                    t.target_position()
                );
                assert_eq!(t.target_orientation(), Quat::IDENTITY, "{key:?} rotated");
            }
        }
    }

    #[test]
    fn test_key_bindings_rotate_with_modifier() {
        // (keys, expected rotation axis) with the default pose.
        let bindings: [(&[Key], Vec3); 6] = [
            (&[Key::W, Key::Up], Vec3::X),
            (&[Key::S, Key::Down], -Vec3::X),
            (&[Key::A, Key::Left], -Vec3::Y),
            (&[Key::D, Key::Right], Vec3::Y),
            (&[Key::R, Key::PageUp], Vec3::Z),
            (&[Key::F, Key::PageDown], -Vec3::Z),
        ];

        for (keys, axis) in bindings {
            for key in keys {
                let mut camera = Camera::default();
                camera.update(0.0, &mut pressed(&[Key::ShiftLeft, *key]));

                let t = camera.transform();
                let expected = Quat::from_axis_angle(axis, 0.01);
                assert!(
                    t.target_orientation().abs_diff_eq(expected, TOLERANCE),
                    "{key:?} rotated to {:?}",
                    t.target_orientation()
                );
                assert_eq!(t.target_position(), Vec3::ZERO, "{key:?} translated");
            }
        }
    }
}
