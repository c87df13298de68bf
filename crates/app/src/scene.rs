//! The demo scene shown by the viewer.

use glam::{Vec2, Vec3};
use rand::Rng;

use frameview_scene::{Axis, Camera, Color, Cube, Frame, Grid, Overlay, Transform, Triangle};

/// Overlay tint while the camera is still gliding towards its target.
pub const MOVING_TINT: Color = Color::rgba(200.0 / 255.0, 33.0 / 255.0, 33.0 / 255.0, 33.0 / 255.0);

/// Distance below which the camera counts as having arrived.
const SETTLED_DISTANCE: f32 = 0.001;

/// Hang the demo scene off `camera`.
pub fn populate(camera: &mut Camera, rng: &mut impl Rng) {
    camera.push_child(Frame::new(Axis));
    camera.push_child(Frame::new(Grid::new(1.0, 25.0)));
    camera.push_child(Cube::frame(rng, Vec3::new(5.0, 0.0, 5.0), 2.0));
    camera.push_child(Cube::frame(rng, Vec3::new(-5.0, 0.0, -5.0), 1.0));
    camera.push_child(Triangle::frame(Vec3::new(5.0, 0.0, 0.0)));
    camera.push_child(Frame::new(Overlay::new(
        Vec2::new(0.02, 0.02),
        Vec2::new(0.98, 0.25),
    )));
}

/// Overlay color for the camera's current motion state.
pub fn overlay_tint(transform: &Transform) -> Color {
    let distance = (transform.target_position() - transform.position()).length();
    if distance < SETTLED_DISTANCE {
        Overlay::DEFAULT_COLOR
    } else {
        MOVING_TINT
    }
}

/// Recolor every overlay hanging directly off the camera.
pub fn tint_overlays(camera: &mut Camera) {
    let tint = overlay_tint(camera.transform());
    for child in camera.children_mut() {
        if let Some(overlay) = child.drawable_mut::<Overlay>() {
            overlay.color = tint;
        }
    }
}
