//! Transform component for scene frames.
//!
//! A [`Transform`] carries two copies of position, orientation and scale: the
//! *current* value used for rendering and a *target* value the current one
//! drifts toward on every [`Transform::advance`]. Writing a current value snaps
//! the target along with it; writing only the target leaves a gap that closes
//! over the following frames, which is what gives the camera its inertia.
//!
//! # Example
//!
//! ```
//! use frameview_scene::Transform;
//! use glam::Vec3;
//!
//! let mut t = Transform::new();
//! t.set_target_position(Vec3::new(10.0, 0.0, 0.0));
//!
//! // Nothing moves until the next tick.
//! assert_eq!(t.position(), Vec3::ZERO);
//!
//! t.advance(0.5);
//! assert!((t.position().x - 5.0).abs() < 1e-5);
//! ```

use glam::{Mat4, Quat, Vec3};

/// Per-axis distance below which position and scale count as settled.
pub const EPSILON: f32 = 1e-5;

/// Rotate `v` by `q` using the `inverse(q) * v * q` sandwich.
///
/// This is the inverse of the usual `q * v * inverse(q)` rotation. Frame
/// directions and the camera controls are built around it, so it must not be
/// swapped for `q * v`.
pub fn apply(q: Quat, v: Vec3) -> Vec3 {
    let pure = Quat::from_xyzw(v.x, v.y, v.z, 0.0);
    let rotated = q.inverse() * pure * q;
    Vec3::new(rotated.x, rotated.y, rotated.z)
}

/// Position, orientation and scale with a current and a target value each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    orientation: Quat,
    target_orientation: Quat,
    position: Vec3,
    target_position: Vec3,
    scale: Vec3,
    target_scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            orientation: Quat::IDENTITY,
            target_orientation: Quat::IDENTITY,
            position: Vec3::ZERO,
            target_position: Vec3::ZERO,
            scale: Vec3::ONE,
            target_scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a transform at the origin with identity orientation and unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with the given position (current and target).
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Create a transform with the given orientation (current and target).
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.set_orientation(orientation);
        self
    }

    /// Create a transform with the given scale (current and target).
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Snap back to identity orientation, zero position and unit scale.
    ///
    /// Targets are reset too, so any in-flight interpolation is cancelled.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move every current value toward its target by factor `dt`.
    ///
    /// `dt` is the elapsed frame time in seconds and is used directly as the
    /// interpolation factor. It is clamped to `[0, 1]`: a zero, negative or NaN
    /// `dt` leaves the transform untouched, and a frame longer than a second
    /// lands exactly on the target instead of overshooting it.
    ///
    /// Orientation, position and scale are gated independently: each one only
    /// moves while it differs from its target.
    pub fn advance(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        let t = dt.min(1.0);

        if self.orientation != self.target_orientation {
            self.orientation = self
                .orientation
                .slerp(self.target_orientation, t)
                .normalize();
        }

        if exceeds_epsilon(self.position, self.target_position) {
            self.position = self.position.lerp(self.target_position, t);
        }

        if exceeds_epsilon(self.scale, self.target_scale) {
            self.scale = self.scale.lerp(self.target_scale, t);
        }
    }

    /// Current orientation.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Set the current orientation. The target snaps to the same value.
    pub fn set_orientation(&mut self, orientation: Quat) {
        let orientation = normalized_or_identity(orientation);
        self.orientation = orientation;
        self.target_orientation = orientation;
    }

    /// Orientation the current one is moving toward.
    pub fn target_orientation(&self) -> Quat {
        self.target_orientation
    }

    /// Set the target orientation, leaving the current orientation untouched.
    pub fn set_target_orientation(&mut self, orientation: Quat) {
        self.target_orientation = normalized_or_identity(orientation);
    }

    /// Current position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set the current position. The target snaps to the same value.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.target_position = position;
    }

    /// Position the current one is moving toward.
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Set the target position, leaving the current position untouched.
    pub fn set_target_position(&mut self, position: Vec3) {
        self.target_position = position;
    }

    /// Current scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the current scale. The target snaps to the same value.
    ///
    /// Negative components are accepted and mirror the geometry.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.target_scale = scale;
    }

    /// Scale the current one is moving toward.
    pub fn target_scale(&self) -> Vec3 {
        self.target_scale
    }

    /// Set the target scale, leaving the current scale untouched.
    pub fn set_target_scale(&mut self, scale: Vec3) {
        self.target_scale = scale;
    }

    /// Whether position and scale are within [`EPSILON`] of their targets and
    /// the orientation has reached its target.
    pub fn is_settled(&self) -> bool {
        self.orientation == self.target_orientation
            && !exceeds_epsilon(self.position, self.target_position)
            && !exceeds_epsilon(self.scale, self.target_scale)
    }

    /// Model matrix for the current state.
    ///
    /// Points are scaled first, then translated, then rotated, so the
    /// translation is expressed in the rotated frame. This is not the usual
    /// scale-rotate-translate order and the visual result differs from it.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation)
            * Mat4::from_translation(self.position)
            * Mat4::from_scale(self.scale)
    }

    /// Get the forward direction vector (+Z through the current orientation).
    pub fn forward(&self) -> Vec3 {
        apply(self.orientation, Vec3::Z)
    }

    /// Get the right direction vector (+X through the current orientation).
    pub fn right(&self) -> Vec3 {
        apply(self.orientation, Vec3::X)
    }

    /// Get the up direction vector (+Y through the current orientation).
    pub fn up(&self) -> Vec3 {
        apply(self.orientation, Vec3::Y)
    }

    /// Forward direction of the target orientation.
    pub fn target_forward(&self) -> Vec3 {
        apply(self.target_orientation, Vec3::Z)
    }

    /// Right direction of the target orientation.
    pub fn target_right(&self) -> Vec3 {
        apply(self.target_orientation, Vec3::X)
    }

    /// Up direction of the target orientation.
    pub fn target_up(&self) -> Vec3 {
        apply(self.target_orientation, Vec3::Y)
    }
}

fn exceeds_epsilon(current: Vec3, target: Vec3) -> bool {
    (current - target).abs().max_element() > EPSILON
}

fn normalized_or_identity(q: Quat) -> Quat {
    let length_squared = q.length_squared();
    if length_squared.is_finite() && length_squared > f32::EPSILON {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}
