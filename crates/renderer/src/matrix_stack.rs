//! Fixed-function style matrix stack.

use glam::Mat4;
use tracing::warn;

/// A stack of matrices whose top is the current transform.
///
/// The stack always holds at least one matrix. Popping the last one is
/// ignored, so unbalanced push/pop pairs in a drawable degrade the picture
/// instead of aborting the frame.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    name: &'static str,
    stack: Vec<Mat4>,
}

impl MatrixStack {
    /// Create a stack holding a single identity matrix.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// The current matrix.
    pub fn top(&self) -> Mat4 {
        *self.stack.last().unwrap_or(&Mat4::IDENTITY)
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        if self.stack.is_empty() {
            self.stack.push(Mat4::IDENTITY);
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Number of matrices on the stack (at least one).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Duplicate the current matrix.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Restore the matrix below the current one.
    ///
    /// Returns `false` (and leaves the stack untouched) on underflow.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            warn!("{} matrix stack underflow ignored", self.name);
            return false;
        }
        self.stack.pop();
        true
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::IDENTITY;
    }

    pub fn load(&mut self, matrix: Mat4) {
        *self.top_mut() = matrix;
    }

    /// Post-multiply: `top = top * matrix`.
    pub fn multiply(&mut self, matrix: Mat4) {
        let top = self.top_mut();
        *top = *top * matrix;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_push_pop_restores() {
        let mut stack = MatrixStack::new("test");
        let translate = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        stack.load(translate);

        stack.push();
        stack.multiply(Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(stack.depth(), 2);
        assert_ne!(stack.top(), translate);

        assert!(stack.pop());
        assert_eq!(stack.top(), translate);
    }

    #[test]
    fn test_underflow_ignored() {
        let mut stack = MatrixStack::new("test");
        stack.load(Mat4::from_scale(Vec3::splat(3.0)));
        assert!(!stack.pop());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::from_scale(Vec3::splat(3.0)));
    }

    #[test]
    fn test_multiply_is_post_multiplication() {
        let mut stack = MatrixStack::new("test");
        let a = Mat4::from_translation(Vec3::X);
        let b = Mat4::from_rotation_z(1.0);
        stack.load(a);
        stack.multiply(b);
        assert_eq!(stack.top(), a * b);
    }
}
