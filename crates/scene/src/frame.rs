//! Frame hierarchy.
//!
//! A [`Frame`] is a node in the scene's transform tree. It owns a
//! [`Transform`], an ordered list of child frames and a [`Drawable`] that
//! decides what the node contributes to the picture. The three traversals
//! (`resize`, `update`, `render`) all visit children in insertion order.
//!
//! Parent state reaches children only through the backend's matrix stack:
//! [`Frame::render_base`] multiplies this node's matrix onto the stack before
//! rendering the children, so every child is drawn relative to its parent.
//! Saving and restoring the stack is the drawable's business; the default
//! [`Drawable::render`] brackets the node in `push_matrix`/`pop_matrix`.

use std::any::Any;
use std::fmt;

use glam::{Quat, Vec3};

use crate::backend::{RenderBackend, Viewport};
use crate::transform::Transform;

/// What a frame draws, and how it participates in traversal.
pub trait Drawable: Any + fmt::Debug {
    /// Emit this node's geometry. The node's own matrix is already on the stack.
    fn draw(&self, backend: &mut dyn RenderBackend, viewport: Viewport, time: f64);

    /// Render the node: by default save the stack, apply the node's transform
    /// and render its children, draw the node's own geometry, restore the stack.
    ///
    /// Override to change stack discipline, e.g. for screen-space widgets that
    /// ignore the tree's transforms.
    fn render(&self, frame: &Frame, backend: &mut dyn RenderBackend, time: f64) {
        backend.push_matrix();
        frame.render_base(backend, time);
        self.draw(backend, frame.viewport(), time);
        backend.pop_matrix();
    }

    /// Called after the node's transform advanced and its children updated.
    fn update(&mut self, _transform: &mut Transform, _dt: f32) {}
}

/// A drawable that draws nothing; turns a frame into a pure grouping node.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl Drawable for Empty {
    fn draw(&self, _backend: &mut dyn RenderBackend, _viewport: Viewport, _time: f64) {}
}

/// A node in the transform tree.
#[derive(Debug)]
pub struct Frame {
    transform: Transform,
    children: Vec<Frame>,
    viewport: Viewport,
    drawable: Box<dyn Drawable>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Empty)
    }
}

impl Frame {
    /// Create a frame at the origin drawing `drawable`.
    pub fn new(drawable: impl Drawable) -> Self {
        Self {
            transform: Transform::default(),
            children: Vec::new(),
            viewport: Viewport::EMPTY,
            drawable: Box::new(drawable),
        }
    }

    /// Create an empty grouping frame.
    pub fn group() -> Self {
        Self::default()
    }

    /// Builder: snap position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.set_position(position);
        self
    }

    /// Builder: snap orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.transform.set_orientation(orientation);
        self
    }

    /// Builder: snap scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.set_scale(scale);
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: Frame) -> Self {
        self.children.push(child);
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Child frames in traversal order.
    pub fn children(&self) -> &[Frame] {
        &self.children
    }

    /// The child list itself. Children may be added, removed or reordered
    /// freely between traversals.
    pub fn children_mut(&mut self) -> &mut Vec<Frame> {
        &mut self.children
    }

    /// Append a child; it is visited after all existing children.
    pub fn push_child(&mut self, child: Frame) {
        self.children.push(child);
    }

    /// Last viewport passed to [`Frame::resize`].
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The drawable, if it is a `T`.
    pub fn drawable<T: Drawable>(&self) -> Option<&T> {
        let drawable: &dyn Any = &*self.drawable;
        drawable.downcast_ref::<T>()
    }

    /// The drawable, mutably, if it is a `T`.
    pub fn drawable_mut<T: Drawable>(&mut self) -> Option<&mut T> {
        let drawable: &mut dyn Any = &mut *self.drawable;
        drawable.downcast_mut::<T>()
    }

    /// Cache the viewport and pass it down the tree.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for child in &mut self.children {
            child.resize(viewport);
        }
    }

    /// Advance this node's transform, update the children, then let the
    /// drawable react.
    pub fn update(&mut self, dt: f32) {
        self.transform.advance(dt);
        for child in &mut self.children {
            child.update(dt);
        }
        self.drawable.update(&mut self.transform, dt);
    }

    /// Render this node through its drawable.
    pub fn render(&self, backend: &mut dyn RenderBackend, time: f64) {
        self.drawable.render(self, backend, time);
    }

    /// Multiply this node's matrix onto the stack and render the children.
    ///
    /// Draws nothing and does not save the stack.
    pub fn render_base(&self, backend: &mut dyn RenderBackend, time: f64) {
        backend.multiply_matrix(self.transform.local_matrix());
        for child in &self.children {
            child.render(backend, time);
        }
    }
}
