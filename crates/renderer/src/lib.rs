//! Rendering backend for the frame tree.
//!
//! This crate turns the scene's immediate-mode calls into pixels:
//! - Matrix stacks and CPU vertex transformation
//! - Frame geometry recording
//! - wgpu surface, depth buffer and presentation

pub mod depth_buffer;
pub mod gpu;
pub mod immediate;
pub mod matrix_stack;
pub mod presenter;

pub use depth_buffer::{DEFAULT_DEPTH_FORMAT, DepthBuffer};
pub use gpu::Gpu;
pub use immediate::{DrawCommand, FrameGeometry, GpuVertex, ImmediateRenderer, Topology};
pub use matrix_stack::MatrixStack;
pub use presenter::Presenter;
