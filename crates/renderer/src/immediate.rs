//! Immediate-mode backend that records clip-space geometry.
//!
//! [`ImmediateRenderer`] implements the scene's [`RenderBackend`] on the CPU.
//! Each vertex is transformed by the current projection and model-view
//! matrices the moment it is emitted and appended to a [`FrameGeometry`]:
//! one vertex list plus an ordered list of draw commands over it. The
//! presenter uploads that list once per frame and replays the commands.

use std::mem;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use tracing::warn;

use frameview_scene::{Color, MatrixMode, Primitive, RenderBackend, Viewport};

use crate::matrix_stack::MatrixStack;

/// Vertex as uploaded to the GPU.
///
/// # Memory Layout
///
/// - Offset 0: clip-space position (16 bytes)
/// - Offset 16: color (16 bytes)
/// - Offset 32: stipple flag, 0 or 1 (4 bytes)
/// - Total size: 36 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub clip_position: [f32; 4],
    pub color: [f32; 4],
    pub stipple: f32,
}

impl GpuVertex {
    /// Size of the struct in bytes.
    pub const SIZE: usize = mem::size_of::<Self>();

    pub const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4, 2 => Float32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    pub fn clip(&self) -> Vec4 {
        Vec4::from_array(self.clip_position)
    }
}

/// Primitive topology of a draw command after quads were split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    LineList,
    TriangleList,
}

/// A contiguous run of vertices drawn with one topology.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub topology: Topology,
    pub vertices: Range<u32>,
    /// Requested line width; only meaningful for [`Topology::LineList`].
    pub line_width: f32,
}

/// Everything recorded for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameGeometry {
    pub viewport: Viewport,
    pub vertices: Vec<GpuVertex>,
    pub commands: Vec<DrawCommand>,
}

impl FrameGeometry {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.commands.clear();
    }

    /// Append assembled vertices, extending the last command when it has the
    /// same topology and line width.
    fn append(&mut self, topology: Topology, line_width: f32, vertices: &[GpuVertex]) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let end = self.vertices.len() as u32;

        if let Some(last) = self.commands.last_mut()
            && last.topology == topology
            && last.line_width == line_width
            && last.vertices.end == start
        {
            last.vertices.end = end;
            return;
        }
        self.commands.push(DrawCommand {
            topology,
            vertices: start..end,
            line_width,
        });
    }
}

/// CPU implementation of the immediate-mode backend.
#[derive(Debug)]
pub struct ImmediateRenderer {
    viewport: Viewport,
    mode: MatrixMode,
    projection: MatrixStack,
    model_view: MatrixStack,

    color: Color,
    line_width: f32,
    stipple: bool,

    /// Primitive opened by `begin` and the vertices emitted since.
    open: Option<Primitive>,
    pending: Vec<GpuVertex>,

    geometry: FrameGeometry,
}

impl Default for ImmediateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateRenderer {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::EMPTY,
            mode: MatrixMode::ModelView,
            projection: MatrixStack::new("projection"),
            model_view: MatrixStack::new("model-view"),
            color: Color::WHITE,
            line_width: 1.0,
            stipple: false,
            open: None,
            pending: Vec::new(),
            geometry: FrameGeometry::default(),
        }
    }

    /// Geometry recorded since the last `clear`.
    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    pub fn projection(&self) -> &MatrixStack {
        &self.projection
    }

    pub fn model_view(&self) -> &MatrixStack {
        &self.model_view
    }

    fn stack_mut(&mut self) -> &mut MatrixStack {
        match self.mode {
            MatrixMode::Projection => &mut self.projection,
            MatrixMode::ModelView => &mut self.model_view,
        }
    }

    fn assemble(&mut self, primitive: Primitive) {
        let pending = mem::take(&mut self.pending);
        let (topology, arity) = match primitive {
            Primitive::Lines => (Topology::LineList, 2),
            Primitive::Triangles => (Topology::TriangleList, 3),
            Primitive::Quads => (Topology::TriangleList, 4),
        };

        let leftover = pending.len() % arity;
        if leftover != 0 {
            warn!(
                "{:?} ended with {} dangling vertices, dropped",
                primitive, leftover
            );
        }
        let complete = &pending[..pending.len() - leftover];

        match primitive {
            Primitive::Quads => {
                let triangles: Vec<GpuVertex> = complete
                    .chunks_exact(4)
                    .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
                    .collect();
                self.geometry.append(topology, self.line_width, &triangles);
            }
            Primitive::Lines | Primitive::Triangles => {
                self.geometry.append(topology, self.line_width, complete);
            }
        }

        self.pending = pending;
        self.pending.clear();
    }
}

impl RenderBackend for ImmediateRenderer {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.geometry.viewport = viewport;
    }

    fn clear(&mut self) {
        if self.open.take().is_some() {
            warn!("Frame cleared inside begin/end, primitive discarded");
        }
        self.pending.clear();
        self.geometry.clear();
        self.geometry.viewport = self.viewport;
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    fn push_matrix(&mut self) {
        self.stack_mut().push();
    }

    fn pop_matrix(&mut self) {
        self.stack_mut().pop();
    }

    fn load_identity(&mut self) {
        self.stack_mut().load_identity();
    }

    fn load_matrix(&mut self, matrix: Mat4) {
        self.stack_mut().load(matrix);
    }

    fn multiply_matrix(&mut self, matrix: Mat4) {
        self.stack_mut().multiply(matrix);
    }

    fn current_matrix(&self) -> Mat4 {
        match self.mode {
            MatrixMode::Projection => self.projection.top(),
            MatrixMode::ModelView => self.model_view.top(),
        }
    }

    fn begin(&mut self, primitive: Primitive) {
        if let Some(open) = self.open.take() {
            warn!("begin({:?}) while {:?} still open, closing it", primitive, open);
            self.assemble(open);
        }
        self.open = Some(primitive);
    }

    fn color(&mut self, color: Color) {
        self.color = color;
    }

    // Unlit: normals do not reach the vertex format.
    fn normal(&mut self, _normal: Vec3) {}

    fn vertex(&mut self, position: Vec3) {
        if self.open.is_none() {
            warn!("vertex emitted outside begin/end, ignored");
            return;
        }
        let clip = self.projection.top() * self.model_view.top() * position.extend(1.0);
        self.pending.push(GpuVertex {
            clip_position: clip.to_array(),
            color: self.color.to_array(),
            stipple: if self.stipple { 1.0 } else { 0.0 },
        });
    }

    fn end(&mut self) {
        match self.open.take() {
            Some(primitive) => self.assemble(primitive),
            None => warn!("end without begin ignored"),
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn set_line_stipple(&mut self, enabled: bool) {
        self.stipple = enabled;
    }
}
