//! Uploads recorded frame geometry and draws it to the window.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, info, warn};
use winit::window::Window;

use frameview_core::{Error, Result};
use frameview_scene::Color;

use crate::depth_buffer::DepthBuffer;
use crate::gpu::Gpu;
use crate::immediate::{FrameGeometry, GpuVertex, Topology};

/// Initial vertex buffer size in bytes; grows on demand.
const INITIAL_VERTEX_CAPACITY: u64 = 64 * 1024;

/// Draws [`FrameGeometry`] with one pipeline per topology.
///
/// Both pipelines alpha blend and depth test with `LessEqual`, so geometry
/// recorded later wins ties and translucent shapes show what is behind them.
pub struct Presenter {
    gpu: Gpu,
    depth_buffer: DepthBuffer,
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity_bytes: u64,
    clear_color: wgpu::Color,
}

impl Presenter {
    /// Create the GPU context for `window` and build the pipelines.
    pub async fn new(window: Arc<Window>, clear_color: Color) -> Result<Self> {
        let gpu = Gpu::new(window).await?;

        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Immediate Shader"),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "shaders/immediate.wgsl"
                ))),
            });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Immediate Pipeline Layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let line_pipeline = create_pipeline(
            &gpu,
            &pipeline_layout,
            &shader,
            wgpu::PrimitiveTopology::LineList,
        );
        let triangle_pipeline = create_pipeline(
            &gpu,
            &pipeline_layout,
            &shader,
            wgpu::PrimitiveTopology::TriangleList,
        );

        let depth_buffer =
            DepthBuffer::with_default_format(&gpu.device, gpu.width().max(1), gpu.height().max(1))?;

        let vertex_buffer = create_vertex_buffer(&gpu.device, INITIAL_VERTEX_CAPACITY);

        info!("Presenter initialized ({}x{})", gpu.width(), gpu.height());

        Ok(Self {
            gpu,
            depth_buffer,
            line_pipeline,
            triangle_pipeline,
            vertex_buffer,
            vertex_capacity_bytes: INITIAL_VERTEX_CAPACITY,
            clear_color: to_wgpu_color(clear_color),
        })
    }

    /// Resize the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if !self.gpu.resize(width, height) {
            return Ok(());
        }
        if !self.depth_buffer.matches(width, height) {
            self.depth_buffer = DepthBuffer::with_default_format(&self.gpu.device, width, height)?;
        }
        debug!("Presenter resized to {}x{}", width, height);
        Ok(())
    }

    fn ensure_capacity(&mut self, bytes: u64) {
        if bytes > self.vertex_capacity_bytes {
            let new_size = bytes.next_power_of_two().max(INITIAL_VERTEX_CAPACITY);
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, new_size);
            self.vertex_capacity_bytes = new_size;
            debug!("Vertex buffer grown to {} bytes", new_size);
        }
    }

    /// Draw one frame and present it.
    ///
    /// Transient surface errors skip the frame; running out of memory is an error.
    pub fn present(&mut self, geometry: &FrameGeometry) -> Result<()> {
        if self.gpu.is_zero_sized() {
            return Ok(());
        }

        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface texture acquisition timed out, frame skipped");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Error::Surface("out of memory acquiring frame".into()));
            }
            Err(wgpu::SurfaceError::Other) => {
                warn!("Surface texture acquisition failed, frame skipped");
                return Ok(());
            }
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.gpu.view_format()),
            ..Default::default()
        });

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&geometry.vertices);
        let vertex_len = vertex_bytes.len() as u64;
        if vertex_len > 0 {
            self.ensure_capacity(vertex_len);
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        }

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth_buffer.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let viewport = geometry.viewport;
            let fits = viewport.x >= 0
                && viewport.y >= 0
                && viewport.x as u32 + viewport.width <= self.gpu.width()
                && viewport.y as u32 + viewport.height <= self.gpu.height();
            if !viewport.is_degenerate() && fits {
                pass.set_viewport(
                    viewport.x as f32,
                    viewport.y as f32,
                    viewport.width as f32,
                    viewport.height as f32,
                    0.0,
                    1.0,
                );
            }

            if vertex_len > 0 {
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_len));
                let mut bound = None;
                for command in &geometry.commands {
                    if bound != Some(command.topology) {
                        let pipeline = match command.topology {
                            Topology::LineList => &self.line_pipeline,
                            Topology::TriangleList => &self.triangle_pipeline,
                        };
                        pass.set_pipeline(pipeline);
                        bound = Some(command.topology);
                    }
                    pass.draw(command.vertices.clone(), 0..1);
                }
            }
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Immediate Vertex Buffer"),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    gpu: &Gpu,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    gpu.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(match topology {
                wgpu::PrimitiveTopology::LineList => "Immediate Line Pipeline",
                _ => "Immediate Triangle Pipeline",
            }),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.view_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::depth_buffer::DEFAULT_DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
}
