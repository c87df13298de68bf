//! GPU context: device, queue and the window surface.

use std::sync::Arc;

use tracing::{debug, info};
use winit::window::Window;

use frameview_core::{Error, Result};

/// Owns the wgpu objects tied to one window.
pub struct Gpu {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    /// The surface holds an `Arc` of the window, so it cannot outlive it.
    pub surface: wgpu::Surface<'static>,
    pub surface_format: wgpu::TextureFormat,
    pub config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    /// Create a GPU context for `window` and configure its surface.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Surface(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Gpu(format!("failed to request adapter: {e}")))?;

        let adapter_info = adapter.get_info();
        info!(
            "Selected adapter: {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| Error::Gpu(format!("failed to request device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| Error::Surface("surface reported no supported formats".into()))?;
        debug!("Surface format: {:?}", surface_format);

        let config = Self::make_surface_config(size.width, size.height, surface_format);
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_format,
            config,
        })
    }

    /// Format of the views rendered into.
    ///
    /// Colors are written as given, without an sRGB conversion.
    pub fn view_format(&self) -> wgpu::TextureFormat {
        self.surface_format.remove_srgb_suffix()
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Whether the surface currently has no area (e.g. minimized).
    pub fn is_zero_sized(&self) -> bool {
        self.config.width == 0 || self.config.height == 0
    }

    /// Reconfigure the surface for a new size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            debug!("Ignoring zero-sized surface resize {}x{}", width, height);
            return false;
        }
        self.config = Self::make_surface_config(width, height, self.surface_format);
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Configure the surface again with the current settings (after `Lost`/`Outdated`).
    pub fn reconfigure(&self) {
        if !self.is_zero_sized() {
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn make_surface_config(
        width: u32,
        height: u32,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            view_formats: vec![surface_format.remove_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}
