//! Depth buffer management.
//!
//! [`DepthBuffer`] wraps the depth texture and view the presenter's render
//! pass tests against. It is recreated whenever the surface size changes.

use tracing::debug;

use frameview_core::{Error, Result};

/// Default depth buffer format (32-bit floating point).
pub const DEFAULT_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Depth texture sized to the surface.
pub struct DepthBuffer {
    /// Depth texture.
    texture: wgpu::Texture,
    /// View used as the depth attachment.
    view: wgpu::TextureView,
    /// Depth format.
    format: wgpu::TextureFormat,
    /// Dimensions in pixels.
    width: u32,
    height: u32,
}

impl DepthBuffer {
    /// Creates a new depth buffer with the specified dimensions and format.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Gpu(
                "Depth buffer dimensions must be greater than 0".to_string(),
            ));
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frameview_depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        debug!("Created depth buffer: {}x{} ({:?})", width, height, format);

        Ok(Self {
            texture,
            view,
            format,
            width,
            height,
        })
    }

    /// Creates a depth buffer with the default format (Depth32Float).
    pub fn with_default_format(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        Self::new(device, width, height, DEFAULT_DEPTH_FORMAT)
    }

    /// Returns the depth texture.
    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Returns the view to attach to a render pass.
    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Returns the depth format.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer already matches the given surface size.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth_format() {
        assert_eq!(DEFAULT_DEPTH_FORMAT, wgpu::TextureFormat::Depth32Float);
    }

    #[test]
    fn test_depth_format_is_valid() {
        assert!(DEFAULT_DEPTH_FORMAT.is_depth_stencil_format());
        assert!(DEFAULT_DEPTH_FORMAT.has_depth_aspect());
    }
}
