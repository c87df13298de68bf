//! Window management using winit.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window as WinitWindow, WindowAttributes};

use frameview_core::{Error, Result, WindowConfig};
use frameview_scene::Viewport;

/// A window wrapper that tracks the client size and base title.
pub struct Window {
    window: Arc<WinitWindow>,
    title: String,
    width: u32,
    height: u32,
}

impl Window {
    /// Create a new window from its configuration.
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attrs = WindowAttributes::default()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(true);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| Error::Window(e.to_string()))?;

        // The platform may not honour the requested size exactly.
        let size = window.inner_size();
        tracing::info!("Window created: {}x{}", size.width, size.height);

        Ok(Self {
            window: Arc::new(window),
            title: config.title.clone(),
            width: size.width,
            height: size.height,
        })
    }

    /// Get an Arc reference to the underlying winit window.
    pub fn inner_arc(&self) -> Arc<WinitWindow> {
        self.window.clone()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The client rectangle as a viewport.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Update the stored dimensions (call this when handling resize events).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        tracing::debug!("Window resized: {}x{}", width, height);
    }

    /// Show the frame rate after the base title.
    pub fn show_fps(&self, fps: f32) {
        self.window
            .set_title(&format!("{} ({:.2})", self.title, fps));
    }

    pub fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    /// Switch between windowed and borderless fullscreen.
    pub fn toggle_fullscreen(&self) {
        if self.is_fullscreen() {
            self.window.set_fullscreen(None);
            tracing::info!("Leaving fullscreen");
        } else {
            self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            tracing::info!("Entering fullscreen");
        }
    }

    /// Request a redraw of the window.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
