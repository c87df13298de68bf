//! frameview - Main Entry Point
//!
//! A small real-time scene viewer: a tree of interpolating frames under a
//! flight camera, drawn through an immediate-mode backend onto wgpu.

mod config;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use frameview_core::{FpsCounter, Timer};
use frameview_platform::{KeyPress, Window, handle_window_event};
use frameview_renderer::{ImmediateRenderer, Presenter};
use frameview_scene::{Camera, InputState, Key};

use crate::config::ViewerConfig;

struct App {
    config: ViewerConfig,
    window: Option<Window>,
    presenter: Option<Presenter>,
    backend: ImmediateRenderer,
    camera: Camera,
    input: InputState,
    timer: Timer,
    fps: FpsCounter,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let mut camera = Camera::with_settings(config.camera.behavior, config.camera.settings);
        let mut rng = match config.scene.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        scene::populate(&mut camera, &mut rng);

        Self {
            config,
            window: None,
            presenter: None,
            backend: ImmediateRenderer::new(),
            camera,
            input: InputState::new(),
            timer: Timer::new(),
            fps: FpsCounter::default(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Window::new(event_loop, &self.config.window)?;
        let presenter = pollster::block_on(Presenter::new(
            window.inner_arc(),
            self.config.scene.clear_color(),
        ))?;

        self.camera.resize(window.viewport(), &mut self.backend);
        self.presenter = Some(presenter);
        self.window = Some(window);
        self.timer.reset();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if let Some(ref mut window) = self.window {
            window.resize(width, height);
            self.camera.resize(window.viewport(), &mut self.backend);
        }
        if let Some(ref mut presenter) = self.presenter {
            presenter.resize(width, height)?;
        }
        Ok(())
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, press: KeyPress) {
        match press.key {
            Key::Escape => {
                info!("Escape pressed, shutting down");
                event_loop.exit();
            }
            Key::Enter if !press.repeat => {
                if let Some(ref window) = self.window {
                    window.toggle_fullscreen();
                }
            }
            _ => {}
        }
    }

    fn frame(&mut self) -> Result<()> {
        let dt = self.timer.tick();
        let dt_secs = dt.as_secs_f32();

        self.camera.update(dt_secs, &mut self.input);
        scene::tint_overlays(&mut self.camera);

        self.camera.render(&mut self.backend, dt.as_secs_f64());
        if let Some(ref mut presenter) = self.presenter {
            presenter.present(self.backend.geometry())?;
        }

        if let Some(fps) = self.fps.record(dt)
            && let Some(ref window) = self.window
        {
            window.show_fps(fps);
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match self.init(event_loop) {
                Ok(()) => info!("Initialization complete, entering main loop"),
                Err(e) => {
                    error!("Failed to initialize: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(size.width, size.height) {
                    error!("Resize failed: {:#}", e);
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame() {
                    error!("Render error: {:#}", e);
                    event_loop.exit();
                }
            }
            event => {
                if let Some(press) = handle_window_event(&event, &mut self.input) {
                    self.on_key(event_loop, press);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    frameview_core::init_logging();
    info!("Starting frameview");

    let path: Option<PathBuf> = frameview_core::config::config_path(std::env::args().nth(1));
    let config: ViewerConfig = frameview_core::config::load_or_default(path.as_deref())
        .context("failed to load configuration")?;

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create app and run
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
