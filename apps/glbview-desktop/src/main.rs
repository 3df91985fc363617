use anyhow::{Context, Result};
use clap::Parser;
use glbview_assets::{AssetLoader, LoadHandle};
use glbview_common::Viewport;
use glbview_input::PointerInput;
use glbview_render_wgpu::WgpuRenderer;
use glbview_viewer::{Viewer, ViewerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "glbview-desktop", about = "Interactive GLB model viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model to load (overrides the configuration)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Uniform scale applied to the model after centering
    #[arg(long)]
    scale: Option<f32>,

    /// Initial window width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(scale) = self.scale {
            config.fit.scale = scale;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        Ok(config)
    }
}

fn viewport_of(size: PhysicalSize<u32>) -> Viewport {
    Viewport::new(size.width, size.height)
}

struct GpuApp {
    config: ViewerConfig,
    loader: AssetLoader,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<WgpuRenderer>>,
    load: Option<LoadHandle>,
    cursor: (f32, f32),
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            loader: AssetLoader::new(),
            window: None,
            viewer: None,
            load: None,
            cursor: (0.0, 0.0),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_transparent(self.config.renderer.alpha);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let viewport = viewport_of(window.inner_size());
        let renderer = WgpuRenderer::new(window.clone(), viewport, self.config.renderer)
            .context("initialize GPU renderer")?;

        let mut viewer = Viewer::bootstrap(viewport, &self.config, renderer);
        self.load = Some(viewer.begin_load(&self.loader, self.config.model_path.clone()));

        self.viewer = Some(viewer);
        self.window = Some(window);
        Ok(())
    }

    fn handle_pointer(&mut self, input: PointerInput) {
        if let Some(viewer) = &mut self.viewer {
            viewer.handle_input(input);
        }
    }

    fn redraw(&mut self) {
        let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) else {
            return;
        };

        if let Some(load) = &mut self.load {
            viewer.poll_load(load);
            if load.is_finished() {
                self.load = None;
            }
        }

        if let Err(e) = viewer.frame() {
            tracing::error!("render error: {e}");
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            tracing::error!("startup failed: {err:#}");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.resize(viewport_of(new_size));
                }
            }
            WindowEvent::Focused(false) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.focus_lost();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                let (x, y) = self.cursor;
                self.handle_pointer(PointerInput::DragMove { x, y });
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let (x, y) = self.cursor;
                self.handle_pointer(match state {
                    ElementState::Pressed => PointerInput::DragStart { x, y },
                    ElementState::Released => PointerInput::DragEnd,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling up as positive; the controls expect the opposite.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.handle_pointer(PointerInput::Wheel { delta_y });
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.viewer_config()?;
    tracing::info!(model = %config.model_path.display(), "glbview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
