//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers cannot mutate the scene.
//! - A frame is valid whether or not a model is attached.
//!
//! The `Renderer` trait is implemented by the wgpu backend and by a debug
//! text renderer; the viewer is generic over it, so the same frame logic runs
//! headless in tests and on the GPU in the desktop app.

mod camera;
mod renderer;
mod settings;

pub use camera::{CameraConfig, PerspectiveCamera};
pub use renderer::{DebugTextRenderer, Renderer};
pub use settings::{ColorSpace, RendererSettings, ToneMapping};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
