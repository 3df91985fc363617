//! wgpu render backend for the model viewer.
//!
//! Draws every mesh of every attached model with Lambert lighting from the
//! scene's ambient and directional lights, tone mapped and encoded per
//! [`RendererSettings`](glbview_render::RendererSettings).
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Surface size always matches the last viewport passed to `set_size`,
//!   clamped to at least one pixel.

mod gpu;
mod shaders;
mod uniforms;

pub use gpu::WgpuRenderer;
pub use uniforms::MAX_DIRECTIONAL_LIGHTS;

/// Errors from setting up or driving the GPU.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
