//! Asset loading: fetch one GLB off the render thread and turn it into a scene node.
//!
//! The loader never touches the scene. It posts progress, success and
//! failure events through a channel; the owner of the scene drains them on
//! its own thread and decides what to attach.
//!
//! # Invariants
//! - Every load ends with exactly one `Loaded` or `Failed` event.
//! - Progress with an unknown total never reports a fraction.

mod import;
mod loader;
pub mod sample;

pub use import::parse_model;
pub use loader::{AssetLoader, LoadEvent, LoadHandle, LoadProgress, read_with_progress};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF document has no scene")]
    NoScene,
    #[error("missing buffer data: {0}")]
    MissingBuffer(String),
    #[error("missing or invalid vertex data: {0}")]
    MissingAttribute(String),
    #[error("loader thread stopped before reporting a result")]
    Disconnected,
}

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
