//! Viewer: the single owned context tying scene, camera, controls and renderer together.
//!
//! Startup order is bootstrap, lighting, controls, then a fire-and-forget
//! model load; frames render from the first tick whether or not the model
//! has arrived.
//!
//! # Invariants
//! - Camera aspect equals viewport width over height after bootstrap and
//!   after every resize.
//! - The scene is only mutated on the thread that owns the viewer.
//! - At most one model is attached per session.

mod config;
mod viewer;

pub use config::{ConfigError, ViewerConfig, WindowConfig};
pub use viewer::{LoadStatus, Viewer};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
