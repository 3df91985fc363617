//! Scene graph: the root that lights and the loaded model hang off.
//!
//! # Invariants
//! - The scene is valid and renderable with zero models (lights only).
//! - Objects are attached, never removed, for the lifetime of the scene.
//! - Model sub-graphs are owned trees; there are no back-references.

mod fit;
mod light;
mod node;
mod scene;

pub use fit::{FitConfig, FitReport, fit_to_origin};
pub use light::{DirectionalLightConfig, Light, LightingConfig, add_lighting};
pub use node::{MeshData, SceneNode, box_mesh};
pub use scene::Scene;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
