//! Interaction: pointer input mapped onto an orbit-style camera controller.
//!
//! # Invariants
//! - Camera distance to the target stays within the configured bounds after
//!   every update, regardless of input magnitude.
//! - The controller never touches the camera directly; callers apply the
//!   position returned by `OrbitControls::update`.

pub mod orbit;

pub use orbit::{OrbitConfig, OrbitControls, PointerInput, Spherical};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
