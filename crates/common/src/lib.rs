//! Shared value types for the glbview workspace.
//!
//! Everything here is plain data: identifiers, transforms, bounding boxes,
//! colors and the viewport size. No crate in the workspace depends on
//! anything lower than this one.

mod types;

pub use types::{Aabb, Color, NodeId, Transform, Viewport};
