use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::node::SceneNode;

/// How a freshly loaded model is framed before it is attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Uniform scale assigned to the model root.
    pub scale: f32,
    /// Re-center after scaling so the final bounds are centered on the origin.
    /// When false, the position from the first centering pass is kept and the
    /// scale pivots around the model's own origin.
    pub recenter_after_scale: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            recenter_after_scale: true,
        }
    }
}

/// What [`fit_to_origin`] did to a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitReport {
    /// Bounding-box center before any adjustment.
    pub original_center: Vec3,
    /// Node position right after the first centering pass.
    pub centered_position: Vec3,
    pub final_position: Vec3,
    pub scale: Vec3,
    /// Bounding-box size after scaling.
    pub size: Vec3,
}

/// Center `node` on the origin and apply the configured uniform scale.
///
/// Returns `None` and leaves the node untouched if it has no geometry.
pub fn fit_to_origin(node: &mut SceneNode, config: &FitConfig) -> Option<FitReport> {
    let bounds = node.bounding_box();
    if bounds.is_empty() {
        tracing::warn!(name = %node.name, "model has no geometry; skipping fit");
        return None;
    }

    let original_center = bounds.center();
    node.transform.position -= original_center;
    let centered_position = node.transform.position;

    node.transform.scale = Vec3::splat(config.scale);

    let scaled = node.bounding_box();
    if config.recenter_after_scale {
        node.transform.position -= scaled.center();
    }

    let report = FitReport {
        original_center,
        centered_position,
        final_position: node.transform.position,
        scale: node.transform.scale,
        size: scaled.size(),
    };
    tracing::debug!(
        center = ?report.original_center,
        position = ?report.final_position,
        scale = config.scale,
        "model fitted"
    );
    Some(report)
}
