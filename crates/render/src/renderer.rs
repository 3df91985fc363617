use std::fmt::Write as _;

use glbview_common::Viewport;
use glbview_scene::{Light, Scene};

use crate::camera::PerspectiveCamera;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and the camera, then produces output. It
/// never mutates the scene; the viewer owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Resize the draw target.
    fn set_size(&mut self, viewport: Viewport);

    /// Current draw target size.
    fn size(&self) -> Viewport;

    /// Render one frame of `scene` as seen through `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Headless renderer producing a human-readable frame summary.
///
/// Useful for CLI output, logging, and testing the viewer without a GPU.
#[derive(Debug)]
pub struct DebugTextRenderer {
    size: Viewport,
    frames: u64,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            size: Viewport::new(1, 1),
            frames: 0,
        }
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn set_size(&mut self, viewport: Viewport) {
        self.size = viewport.clamped();
        tracing::trace!(width = self.size.width, height = self.size.height, "text target resized");
    }

    fn size(&self) -> Viewport {
        self.size
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.frames += 1;

        let ambient = scene.lights().filter(|(_, l)| l.is_ambient()).count();
        let directional = scene.lights().filter(|(_, l)| l.is_directional()).count();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}) ===",
            self.frames, self.size.width, self.size.height
        );
        let _ = writeln!(
            out,
            "Lights: {} (ambient {ambient}, directional {directional})",
            scene.light_count()
        );
        for (id, light) in scene.lights() {
            let kind = match light {
                Light::Ambient { .. } => "ambient",
                Light::Directional { .. } => "directional",
            };
            let _ = writeln!(
                out,
                "  [{}] {kind} #{:06x} x{:.2}",
                id.short(),
                light.color().to_hex(),
                light.intensity()
            );
        }
        let _ = writeln!(out, "Models: {}", scene.model_count());
        for (id, node) in scene.models() {
            let t = node.transform;
            let c = node.bounding_box().center();
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2}) meshes={} center=({:.2}, {:.2}, {:.2})",
                id.short(),
                node.name,
                t.position.x,
                t.position.y,
                t.position.z,
                t.scale.x,
                t.scale.y,
                t.scale.z,
                node.mesh_count(),
                c.x,
                c.y,
                c.z
            );
        }
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees,
            camera.aspect
        );

        out
    }
}
