use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Initial camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

/// Perspective camera that always looks at `target`.
///
/// The projection matrix is cached; after changing `fov_degrees`, `aspect`,
/// `near` or `far`, call [`PerspectiveCamera::update_projection_matrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: config.position,
            target: config.target,
            up: Vec3::Y,
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PerspectiveCamera::new(&CameraConfig::default(), 800.0 / 600.0);
        assert_eq!(cam.fov_degrees, 45.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        assert!((cam.distance_to_target() - 5.0).abs() < 1e-6);
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn projection_follows_aspect_after_update() {
        let mut cam = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        let square = cam.projection_matrix();

        cam.aspect = 2.0;
        assert_eq!(cam.projection_matrix(), square);

        cam.update_projection_matrix();
        let wide = cam.projection_matrix();
        assert!((wide.col(0).x - square.col(0).x / 2.0).abs() < 1e-6);
        assert_eq!(wide.col(1).y, square.col(1).y);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = PerspectiveCamera::new(&CameraConfig::default(), 1.5);
        let clip = cam.view_projection() * cam.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
    }
}
