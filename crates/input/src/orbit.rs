use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use glbview_common::Viewport;
use serde::{Deserialize, Serialize};

/// Smallest polar angle kept away from the poles, so the view never flips.
const POLE_EPSILON: f32 = 1e-6;

/// Pointer events, already translated from the windowing layer.
/// Coordinates are in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    DragStart { x: f32, y: f32 },
    DragMove { x: f32, y: f32 },
    DragEnd,
    /// Browser wheel convention: positive `delta_y` scrolls down and zooms out.
    Wheel { delta_y: f32 },
}

/// Orbit controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied (and removed) each update.
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// 2.0 means one full turn every 30 seconds at 60 updates per second.
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: true,
            auto_rotate_speed: 2.0,
            rotate_speed: 1.0,
            enable_zoom: true,
            zoom_speed: 1.0,
            min_distance: 2.0,
            max_distance: 10.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// Spherical coordinates around the Y axis.
/// `phi` is measured from +Y, `theta` around Y starting at +Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
    }
}

/// Damped orbit controller around a target point.
///
/// Input only accumulates pending rotation and zoom; nothing moves until
/// [`OrbitControls::update`] is called, which the render loop does once per frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub config: OrbitConfig,
    pub target: Vec3,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    zoom_scale: f32,
    drag: Option<Vec2>,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            target: Vec3::ZERO,
            spherical: Spherical::default(),
            delta_theta: 0.0,
            delta_phi: 0.0,
            zoom_scale: 1.0,
            drag: None,
            viewport_height: 1.0,
        }
    }

    /// Drag distances are measured relative to the viewport height.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport_height = viewport.height.max(1) as f32;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Azimuth after the last update, in radians.
    pub fn azimuthal_angle(&self) -> f32 {
        self.spherical.theta
    }

    /// Polar angle after the last update, in radians.
    pub fn polar_angle(&self) -> f32 {
        self.spherical.phi
    }

    pub fn handle_input(&mut self, input: PointerInput) {
        match input {
            PointerInput::DragStart { x, y } => {
                self.drag = Some(Vec2::new(x, y));
            }
            PointerInput::DragMove { x, y } => {
                let Some(last) = self.drag else {
                    return;
                };
                let current = Vec2::new(x, y);
                let delta = (current - last) * self.config.rotate_speed;
                self.rotate_left(TAU * delta.x / self.viewport_height);
                self.rotate_up(TAU * delta.y / self.viewport_height);
                self.drag = Some(current);
            }
            PointerInput::DragEnd => {
                self.drag = None;
            }
            PointerInput::Wheel { delta_y } => {
                if !self.config.enable_zoom {
                    return;
                }
                if delta_y < 0.0 {
                    self.zoom_in(self.zoom_step());
                } else if delta_y > 0.0 {
                    self.zoom_out(self.zoom_step());
                }
            }
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Move toward the target; `factor` < 1 shrinks the distance.
    pub fn zoom_in(&mut self, factor: f32) {
        self.zoom_scale *= factor;
    }

    pub fn zoom_out(&mut self, factor: f32) {
        self.zoom_scale /= factor;
    }

    fn zoom_step(&self) -> f32 {
        0.95_f32.powf(self.config.zoom_speed)
    }

    fn auto_rotation_angle(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.config.auto_rotate_speed
    }

    /// Advance one tick: apply auto-rotation, the damped share of pending
    /// rotation, and pending zoom. Returns the new camera position.
    pub fn update(&mut self, position: Vec3) -> Vec3 {
        let mut spherical = Spherical::from_vec3(position - self.target);

        if self.config.auto_rotate && self.drag.is_none() {
            self.rotate_left(self.auto_rotation_angle());
        }

        let share = if self.config.enable_damping {
            self.config.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.delta_theta * share;
        spherical.phi += self.delta_phi * share;
        spherical.phi = spherical
            .phi
            .min(self.config.max_polar_angle)
            .max(self.config.min_polar_angle);
        spherical.make_safe();

        let scaled = spherical.radius * self.zoom_scale;
        spherical.radius = if scaled.is_nan() {
            spherical.radius
        } else {
            scaled
        }
        .min(self.config.max_distance)
        .max(self.config.min_distance);

        if self.config.enable_damping {
            self.delta_theta *= 1.0 - share;
            self.delta_phi *= 1.0 - share;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.zoom_scale = 1.0;
        self.spherical = spherical;

        tracing::trace!(
            theta = spherical.theta,
            phi = spherical.phi,
            radius = spherical.radius,
            "orbit update"
        );
        self.target + spherical.to_vec3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> OrbitConfig {
        OrbitConfig {
            auto_rotate: false,
            enable_damping: false,
            ..OrbitConfig::default()
        }
    }

    fn controls(config: OrbitConfig) -> OrbitControls {
        let mut c = OrbitControls::new(config);
        c.set_viewport(Viewport::new(800, 600));
        c
    }

    #[test]
    fn spherical_round_trip_preserves_offset() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let back = Spherical::from_vec3(v).to_vec3();
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn default_config_values() {
        let cfg = OrbitConfig::default();
        assert!(cfg.enable_damping);
        assert_eq!(cfg.damping_factor, 0.05);
        assert!(cfg.auto_rotate);
        assert_eq!(cfg.auto_rotate_speed, 2.0);
        assert!(cfg.enable_zoom);
        assert_eq!(cfg.min_distance, 2.0);
        assert_eq!(cfg.max_distance, 10.0);
    }

    #[test]
    fn first_update_clamps_out_of_range_distance() {
        let mut c = controls(still());
        let pos = c.update(Vec3::new(0.0, 0.0, 50.0));
        assert!((pos.length() - 10.0).abs() < 1e-4);

        let pos = c.update(Vec3::new(0.0, 0.0, 0.5));
        assert!((pos.length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_distance_stays_in_bounds_under_any_wheel_input() {
        let mut c = controls(OrbitConfig::default());
        let mut pos = c.update(Vec3::new(0.0, 0.0, 5.0));

        for _ in 0..500 {
            c.handle_input(PointerInput::Wheel { delta_y: -1.0e9 });
            pos = c.update(pos);
            assert!(pos.length() >= 2.0 - 1e-4 && pos.length() <= 10.0 + 1e-4);
        }
        assert!((pos.length() - 2.0).abs() < 1e-3);

        for _ in 0..2000 {
            c.handle_input(PointerInput::Wheel { delta_y: f32::MAX });
        }
        pos = c.update(pos);
        assert!((pos.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn wheel_in_moves_closer() {
        let mut c = controls(still());
        let pos = c.update(Vec3::new(0.0, 0.0, 5.0));
        c.handle_input(PointerInput::Wheel { delta_y: -120.0 });
        let closer = c.update(pos);
        assert!((closer.length() - 5.0 * 0.95).abs() < 1e-4);
    }

    #[test]
    fn zoom_disabled_ignores_wheel() {
        let mut c = controls(OrbitConfig {
            enable_zoom: false,
            ..still()
        });
        let pos = c.update(Vec3::new(0.0, 0.0, 5.0));
        c.handle_input(PointerInput::Wheel { delta_y: -120.0 });
        let after = c.update(pos);
        assert!((after.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn auto_rotation_changes_azimuth_when_idle() {
        let mut c = controls(OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        });
        let start = Vec3::new(0.0, 0.0, 5.0);
        let pos = c.update(start);
        let expected = -TAU / 3600.0 * 2.0;
        assert!((c.azimuthal_angle() - expected).abs() < 1e-6);
        assert!((pos.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn auto_rotation_pauses_while_dragging() {
        let mut c = controls(OrbitConfig {
            enable_damping: false,
            ..OrbitConfig::default()
        });
        let start = Vec3::new(0.0, 0.0, 5.0);
        c.handle_input(PointerInput::DragStart { x: 10.0, y: 10.0 });
        let pos = c.update(start);
        assert!((pos - start).length() < 1e-5);
        assert!(c.is_dragging());

        c.handle_input(PointerInput::DragEnd);
        let moved = c.update(pos);
        assert!((moved - pos).length() > 1e-5);
    }

    #[test]
    fn damping_spreads_drag_over_several_updates() {
        let mut c = controls(OrbitConfig {
            auto_rotate: false,
            ..OrbitConfig::default()
        });
        let start = c.update(Vec3::new(0.0, 0.0, 5.0));
        c.handle_input(PointerInput::DragStart { x: 0.0, y: 300.0 });
        c.handle_input(PointerInput::DragMove { x: 60.0, y: 300.0 });
        c.handle_input(PointerInput::DragEnd);

        let full = -TAU * 60.0 / 600.0;
        let first = c.update(start);
        assert!((c.azimuthal_angle() - full * 0.05).abs() < 1e-5);

        let second = c.update(first);
        assert!((second - first).length() > 0.0);
        assert!((c.azimuthal_angle() - full * (0.05 + 0.05 * 0.95)).abs() < 1e-5);
    }

    #[test]
    fn input_without_update_does_not_move_anything() {
        let mut c = controls(still());
        let pos = c.update(Vec3::new(0.0, 0.0, 5.0));
        let theta = c.azimuthal_angle();
        c.handle_input(PointerInput::DragStart { x: 0.0, y: 0.0 });
        c.handle_input(PointerInput::DragMove { x: 400.0, y: 0.0 });
        assert_eq!(c.azimuthal_angle(), theta);
        let after = c.update(pos);
        assert!((after - pos).length() > 1e-3);
    }

    #[test]
    fn drag_move_without_start_is_ignored() {
        let mut c = controls(still());
        let pos = c.update(Vec3::new(0.0, 0.0, 5.0));
        c.handle_input(PointerInput::DragMove { x: 400.0, y: 400.0 });
        let after = c.update(pos);
        assert!((after - pos).length() < 1e-5);
    }

    #[test]
    fn polar_angle_never_reaches_the_poles() {
        let mut c = controls(still());
        let mut pos = c.update(Vec3::new(0.0, 0.0, 5.0));
        c.handle_input(PointerInput::DragStart { x: 0.0, y: 0.0 });
        c.handle_input(PointerInput::DragMove { x: 0.0, y: 1.0e6 });
        pos = c.update(pos);
        assert!(c.polar_angle() > 0.0 && c.polar_angle() < PI);
        assert!(pos.is_finite());
    }

    #[test]
    fn inverted_distance_limits_do_not_panic() {
        let mut c = controls(OrbitConfig {
            min_distance: 8.0,
            max_distance: 4.0,
            ..still()
        });
        let pos = c.update(Vec3::new(0.0, 0.0, 5.0));
        assert!((pos.length() - 8.0).abs() < 1e-4);
    }
}
