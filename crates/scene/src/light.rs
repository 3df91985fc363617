use glam::Vec3;
use glbview_common::Color;
use serde::{Deserialize, Serialize};

use crate::scene::Scene;

/// A light source attached to the scene root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Parallel light shining from `position` toward the origin.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient { .. })
    }

    pub fn is_directional(&self) -> bool {
        matches!(self, Light::Directional { .. })
    }

    /// Unit vector pointing from the lit surface toward the light.
    /// Ambient lights have no direction.
    pub fn direction(&self) -> Option<Vec3> {
        match self {
            Light::Ambient { .. } => None,
            Light::Directional { position, .. } => {
                Some(position.try_normalize().unwrap_or(Vec3::Y))
            }
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Ambient { color, .. } | Light::Directional { color, .. } => *color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. } | Light::Directional { intensity, .. } => *intensity,
        }
    }
}

/// A directional light entry in [`LightingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLightConfig {
    fn to_light(self) -> Light {
        Light::Directional {
            color: self.color,
            intensity: self.intensity,
            position: self.position,
        }
    }
}

/// Fixed three-light rig: ambient fill, white key light, purple rim light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub key: DirectionalLightConfig,
    pub rim: DirectionalLightConfig,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color::from_hex(0xffffff),
            ambient_intensity: 0.5,
            key: DirectionalLightConfig {
                color: Color::from_hex(0xffffff),
                intensity: 1.0,
                position: Vec3::new(5.0, 5.0, 5.0),
            },
            rim: DirectionalLightConfig {
                color: Color::from_hex(0x764ba2),
                intensity: 0.5,
                position: Vec3::new(-5.0, 0.0, -5.0),
            },
        }
    }
}

/// Add the ambient, key and rim lights described by `config` to the scene.
pub fn add_lighting(scene: &mut Scene, config: &LightingConfig) {
    scene.add_light(Light::Ambient {
        color: config.ambient_color,
        intensity: config.ambient_intensity,
    });
    scene.add_light(config.key.to_light());
    scene.add_light(config.rim.to_light());
    tracing::debug!(lights = scene.light_count(), "lighting rig added");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rig_has_one_ambient_and_two_directional() {
        let mut scene = Scene::new();
        add_lighting(&mut scene, &LightingConfig::default());

        let lights: Vec<Light> = scene.lights().map(|(_, l)| *l).collect();
        assert_eq!(lights.len(), 3);
        assert_eq!(lights.iter().filter(|l| l.is_ambient()).count(), 1);
        assert_eq!(lights.iter().filter(|l| l.is_directional()).count(), 2);
        assert_eq!(scene.model_count(), 0);
    }

    #[test]
    fn default_rig_constants() {
        let cfg = LightingConfig::default();
        assert_eq!(cfg.ambient_intensity, 0.5);
        assert_eq!(cfg.key.intensity, 1.0);
        assert_eq!(cfg.key.position, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(cfg.rim.intensity, 0.5);
        assert_eq!(cfg.rim.color.to_hex(), 0x764ba2);
        assert_eq!(cfg.rim.position, Vec3::new(-5.0, 0.0, -5.0));
    }

    #[test]
    fn key_and_rim_come_from_opposite_sides() {
        let cfg = LightingConfig::default();
        let key = cfg.key.to_light().direction().unwrap();
        let rim = cfg.rim.to_light().direction().unwrap();
        assert!(key.dot(rim) < 0.0);
        assert!((key.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ambient_light_has_no_direction() {
        let light = Light::Ambient {
            color: Color::WHITE,
            intensity: 0.5,
        };
        assert!(light.direction().is_none());
        assert_eq!(light.intensity(), 0.5);
    }
}
