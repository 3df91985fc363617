use std::path::{Path, PathBuf};

use glbview_input::OrbitConfig;
use glbview_render::{CameraConfig, RendererSettings};
use glbview_scene::{FitConfig, LightingConfig};
use serde::{Deserialize, Serialize};

/// Errors from reading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Initial window title and size in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glbview".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Everything the viewer needs at startup. Every section is optional in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_path: PathBuf,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub renderer: RendererSettings,
    pub lighting: LightingConfig,
    pub controls: OrbitConfig,
    pub fit: FitConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/thixotropic-gel.glb"),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            renderer: RendererSettings::default(),
            lighting: LightingConfig::default(),
            controls: OrbitConfig::default(),
            fit: FitConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&data)?;
        tracing::debug!(path = %path.as_ref().display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbview_render::ToneMapping;

    #[test]
    fn defaults_round_trip_through_yaml() {
        let config = ViewerConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("aces_filmic"));
        assert_eq!(ViewerConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = ViewerConfig::from_yaml(
            "model_path: assets/duck.glb\nfit:\n  scale: 3.5\ncontrols:\n  auto_rotate: false\n",
        )
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("assets/duck.glb"));
        assert_eq!(config.fit.scale, 3.5);
        assert!(config.fit.recenter_after_scale);
        assert!(!config.controls.auto_rotate);
        assert_eq!(config.controls.min_distance, 2.0);
        assert_eq!(config.renderer.tone_mapping, ToneMapping::AcesFilmic);
    }

    #[test]
    fn colors_parse_from_hex() {
        let config = ViewerConfig::from_yaml(
            "lighting:\n  rim:\n    color: 0xff0000\n    intensity: 0.25\n    position: [1.0, 2.0, 3.0]\n",
        )
        .unwrap();
        assert_eq!(config.lighting.rim.color.to_hex(), 0xff0000);
        assert_eq!(config.lighting.rim.intensity, 0.25);
        assert_eq!(config.lighting.ambient_intensity, 0.5);
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "window:\n  title: gel\n  width: 800\n  height: 600\n").unwrap();
        let config = ViewerConfig::load(tmp.path()).unwrap();
        assert_eq!(config.window.title, "gel");
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = ViewerConfig::from_yaml("fit: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ViewerConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
