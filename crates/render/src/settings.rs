use glam::{Mat3, Vec3};
use glbview_common::Color;
use serde::{Deserialize, Serialize};

/// Curve that maps HDR scene color into displayable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    None,
    Linear,
    Reinhard,
    AcesFilmic,
}

impl ToneMapping {
    /// Index understood by the WGSL `tone_map` function.
    pub fn shader_index(self) -> u32 {
        match self {
            ToneMapping::None => 0,
            ToneMapping::Linear => 1,
            ToneMapping::Reinhard => 2,
            ToneMapping::AcesFilmic => 3,
        }
    }

    /// CPU reference of the shader curve.
    pub fn apply(self, color: Vec3, exposure: f32) -> Vec3 {
        match self {
            ToneMapping::None => color,
            ToneMapping::Linear => (color * exposure).clamp(Vec3::ZERO, Vec3::ONE),
            ToneMapping::Reinhard => {
                let c = color * exposure;
                (c / (Vec3::ONE + c)).clamp(Vec3::ZERO, Vec3::ONE)
            }
            ToneMapping::AcesFilmic => aces_filmic(color, exposure),
        }
    }
}

/// ACES fit by Stephen Hill, with the 1/0.6 exposure bias.
fn aces_filmic(color: Vec3, exposure: f32) -> Vec3 {
    let input = Mat3::from_cols(
        Vec3::new(0.59719, 0.07600, 0.02840),
        Vec3::new(0.35458, 0.90834, 0.13383),
        Vec3::new(0.04823, 0.01566, 0.83777),
    );
    let output = Mat3::from_cols(
        Vec3::new(1.60475, -0.10208, -0.00327),
        Vec3::new(-0.53108, 1.10813, -0.07276),
        Vec3::new(-0.07367, -0.00605, 1.07602),
    );
    let v = input * (color * (exposure / 0.6));
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    (output * (a / b)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Transfer function applied to the final color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    Srgb,
    Linear,
}

impl ColorSpace {
    pub fn encode(self, linear: Vec3) -> Vec3 {
        match self {
            ColorSpace::Linear => linear,
            ColorSpace::Srgb => {
                let f = |c: f32| {
                    if c <= 0.0031308 {
                        c * 12.92
                    } else {
                        1.055 * c.powf(1.0 / 2.4) - 0.055
                    }
                };
                Vec3::new(f(linear.x), f(linear.y), f(linear.z))
            }
        }
    }
}

/// How the renderer draws into its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Transparent background; the window shows through where nothing is drawn.
    pub alpha: bool,
    pub antialias: bool,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub output_color_space: ColorSpace,
    /// Used when `alpha` is off.
    pub clear_color: Color,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.0,
            output_color_space: ColorSpace::Srgb,
            clear_color: Color::from_hex(0x000000),
        }
    }
}

impl RendererSettings {
    pub fn msaa_samples(&self) -> u32 {
        if self.antialias { 4 } else { 1 }
    }

    /// Clear color as straight RGBA; alpha is zero when transparency is on.
    pub fn clear_rgba(&self) -> [f64; 4] {
        if self.alpha {
            [0.0, 0.0, 0.0, 0.0]
        } else {
            let c = self.clear_color.to_linear();
            [c.r as f64, c.g as f64, c.b as f64, 1.0]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_setup() {
        let s = RendererSettings::default();
        assert!(s.alpha);
        assert!(s.antialias);
        assert_eq!(s.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(s.exposure, 1.0);
        assert_eq!(s.output_color_space, ColorSpace::Srgb);
        assert_eq!(s.msaa_samples(), 4);
        assert_eq!(s.clear_rgba()[3], 0.0);
    }

    #[test]
    fn aces_maps_black_to_black() {
        let out = ToneMapping::AcesFilmic.apply(Vec3::ZERO, 1.0);
        assert_eq!(out, Vec3::ZERO);
    }

    #[test]
    fn aces_is_monotonic_and_bounded_on_grey_ramp() {
        let mut last = -1.0;
        for i in 0..=200 {
            let v = i as f32 * 0.1;
            let out = ToneMapping::AcesFilmic.apply(Vec3::splat(v), 1.0);
            assert!(out.x >= 0.0 && out.x <= 1.0);
            assert!(out.x >= last, "not monotonic at {v}");
            last = out.x;
        }
        assert!(last > 0.95);
    }

    #[test]
    fn exposure_brightens() {
        let c = Vec3::splat(0.2);
        let dim = ToneMapping::AcesFilmic.apply(c, 1.0);
        let bright = ToneMapping::AcesFilmic.apply(c, 2.0);
        assert!(bright.x > dim.x);
    }

    #[test]
    fn reinhard_and_linear_curves() {
        assert_eq!(ToneMapping::Reinhard.apply(Vec3::ONE, 1.0), Vec3::splat(0.5));
        assert_eq!(ToneMapping::Linear.apply(Vec3::splat(3.0), 1.0), Vec3::ONE);
        assert_eq!(ToneMapping::None.apply(Vec3::splat(3.0), 1.0), Vec3::splat(3.0));
    }

    #[test]
    fn srgb_encoding_endpoints() {
        let enc = ColorSpace::Srgb.encode(Vec3::new(0.0, 1.0, 0.5));
        assert_eq!(enc.x, 0.0);
        assert!((enc.y - 1.0).abs() < 1e-5);
        assert!(enc.z > 0.5);
        assert_eq!(ColorSpace::Linear.encode(Vec3::splat(0.5)), Vec3::splat(0.5));
    }

    #[test]
    fn opaque_clear_uses_configured_color() {
        let s = RendererSettings {
            alpha: false,
            clear_color: Color::WHITE,
            ..RendererSettings::default()
        };
        assert_eq!(s.clear_rgba(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(RendererSettings { antialias: false, ..s }.msaa_samples(), 1);
    }
}
