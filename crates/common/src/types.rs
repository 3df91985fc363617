use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a top-level object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local-to-parent matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Axis-aligned bounding box.
///
/// An empty box has `min > max` on every axis and absorbs nothing in a union.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.expand_to_include(p);
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Center of the box. Empty boxes report the origin.
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Box enclosing all eight corners after applying `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let (lo, hi) = (self.min, self.max);
        Aabb::from_points(
            [
                Vec3::new(lo.x, lo.y, lo.z),
                Vec3::new(hi.x, lo.y, lo.z),
                Vec3::new(lo.x, hi.y, lo.z),
                Vec3::new(hi.x, hi.y, lo.z),
                Vec3::new(lo.x, lo.y, hi.z),
                Vec3::new(hi.x, lo.y, hi.z),
                Vec3::new(lo.x, hi.y, hi.z),
                Vec3::new(hi.x, hi.y, hi.z),
            ]
            .into_iter()
            .map(|corner| matrix.transform_point3(corner)),
        )
    }
}

/// RGB color with components in 0..=1, stored as authored (sRGB).
///
/// Serialized as a `0xRRGGBB` integer so config files read like CSS hex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Convert from sRGB transfer to linear light.
    pub fn to_linear(&self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self {
            r: decode(self.r),
            g: decode(self.g),
            b: decode(self.b),
        }
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Size of the drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. Zero dimensions are treated as one pixel.
    pub fn aspect(&self) -> f32 {
        let size = self.clamped();
        size.width as f32 / size.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Same size with both dimensions raised to at least one pixel.
    pub fn clamped(&self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_uniqueness() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn aabb_center_and_size() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));
        assert_eq!(b.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.size(), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn empty_aabb_is_neutral_in_union() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.union(&b), b);
        assert_eq!(b.union(&Aabb::EMPTY), b);
        assert_eq!(Aabb::EMPTY.center(), Vec3::ZERO);
    }

    #[test]
    fn aabb_transformed_by_scale_and_translation() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let m = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            scale: Vec3::splat(2.0),
            ..Transform::default()
        }
        .matrix();
        let t = b.transformed(&m);
        assert_eq!(t.min, Vec3::new(8.0, -2.0, -2.0));
        assert_eq!(t.max, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn color_hex_conversion() {
        let c = Color::from_hex(0x764ba2);
        assert!((c.r - 0x76 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x4b as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0xa2 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.to_hex(), 0x764ba2);
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
    }

    #[test]
    fn white_stays_white_in_linear() {
        let l = Color::WHITE.to_linear();
        assert!((l.r - 1.0).abs() < 1e-6);
        let dark = Color::from_hex(0x202020).to_linear();
        assert!(dark.r < 0x20 as f32 / 255.0);
    }

    #[test]
    fn viewport_aspect() {
        let v = Viewport::new(800, 600);
        assert!((v.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert!(!v.is_empty());
    }

    #[test]
    fn zero_height_viewport_does_not_divide_by_zero() {
        let v = Viewport::new(800, 0);
        assert!(v.is_empty());
        assert!(v.aspect().is_finite());
        assert_eq!(v.clamped().height, 1);
    }
}
