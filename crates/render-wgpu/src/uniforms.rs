use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use glbview_render::{ColorSpace, PerspectiveCamera, RendererSettings};
use glbview_scene::{Light, MeshData, Scene};

/// Must match `MAX_DIRECTIONAL_LIGHTS` in the model shader.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub light_dir: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub light_color: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub params: [f32; 4],
    pub flags: [u32; 4],
}

impl Globals {
    /// Pack camera, lights and output settings for one frame.
    ///
    /// Light colors are authored in sRGB and converted to linear here.
    /// `encode_srgb` is set when the surface format does not encode on write.
    pub fn new(
        scene: &Scene,
        camera: &PerspectiveCamera,
        settings: &RendererSettings,
        encode_srgb: bool,
    ) -> Self {
        let mut globals = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            ambient: [0.0; 4],
            light_dir: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            light_color: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            params: [settings.exposure, 0.0, 0.0, 0.0],
            flags: [settings.tone_mapping.shader_index(), encode_srgb as u32, 0, 0],
        };

        let mut ambient = Vec3::ZERO;
        let mut count = 0;
        for (_, light) in scene.lights() {
            let radiance = light.color().to_linear().to_vec3() * light.intensity();
            match light {
                Light::Ambient { .. } => ambient += radiance,
                Light::Directional { .. } => {
                    let Some(dir) = light.direction() else {
                        continue;
                    };
                    if count == MAX_DIRECTIONAL_LIGHTS {
                        tracing::debug!("directional light limit reached; extra lights ignored");
                        break;
                    }
                    globals.light_dir[count] = dir.extend(0.0).to_array();
                    globals.light_color[count] = radiance.extend(1.0).to_array();
                    count += 1;
                }
            }
        }
        globals.ambient = ambient.extend(1.0).to_array();
        globals.flags[2] = count as u32;
        globals
    }
}

/// Whether the shader must apply the sRGB transfer itself.
pub(crate) fn shader_encodes_srgb(
    settings: &RendererSettings,
    format: wgpu::TextureFormat,
) -> bool {
    settings.output_color_space == ColorSpace::Srgb && !format.is_srgb()
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Interleave positions with normals. Missing normals fall back to +Y.
pub(crate) fn mesh_vertices(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
        })
        .collect()
}

/// Index list for drawing, generating a sequential one for unindexed meshes.
pub(crate) fn mesh_indices(mesh: &MeshData) -> Vec<u32> {
    if mesh.indices.is_empty() {
        (0..mesh.positions.len() as u32).collect()
    } else {
        mesh.indices.clone()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub normal_0: [f32; 4],
    pub normal_1: [f32; 4],
    pub normal_2: [f32; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(world: Mat4, color: [f32; 4]) -> Self {
        let cols = world.to_cols_array_2d();
        let normal = normal_matrix(world);
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            normal_0: normal.x_axis.extend(0.0).to_array(),
            normal_1: normal.y_axis.extend(0.0).to_array(),
            normal_2: normal.z_axis.extend(0.0).to_array(),
            color,
        }
    }
}

/// Inverse transpose of the upper 3x3, or the plain 3x3 when singular.
fn normal_matrix(world: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(world);
    if m.determinant().abs() <= f32::EPSILON {
        m
    } else {
        m.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbview_common::Color;
    use glbview_render::{CameraConfig, ToneMapping};
    use glbview_scene::{LightingConfig, add_lighting, box_mesh};

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), 1.0)
    }

    #[test]
    fn globals_layout_is_uniform_aligned() {
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
        assert_eq!(std::mem::size_of::<InstanceData>(), 8 * 16);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn default_lighting_packs_ambient_and_two_directionals() {
        let mut scene = Scene::new();
        add_lighting(&mut scene, &LightingConfig::default());
        let g = Globals::new(&scene, &camera(), &RendererSettings::default(), false);

        assert_eq!(g.flags, [ToneMapping::AcesFilmic.shader_index(), 0, 2, 0]);
        assert!((g.ambient[0] - 0.5).abs() < 1e-6);
        assert_eq!(g.params[0], 1.0);

        let key_dir = Vec3::new(5.0, 5.0, 5.0).normalize();
        let found_key = g
            .light_dir
            .iter()
            .take(2)
            .any(|d| (Vec3::from_slice(&d[..3]) - key_dir).length() < 1e-5);
        assert!(found_key);
    }

    #[test]
    fn rim_color_is_linearized() {
        let mut scene = Scene::new();
        scene.add_light(Light::Directional {
            color: Color::from_hex(0x764ba2),
            intensity: 0.5,
            position: Vec3::new(-5.0, 0.0, -5.0),
        });
        let g = Globals::new(&scene, &camera(), &RendererSettings::default(), true);
        let expected = Color::from_hex(0x764ba2).to_linear().to_vec3() * 0.5;
        assert!((Vec3::from_slice(&g.light_color[0][..3]) - expected).length() < 1e-6);
        assert_eq!(g.flags[1], 1);
    }

    #[test]
    fn directional_lights_beyond_limit_are_dropped() {
        let mut scene = Scene::new();
        for i in 0..6 {
            scene.add_light(Light::Directional {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::new(i as f32 + 1.0, 1.0, 0.0),
            });
        }
        let g = Globals::new(&scene, &camera(), &RendererSettings::default(), false);
        assert_eq!(g.flags[2] as usize, MAX_DIRECTIONAL_LIGHTS);
    }

    #[test]
    fn light_at_origin_shines_from_above() {
        let mut scene = Scene::new();
        scene.add_light(Light::Directional {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::ZERO,
        });
        let g = Globals::new(&scene, &camera(), &RendererSettings::default(), false);
        assert_eq!(g.flags[2], 1);
        assert_eq!(g.light_dir[0], [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn srgb_encoding_only_without_srgb_surface() {
        let s = RendererSettings::default();
        assert!(!shader_encodes_srgb(&s, wgpu::TextureFormat::Bgra8UnormSrgb));
        assert!(shader_encodes_srgb(&s, wgpu::TextureFormat::Bgra8Unorm));
        let linear = RendererSettings {
            output_color_space: ColorSpace::Linear,
            ..s
        };
        assert!(!shader_encodes_srgb(&linear, wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn mesh_vertices_and_indices() {
        let mesh = box_mesh("b", Vec3::splat(-1.0), Vec3::splat(1.0));
        let verts = mesh_vertices(&mesh);
        assert_eq!(verts.len(), mesh.positions.len());
        assert_eq!(mesh_indices(&mesh).len(), 36);

        let bare = MeshData::new("tri", vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(mesh_indices(&bare), vec![0, 1, 2]);
        assert_eq!(mesh_vertices(&bare)[0].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let inst = InstanceData::new(world, [1.0; 4]);
        assert!((inst.normal_0[0] - 0.5).abs() < 1e-6);
        assert_eq!(inst.model_0[0], 2.0);

        let flat = InstanceData::new(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)), [1.0; 4]);
        assert_eq!(flat.normal_1, [0.0; 4]);
    }
}
