use std::path::Path;

use glam::{Quat, Vec3};
use glbview_common::Transform;
use glbview_scene::{MeshData, SceneNode};
use gltf::Gltf;

use crate::AssetError;

/// Parse a `.glb` (or self-contained `.gltf`) byte buffer into a model sub-graph.
///
/// The returned root is named `name`, has an identity transform and one
/// child per root node of the default scene. External buffers are resolved
/// relative to `base_dir` when given.
pub fn parse_model(
    bytes: &[u8],
    base_dir: Option<&Path>,
    name: &str,
) -> Result<SceneNode, AssetError> {
    let _span = tracing::debug_span!("parse_model", name, bytes = bytes.len()).entered();

    let gltf = Gltf::from_slice(bytes)?;
    let buffers = load_buffers(&gltf, base_dir)?;

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(AssetError::NoScene)?;

    let mut root = SceneNode::new(name);
    for node in scene.nodes() {
        root.children.push(convert_node(&node, &buffers)?);
    }

    tracing::debug!(
        nodes = root.node_count(),
        meshes = root.mesh_count(),
        triangles = root.triangle_count(),
        "model parsed"
    );
    Ok(root)
}

fn load_buffers(gltf: &Gltf, base_dir: Option<&Path>) -> Result<Vec<Vec<u8>>, AssetError> {
    let mut buffers = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| AssetError::MissingBuffer("GLB binary chunk".into()))?,
            gltf::buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    return Err(AssetError::MissingBuffer(format!(
                        "embedded data URI in buffer {}",
                        buffer.index()
                    )));
                }
                let path = base_dir.unwrap_or(Path::new(".")).join(uri);
                std::fs::read(&path)?
            }
        };
        if data.len() < buffer.length() {
            return Err(AssetError::MissingBuffer(format!(
                "buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffers.push(data);
    }
    Ok(buffers)
}

fn convert_node(node: &gltf::Node, buffers: &[Vec<u8>]) -> Result<SceneNode, AssetError> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut out = SceneNode::new(node.name().unwrap_or("node")).with_transform(Transform {
        position: Vec3::from(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from(scale),
    });

    if let Some(mesh) = node.mesh() {
        for (i, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::debug!(mode = ?primitive.mode(), "skipping non-triangle primitive");
                continue;
            }
            let name = format!("{}_{i}", mesh.name().unwrap_or("mesh"));
            out.meshes.push(convert_primitive(&primitive, buffers, name)?);
        }
    }

    for child in node.children() {
        out.children.push(convert_node(&child, buffers)?);
    }
    Ok(out)
}

fn convert_primitive(
    primitive: &gltf::Primitive,
    buffers: &[Vec<u8>],
    name: String,
) -> Result<MeshData, AssetError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingAttribute(format!("{name}: POSITION")))?
        .map(Vec3::from)
        .collect();

    let mut mesh = MeshData::new(name, positions);
    mesh.indices = reader
        .read_indices()
        .map(|indices| indices.into_u32().collect())
        .unwrap_or_default();
    mesh.normals = match reader.read_normals() {
        Some(normals) => normals.map(Vec3::from).collect(),
        None => vertex_normals(&mesh),
    };
    mesh.base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    if mesh.indices.iter().any(|&i| i as usize >= mesh.positions.len()) {
        return Err(AssetError::MissingAttribute(format!(
            "{}: index out of range",
            mesh.name
        )));
    }
    Ok(mesh)
}

/// Smooth normals from area-weighted face normals, for meshes that ship without them.
fn vertex_normals(mesh: &MeshData) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; mesh.positions.len()];
    let triangles: Vec<[usize; 3]> = if mesh.indices.is_empty() {
        (0..mesh.positions.len() / 3)
            .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
            .collect()
    } else {
        mesh.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect()
    };
    for [a, b, c] in triangles {
        let (Some(pa), Some(pb), Some(pc)) = (
            mesh.positions.get(a),
            mesh.positions.get(b),
            mesh.positions.get(c),
        ) else {
            continue;
        };
        let face = (*pb - *pa).cross(*pc - *pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
