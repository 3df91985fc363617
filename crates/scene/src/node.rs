use glam::{Mat4, Vec3};
use glbview_common::{Aabb, Transform};

/// Triangle geometry with a flat base color.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list. Empty means the positions are already a triangle list.
    pub indices: Vec<u32>,
    /// Linear RGBA base color factor.
    pub base_color: [f32; 4],
}

impl MeshData {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            normals: Vec::new(),
            indices: Vec::new(),
            base_color: [0.8, 0.8, 0.8, 1.0],
        }
    }

    /// Bounds in the mesh's own coordinate space.
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }
}

/// A node in a model sub-graph. Owns its meshes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<MeshData>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Bounding box of this node and all descendants, expressed in the
    /// coordinate space of the node's parent (the node's own transform applies).
    pub fn bounding_box(&self) -> Aabb {
        self.bounds_under(Mat4::IDENTITY)
    }

    fn bounds_under(&self, parent: Mat4) -> Aabb {
        let world = parent * self.transform.matrix();
        let own = self.meshes.iter().fold(Aabb::EMPTY, |acc, mesh| {
            acc.union(&mesh.local_bounds().transformed(&world))
        });
        self.children
            .iter()
            .fold(own, |acc, child| acc.union(&child.bounds_under(world)))
    }

    /// Visit every mesh with its accumulated matrix relative to `parent`.
    pub fn visit_meshes<'a>(&'a self, parent: Mat4, f: &mut impl FnMut(&'a MeshData, Mat4)) {
        let world = parent * self.transform.matrix();
        for mesh in &self.meshes {
            f(mesh, world);
        }
        for child in &self.children {
            child.visit_meshes(world, f);
        }
    }

    /// Number of nodes in this sub-graph, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len() + self.children.iter().map(SceneNode::mesh_count).sum::<usize>()
    }

    pub fn triangle_count(&self) -> usize {
        let mut total = 0;
        self.visit_meshes(Mat4::IDENTITY, &mut |mesh, _| total += mesh.triangle_count());
        total
    }
}

/// Axis-aligned box mesh spanning `min..max`, with per-face normals.
pub fn box_mesh(name: impl Into<String>, min: Vec3, max: Vec3) -> MeshData {
    let (lo, hi) = (min, max);
    #[rustfmt::skip]
    let faces: [([Vec3; 4], Vec3); 6] = [
        ([Vec3::new(lo.x, lo.y, hi.z), Vec3::new(hi.x, lo.y, hi.z), Vec3::new(hi.x, hi.y, hi.z), Vec3::new(lo.x, hi.y, hi.z)], Vec3::Z),
        ([Vec3::new(hi.x, lo.y, lo.z), Vec3::new(lo.x, lo.y, lo.z), Vec3::new(lo.x, hi.y, lo.z), Vec3::new(hi.x, hi.y, lo.z)], Vec3::NEG_Z),
        ([Vec3::new(hi.x, lo.y, hi.z), Vec3::new(hi.x, lo.y, lo.z), Vec3::new(hi.x, hi.y, lo.z), Vec3::new(hi.x, hi.y, hi.z)], Vec3::X),
        ([Vec3::new(lo.x, lo.y, lo.z), Vec3::new(lo.x, lo.y, hi.z), Vec3::new(lo.x, hi.y, hi.z), Vec3::new(lo.x, hi.y, lo.z)], Vec3::NEG_X),
        ([Vec3::new(lo.x, hi.y, hi.z), Vec3::new(hi.x, hi.y, hi.z), Vec3::new(hi.x, hi.y, lo.z), Vec3::new(lo.x, hi.y, lo.z)], Vec3::Y),
        ([Vec3::new(lo.x, lo.y, lo.z), Vec3::new(hi.x, lo.y, lo.z), Vec3::new(hi.x, lo.y, hi.z), Vec3::new(lo.x, lo.y, hi.z)], Vec3::NEG_Y),
    ];

    let mut mesh = MeshData::new(name, Vec::with_capacity(24));
    for (corners, normal) in faces {
        let base = mesh.positions.len() as u32;
        mesh.positions.extend(corners);
        mesh.normals.extend([normal; 4]);
        mesh.indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}
