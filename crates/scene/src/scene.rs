use std::collections::BTreeMap;

use glbview_common::NodeId;

use crate::light::Light;
use crate::node::SceneNode;

/// Root of the scene graph: lights plus loaded model sub-graphs.
///
/// Objects are only ever added. Uses BTreeMap for deterministic iteration,
/// so two renders of the same scene visit objects in the same order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    lights: BTreeMap<NodeId, Light>,
    models: BTreeMap<NodeId, SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) -> NodeId {
        let id = NodeId::new();
        self.lights.insert(id, light);
        id
    }

    /// Attach a model sub-graph to the root. Returns its id.
    pub fn add_model(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId::new();
        tracing::debug!(id = %id.short(), name = %node.name, "model attached");
        self.models.insert(id, node);
        id
    }

    pub fn lights(&self) -> impl Iterator<Item = (&NodeId, &Light)> {
        self.lights.iter()
    }

    pub fn models(&self) -> impl Iterator<Item = (&NodeId, &SceneNode)> {
        self.models.iter()
    }

    pub fn model(&self, id: NodeId) -> Option<&SceneNode> {
        self.models.get(&id)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}
