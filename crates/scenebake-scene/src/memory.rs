//! In-memory scene document
//!
//! [`SceneDescription`] is the plain, serializable form of a scene. Converting
//! it into a [`MemoryScene`] validates the node graph and precomputes the bind
//! pose, after which the scene is immutable.

use std::collections::VecDeque;

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::document::{AnimStackInfo, MaterialId, NodeId, SceneDocument};
use crate::error::ImportError;
use crate::geometry::MeshData;
use crate::material::SurfaceMaterial;

/// Local transform of a node: translation, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeTransform {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl NodeTransform {
    /// Create a transform with only a translation
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a transform with only a rotation
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Compute the local matrix for this transform
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Interpolate between two transforms
    pub fn lerp(a: &NodeTransform, b: &NodeTransform, t: f64) -> NodeTransform {
        NodeTransform {
            translation: a.translation.lerp(b.translation, t),
            rotation: a.rotation.slerp(b.rotation, t),
            scale: a.scale.lerp(b.scale, t),
        }
    }
}

/// A keyed local transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformKey {
    /// Key time in seconds
    pub time: f64,
    #[serde(flatten)]
    pub transform: NodeTransform,
}

/// Animated local transform of one node within a stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTrack {
    pub node: NodeId,
    pub keys: Vec<TransformKey>,
}

impl NodeTrack {
    /// Local transform at `time`, holding the first and last keys outside the keyed range.
    ///
    /// A NaN time yields the first key.
    pub fn sample(&self, time: f64) -> Option<NodeTransform> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if time.is_nan() || time <= first.time {
            return Some(first.transform);
        }
        if time >= last.time {
            return Some(last.transform);
        }

        let next = self.keys.partition_point(|k| k.time <= time);
        let (a, b) = (&self.keys[next - 1], &self.keys[next]);
        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
        Some(NodeTransform::lerp(&a.transform, &b.transform, t))
    }
}

/// An animation stack ("take") with its time span and node tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimStack {
    pub name: String,
    #[serde(default)]
    pub import_offset: f64,
    pub start: f64,
    pub stop: f64,
    #[serde(default)]
    pub tracks: Vec<NodeTrack>,
}

impl AnimStack {
    pub fn new(name: impl Into<String>, start: f64, stop: f64) -> Self {
        Self {
            name: name.into(),
            import_offset: 0.0,
            start,
            stop,
            tracks: Vec::new(),
        }
    }
}

/// Plain description of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub transform: NodeTransform,
    #[serde(default)]
    pub mesh: Option<MeshData>,
    #[serde(default)]
    pub materials: Vec<MaterialId>,
}

impl NodeDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            transform: NodeTransform::default(),
            mesh: None,
            materials: Vec::new(),
        }
    }
}

/// Serializable scene. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub materials: Vec<SurfaceMaterial>,
    #[serde(default)]
    pub anim_stacks: Vec<AnimStack>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneDescription {
    /// Name given to the root node of new descriptions
    pub const ROOT_NAME: &'static str = "RootNode";

    /// Create a description holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeDescription::new(Self::ROOT_NAME)],
            materials: Vec::new(),
            anim_stacks: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node under `parent` and return its id
    pub fn add_node(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeDescription::new(name));
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeDescription> {
        self.nodes.get_mut(id.0)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: NodeTransform) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.transform = transform;
        }
    }

    pub fn set_mesh(&mut self, id: NodeId, mesh: MeshData) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.mesh = Some(mesh);
        }
    }

    pub fn add_material(&mut self, material: SurfaceMaterial) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Attach a material to the next free slot of a node
    pub fn attach_material(&mut self, id: NodeId, material: MaterialId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.materials.push(material);
        }
    }

    pub fn add_anim_stack(&mut self, stack: AnimStack) -> usize {
        self.anim_stacks.push(stack);
        self.anim_stacks.len() - 1
    }
}

/// Validated, immutable in-memory scene document.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: Vec<NodeDescription>,
    parents: Vec<Option<NodeId>>,
    bind_globals: Vec<DMat4>,
    materials: Vec<SurfaceMaterial>,
    anim_stacks: Vec<AnimStack>,
}

fn invalid(message: String) -> ImportError {
    ImportError::InvalidDocument(message)
}

impl TryFrom<SceneDescription> for MemoryScene {
    type Error = ImportError;

    fn try_from(mut desc: SceneDescription) -> Result<Self, Self::Error> {
        let count = desc.nodes.len();
        if count == 0 {
            return Err(invalid("scene has no root node".into()));
        }

        // Breadth-first walk from the root: every node must be reached exactly once.
        let mut parents = vec![None; count];
        let mut visited = vec![false; count];
        let mut order = Vec::with_capacity(count);
        let mut queue = VecDeque::from([NodeId(0)]);
        visited[0] = true;
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &child in &desc.nodes[node.0].children {
                if child.0 >= count {
                    return Err(invalid(format!(
                        "node '{}' references missing child {}",
                        desc.nodes[node.0].name, child.0
                    )));
                }
                if visited[child.0] {
                    return Err(invalid(format!(
                        "node '{}' has more than one parent",
                        desc.nodes[child.0].name
                    )));
                }
                visited[child.0] = true;
                parents[child.0] = Some(node);
                queue.push_back(child);
            }
        }
        if let Some(orphan) = visited.iter().position(|v| !v) {
            return Err(invalid(format!(
                "node '{}' is not reachable from the root",
                desc.nodes[orphan].name
            )));
        }

        for node in &desc.nodes {
            if let Some(material) = node.materials.iter().find(|m| m.0 >= desc.materials.len()) {
                return Err(invalid(format!(
                    "node '{}' references missing material {}",
                    node.name, material.0
                )));
            }
            let Some(mesh) = &node.mesh else { continue };
            for cluster in mesh.skins.iter().flat_map(|s| &s.clusters) {
                if cluster.link.0 >= count {
                    return Err(invalid(format!(
                        "skin on '{}' links missing bone node {}",
                        node.name, cluster.link.0
                    )));
                }
                if cluster.indices.len() != cluster.weights.len() {
                    return Err(invalid(format!(
                        "cluster for bone '{}' has {} indices but {} weights",
                        desc.nodes[cluster.link.0].name,
                        cluster.indices.len(),
                        cluster.weights.len()
                    )));
                }
            }
        }

        for stack in &mut desc.anim_stacks {
            for track in &mut stack.tracks {
                if track.node.0 >= count {
                    return Err(invalid(format!(
                        "animation stack '{}' animates missing node {}",
                        stack.name, track.node.0
                    )));
                }
                track.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
            }
        }

        let mut bind_globals = vec![DMat4::IDENTITY; count];
        for node in order {
            let local = desc.nodes[node.0].transform.matrix();
            bind_globals[node.0] = match parents[node.0] {
                Some(parent) => bind_globals[parent.0] * local,
                None => local,
            };
        }

        Ok(Self {
            nodes: desc.nodes,
            parents,
            bind_globals,
            materials: desc.materials,
            anim_stacks: desc.anim_stacks,
        })
    }
}

impl MemoryScene {
    fn local_transform_at(&self, node: NodeId, stack: Option<&AnimStack>, time: f64) -> DMat4 {
        stack
            .and_then(|s| s.tracks.iter().find(|t| t.node == node))
            .and_then(|t| t.sample(time))
            .unwrap_or(self.nodes[node.0].transform)
            .matrix()
    }
}

impl SceneDocument for MemoryScene {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn mesh(&self, node: NodeId) -> Option<&MeshData> {
        self.nodes[node.0].mesh.as_ref()
    }

    fn node_materials(&self, node: NodeId) -> &[MaterialId] {
        &self.nodes[node.0].materials
    }

    fn materials(&self) -> &[SurfaceMaterial] {
        &self.materials
    }

    fn global_transform(&self, node: NodeId) -> DMat4 {
        self.bind_globals[node.0]
    }

    fn global_transform_at(&self, node: NodeId, stack: usize, time: f64) -> DMat4 {
        let stack = self.anim_stacks.get(stack);
        let mut matrix = DMat4::IDENTITY;
        let mut current = Some(node);
        while let Some(id) = current {
            matrix = self.local_transform_at(id, stack, time) * matrix;
            current = self.parents[id.0];
        }
        matrix
    }

    fn anim_stacks(&self) -> Vec<AnimStackInfo> {
        self.anim_stacks
            .iter()
            .map(|s| AnimStackInfo {
                name: s.name.clone(),
                import_offset: s.import_offset,
                start: s.start,
                stop: s.stop,
            })
            .collect()
    }
}
