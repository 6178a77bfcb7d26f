use glam::DMat4;
use serde::{Deserialize, Serialize};

use crate::geometry::MeshData;
use crate::material::SurfaceMaterial;

/// Index of a node inside one scene document.
///
/// Ids are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index into a document's material list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub usize);

/// Timing metadata of one animation stack.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimStackInfo {
    pub name: String,
    /// Offset applied to the local span on import, in seconds
    pub import_offset: f64,
    /// Local span start, in seconds
    pub start: f64,
    /// Local span stop, in seconds
    pub stop: f64,
}

/// Read-only view of an imported scene.
///
/// Node ids run from `0` to `node_count() - 1`. Methods taking a [`NodeId`]
/// may panic when given an id from another document.
pub trait SceneDocument: Send + Sync {
    /// The root node of the hierarchy
    fn root(&self) -> NodeId;

    fn node_count(&self) -> usize;

    fn node_name(&self, node: NodeId) -> &str;

    fn children(&self, node: NodeId) -> &[NodeId];

    /// Mesh attached to the node, if any
    fn mesh(&self, node: NodeId) -> Option<&MeshData>;

    /// Materials attached to the node, in slot order
    fn node_materials(&self, node: NodeId) -> &[MaterialId];

    /// Every material in the document
    fn materials(&self) -> &[SurfaceMaterial];

    /// Global transform in the bind pose
    fn global_transform(&self, node: NodeId) -> DMat4;

    /// Global transform at `time` seconds, evaluated with animation stack `stack`
    fn global_transform_at(&self, node: NodeId, stack: usize, time: f64) -> DMat4;

    fn anim_stacks(&self) -> Vec<AnimStackInfo>;

    /// Inverse of the bind pose global transform
    fn inverse_global_transform(&self, node: NodeId) -> DMat4 {
        self.global_transform(node).inverse()
    }

    fn material(&self, id: MaterialId) -> Option<&SurfaceMaterial> {
        self.materials().get(id.0)
    }
}
