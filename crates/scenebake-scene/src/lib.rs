//! Scenebake Scene - The scene document surface consumed by the pipeline
//!
//! A scene document is a read-only node graph with meshes, skin deformers,
//! surface materials and animation stacks. The pipeline only talks to the
//! [`SceneDocument`] trait; [`MemoryScene`] is an in-memory implementation
//! that can be imported from a JSON description with [`JsonSceneImporter`].

mod document;
mod error;
mod geometry;
mod import;
mod material;
mod memory;

pub use document::{AnimStackInfo, MaterialId, NodeId, SceneDocument};
pub use error::ImportError;
pub use geometry::{Cluster, LayerElement, LinkMode, MappingMode, MeshData, ReferenceMode, Skin};
pub use import::{JsonSceneImporter, SceneImporter};
pub use material::{MaterialProperty, ShaderEntry, SurfaceMaterial, TextureSource};
pub use memory::{
    AnimStack, MemoryScene, NodeDescription, NodeTrack, NodeTransform, SceneDescription,
    TransformKey,
};
