//! Scenebake Assets - Render-ready extraction from scene documents
//!
//! Turns an imported scene document into flat asset data: welded vertex and
//! index buffers with packed four-bone skin weights, per-mesh bind pose
//! inverses, materials with their texture file names, and animation clips that
//! can be sampled for mesh and bone transforms at any frame.

mod animation;
mod error;
mod geometry;
mod handle;
mod loader;
mod material;
mod mesh;
mod names;
mod options;
mod skin;
mod weld;

#[cfg(test)]
mod test_scenes;

pub use animation::{
    clips_from_document, sample_bone_transforms, sample_mesh_transform, write_bone_transforms,
    AnimationClip,
};
pub use error::AssetError;
pub use geometry::{
    corner_indices, resolve_attribute, resolve_normals, resolve_positions, resolve_uvs, Channel,
};
pub use handle::{AssetHandle, DocumentId};
pub use loader::AssetLoader;
pub use material::{resolve_material, texture_file_name, Material, TextureSlot};
pub use mesh::{extract_mesh, Mesh};
pub use names::NameDictionary;
pub use options::LoaderOptions;
pub use skin::{pack_influences, pack_skin, BoneWeights, SkinBinding};
pub use weld::{weld, Welded};
