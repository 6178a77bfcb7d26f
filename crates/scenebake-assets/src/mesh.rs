use glam::Mat4;
use scenebake_core::{to_render_matrix, Vertex};
use scenebake_scene::{MeshData, NodeId, SceneDocument};
use tracing::debug;

use crate::error::AssetError;
use crate::geometry::{corner_indices, resolve_normals, resolve_positions, resolve_uvs};
use crate::options::LoaderOptions;
use crate::skin::{pack_skin, BoneWeights};
use crate::weld::weld;

/// A render-ready mesh extracted from one scene node.
///
/// Holds only owned copies of names and matrices, never references into the
/// scene document it came from.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Name of the node carrying the mesh
    pub node_name: String,
    /// Name of the node's first material, empty if it has none
    pub material_name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    /// Inverse of the node's bind pose global transform
    pub inverse_bind_matrix: Mat4,
    /// Bones referenced by the vertices' bone indices
    pub bone_names: Vec<String>,
    /// Inverse bind pose of each bone, parallel to `bone_names`
    pub bone_inverse_bind_matrices: Vec<Mat4>,
}

impl Mesh {
    pub fn is_skinned(&self) -> bool {
        !self.bone_names.is_empty()
    }

    pub fn bone_count(&self) -> usize {
        self.bone_names.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Extract the mesh carried by `node`.
pub fn extract_mesh(
    doc: &dyn SceneDocument,
    node: NodeId,
    mesh: &MeshData,
    options: &LoaderOptions,
) -> Result<Mesh, AssetError> {
    let node_name = doc.node_name(node).to_owned();
    build_mesh(doc, node, mesh, options).map_err(|source| AssetError::Mesh {
        mesh: node_name,
        source: Box::new(source),
    })
}

fn build_mesh(
    doc: &dyn SceneDocument,
    node: NodeId,
    mesh: &MeshData,
    options: &LoaderOptions,
) -> Result<Mesh, AssetError> {
    let node_name = doc.node_name(node).to_owned();
    let material_name = doc
        .node_materials(node)
        .first()
        .and_then(|&id| doc.material(id))
        .map(|m| m.name.clone())
        .unwrap_or_default();
    let inverse_bind_matrix = to_render_matrix(&doc.inverse_global_transform(node));

    let corners = corner_indices(mesh)?;
    let positions = resolve_positions(mesh, &corners)?;
    let normals = resolve_normals(mesh, &corners)?;
    let uvs = resolve_uvs(mesh, &corners, options.uv_set)?;

    let skin = pack_skin(doc, mesh)?;
    let weights = if skin.is_empty() {
        vec![BoneWeights::RIGID; corners.len()]
    } else {
        skin.per_corner(&corners)?
    };

    let corner_vertices: Vec<Vertex> = (0..corners.len())
        .map(|i| {
            Vertex::new(
                positions[i],
                normals[i],
                uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                weights[i].indices,
                weights[i].weights,
            )
        })
        .collect();

    let welded = weld::<u16>(&corner_vertices)?;
    debug!(
        "Mesh '{}': {} triangles, {} corners -> {} vertices, {} bones, material '{}'",
        node_name,
        mesh.polygon_count(),
        corner_vertices.len(),
        welded.vertices.len(),
        skin.bone_names.len(),
        material_name
    );

    Ok(Mesh {
        node_name,
        material_name,
        vertices: welded.vertices,
        indices: welded.indices,
        inverse_bind_matrix,
        bone_names: skin.bone_names,
        bone_inverse_bind_matrices: skin.inverse_bind_matrices,
    })
}
