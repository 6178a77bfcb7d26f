//! Core types used throughout the extraction pipeline

use std::hash::{Hash, Hasher};

use bytemuck::{Pod, Zeroable};
use glam::{DMat4, Mat4};
use serde::{Deserialize, Serialize};

/// Number of bone influences packed into every vertex
pub const MAX_INFLUENCES: usize = 4;

/// Render-ready vertex: position, normal, UV and four bone influences.
///
/// Equality and hashing work on the raw bytes, so two vertices are equal only
/// when every field matches bit-for-bit. `0.0` and `-0.0` are distinct and a
/// NaN equals an identical NaN.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub bone_indices: [u8; MAX_INFLUENCES],
    pub bone_weights: [f32; MAX_INFLUENCES],
}

impl Vertex {
    /// Weights given to vertices of meshes without a skin
    pub const RIGID_WEIGHTS: [f32; MAX_INFLUENCES] = [1.0, 0.0, 0.0, 0.0];

    /// Create a new vertex
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
        bone_indices: [u8; MAX_INFLUENCES],
        bone_weights: [f32; MAX_INFLUENCES],
    ) -> Self {
        Self {
            position,
            normal,
            uv,
            bone_indices,
            bone_weights,
        }
    }

    /// Create a vertex bound entirely to bone 0
    pub fn rigid(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self::new(position, normal, uv, [0; MAX_INFLUENCES], Self::RIGID_WEIGHTS)
    }

    /// Raw bytes of this vertex, as uploaded to a vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.as_bytes());
    }
}

/// Convert a document matrix to render precision.
///
/// Each element is cast to `f32` in place; the layout is unchanged and no
/// renormalization happens.
pub fn to_render_matrix(matrix: &DMat4) -> Mat4 {
    matrix.as_mat4()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::collections::HashSet;

    #[test]
    fn test_vertex_has_no_padding() {
        assert_eq!(std::mem::size_of::<Vertex>(), 52);
    }

    #[test]
    fn test_vertex_equality_is_bitwise() {
        let a = Vertex::rigid([0.0, 1.0, 2.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        let b = Vertex::rigid([-0.0, 1.0, 2.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        assert_eq!(a, a);
        assert_ne!(a, b);

        let nan = Vertex::rigid([f32::NAN, 0.0, 0.0], [0.0; 3], [0.0; 2]);
        assert_eq!(nan, nan);
    }

    #[test]
    fn test_vertex_hash_matches_equality() {
        let a = Vertex::rigid([1.0, 2.0, 3.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
        let b = Vertex::new(
            [1.0, 2.0, 3.0],
            [0.0, 0.0, 1.0],
            [0.0, 1.0],
            [0, 0, 0, 0],
            [1.0, 0.0, 0.0, 0.0],
        );
        let set: HashSet<Vertex> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_render_matrix_casts_each_element() {
        let matrix = DMat4::from_translation(DVec3::new(1.5, -2.25, 1.0e-3));
        let converted = to_render_matrix(&matrix);
        let source = matrix.to_cols_array();
        for (value, expected) in converted.to_cols_array().iter().zip(source.iter()) {
            assert_eq!(*value, *expected as f32);
        }
    }
}
