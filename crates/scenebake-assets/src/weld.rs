//! Vertex welding
//!
//! Collapses bit-identical corner vertices into one shared vertex and emits an
//! index buffer. Unique vertices keep the order of their first occurrence.

use std::collections::HashMap;

use scenebake_core::Vertex;

use crate::error::AssetError;

/// Deduplicated vertices and the index stream drawing them
#[derive(Debug, Clone, PartialEq)]
pub struct Welded<I> {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<I>,
}

/// Weld a corner stream into unique vertices and indices of type `I`.
///
/// Fails with [`AssetError::IndexOverflow`] when the unique vertex count does
/// not fit the index type.
pub fn weld<I>(corners: &[Vertex]) -> Result<Welded<I>, AssetError>
where
    I: TryFrom<usize> + Copy,
{
    let mut lookup: HashMap<Vertex, I> = HashMap::with_capacity(corners.len());
    let mut vertices = Vec::with_capacity(corners.len());
    let mut indices = Vec::with_capacity(corners.len());

    for vertex in corners {
        let index = match lookup.get(vertex) {
            Some(&index) => index,
            None => {
                let position = vertices.len();
                let index = I::try_from(position).map_err(|_| AssetError::IndexOverflow {
                    unique: position + 1,
                    max: position,
                })?;
                lookup.insert(*vertex, index);
                vertices.push(*vertex);
                index
            }
        };
        indices.push(index);
    }

    Ok(Welded { vertices, indices })
}
