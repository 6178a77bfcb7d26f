//! Per-corner attribute resolution
//!
//! Every attribute is expanded to one value per polygon corner, in corner
//! order: polygon 0 corners 0, 1, 2, then polygon 1, and so on. Channels may
//! store their values per control point or per corner, each either directly or
//! through an index array; the four combinations are dispatched through
//! [`SLOT_TABLE`].

use std::fmt;

use scenebake_scene::{LayerElement, MappingMode, MeshData, ReferenceMode};
use tracing::debug;

use crate::error::AssetError;

/// Attribute channel being resolved, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Normal,
    Uv,
    SkinWeight,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Position => "position",
            Channel::Normal => "normal",
            Channel::Uv => "uv",
            Channel::SkinWeight => "skin weight",
        };
        f.write_str(name)
    }
}

/// One polygon corner: the control point it references and its running position
#[derive(Debug, Clone, Copy)]
struct Corner {
    control_point: usize,
    position: usize,
}

/// Maps a corner to a slot of the channel's direct array.
///
/// `Err(key)` means the channel's index array has no entry for `key`.
type SlotFn = fn(Corner, &[usize]) -> Result<usize, usize>;

const SLOT_TABLE: [(MappingMode, ReferenceMode, SlotFn); 4] = [
    (MappingMode::ByControlPoint, ReferenceMode::Direct, |corner, _| {
        Ok(corner.control_point)
    }),
    (MappingMode::ByControlPoint, ReferenceMode::IndexToDirect, |corner, index| {
        index
            .get(corner.control_point)
            .copied()
            .ok_or(corner.control_point)
    }),
    (MappingMode::ByPolygonVertex, ReferenceMode::Direct, |corner, _| {
        Ok(corner.position)
    }),
    (MappingMode::ByPolygonVertex, ReferenceMode::IndexToDirect, |corner, index| {
        index.get(corner.position).copied().ok_or(corner.position)
    }),
];

fn slot_fn<T>(channel: Channel, element: &LayerElement<T>) -> Result<SlotFn, AssetError> {
    SLOT_TABLE
        .iter()
        .find(|(mapping, reference, _)| {
            *mapping == element.mapping && *reference == element.reference
        })
        .map(|&(_, _, slot)| slot)
        .ok_or(AssetError::UnsupportedMapping {
            channel,
            mapping: element.mapping,
        })
}

/// Control point index of every corner, walking each triangle's three corners.
pub fn corner_indices(mesh: &MeshData) -> Result<Vec<usize>, AssetError> {
    let mut indices = Vec::with_capacity(mesh.polygon_count() * 3);
    for (polygon, corners) in mesh.polygons.iter().enumerate() {
        if corners.len() != 3 {
            return Err(AssetError::NonTriangularPolygon {
                polygon,
                size: corners.len(),
            });
        }
        indices.extend_from_slice(corners);
    }
    Ok(indices)
}

/// Expand one attribute channel to a value per corner.
pub fn resolve_attribute<T: Copy>(
    channel: Channel,
    element: &LayerElement<T>,
    corners: &[usize],
) -> Result<Vec<T>, AssetError> {
    let slot = slot_fn(channel, element)?;
    corners
        .iter()
        .enumerate()
        .map(|(position, &control_point)| {
            let corner = Corner {
                control_point,
                position,
            };
            let index = slot(corner, &element.index).map_err(|key| {
                AssetError::AttributeIndexOutOfRange {
                    channel,
                    index: key,
                    len: element.index.len(),
                }
            })?;
            element
                .direct
                .get(index)
                .copied()
                .ok_or(AssetError::AttributeIndexOutOfRange {
                    channel,
                    index,
                    len: element.direct.len(),
                })
        })
        .collect()
}

/// Control point position of every corner
pub fn resolve_positions(mesh: &MeshData, corners: &[usize]) -> Result<Vec<[f32; 3]>, AssetError> {
    corners
        .iter()
        .map(|&index| {
            mesh.control_point(index)
                .map(|p| p.as_vec3().to_array())
                .ok_or(AssetError::AttributeIndexOutOfRange {
                    channel: Channel::Position,
                    index,
                    len: mesh.control_points.len(),
                })
        })
        .collect()
}

/// Normal of every corner, read from the mesh's first normal channel
pub fn resolve_normals(mesh: &MeshData, corners: &[usize]) -> Result<Vec<[f32; 3]>, AssetError> {
    let element = mesh
        .normals
        .first()
        .ok_or(AssetError::MissingChannel(Channel::Normal))?;
    let normals = resolve_attribute(Channel::Normal, element, corners)?;
    Ok(normals.into_iter().map(|n| n.as_vec3().to_array()).collect())
}

/// UV of every corner from channel `uv_set`.
///
/// Returns an empty list when the mesh has no such channel.
pub fn resolve_uvs(
    mesh: &MeshData,
    corners: &[usize],
    uv_set: usize,
) -> Result<Vec<[f32; 2]>, AssetError> {
    let Some(element) = mesh.uvs.get(uv_set) else {
        debug!(
            "No UV channel {} ({} present), using zero UVs",
            uv_set,
            mesh.uvs.len()
        );
        return Ok(Vec::new());
    };
    let uvs = resolve_attribute(Channel::Uv, element, corners)?;
    Ok(uvs.into_iter().map(|uv| uv.as_vec2().to_array()).collect())
}
