//! Raw mesh geometry as stored by a scene document

use std::fmt;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::document::NodeId;

/// How an attribute channel's values map onto the mesh surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    None,
    /// One value per control point
    ByControlPoint,
    /// One value per polygon corner
    ByPolygonVertex,
    ByPolygon,
    ByEdge,
    AllSame,
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MappingMode::None => "none",
            MappingMode::ByControlPoint => "by-control-point",
            MappingMode::ByPolygonVertex => "by-polygon-vertex",
            MappingMode::ByPolygon => "by-polygon",
            MappingMode::ByEdge => "by-edge",
            MappingMode::AllSame => "all-same",
        };
        f.write_str(name)
    }
}

/// Whether a channel's values are read directly or through an index array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    Direct,
    IndexToDirect,
}

/// One attribute channel (normals, UVs) of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerElement<T> {
    pub mapping: MappingMode,
    pub reference: ReferenceMode,
    pub direct: Vec<T>,
    #[serde(default)]
    pub index: Vec<usize>,
}

impl<T> LayerElement<T> {
    /// Channel whose values are looked up without an index array
    pub fn direct(mapping: MappingMode, direct: Vec<T>) -> Self {
        Self {
            mapping,
            reference: ReferenceMode::Direct,
            direct,
            index: Vec::new(),
        }
    }

    /// Channel whose values are looked up through `index`
    pub fn indexed(mapping: MappingMode, direct: Vec<T>, index: Vec<usize>) -> Self {
        Self {
            mapping,
            reference: ReferenceMode::IndexToDirect,
            direct,
            index,
        }
    }
}

/// How a cluster's weights combine with the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    #[default]
    Normalize,
    Additive,
    TotalOne,
}

/// Control points and weights influenced by one bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// The bone node driving this cluster
    pub link: NodeId,
    #[serde(default)]
    pub link_mode: LinkMode,
    /// Influenced control points, parallel to `weights`
    pub indices: Vec<usize>,
    pub weights: Vec<f64>,
}

/// Skin deformer: one cluster per influencing bone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub clusters: Vec<Cluster>,
}

/// Polygon mesh attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub control_points: Vec<DVec3>,
    /// Control point indices of every polygon, in winding order
    pub polygons: Vec<Vec<usize>>,
    #[serde(default)]
    pub normals: Vec<LayerElement<DVec3>>,
    #[serde(default)]
    pub uvs: Vec<LayerElement<DVec2>>,
    #[serde(default)]
    pub skins: Vec<Skin>,
}

impl MeshData {
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygon_size(&self, polygon: usize) -> usize {
        self.polygons.get(polygon).map_or(0, Vec::len)
    }

    /// Control point index of corner `corner` in polygon `polygon`
    pub fn polygon_vertex(&self, polygon: usize, corner: usize) -> Option<usize> {
        self.polygons.get(polygon)?.get(corner).copied()
    }

    pub fn control_point(&self, index: usize) -> Option<DVec3> {
        self.control_points.get(index).copied()
    }

    pub fn skin_count(&self) -> usize {
        self.skins.len()
    }
}
