use std::path::PathBuf;

use scenebake_scene::{ImportError, LinkMode, MappingMode};

use crate::geometry::Channel;

/// Errors that can occur while extracting or sampling assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("mesh '{mesh}': {source}")]
    Mesh {
        mesh: String,
        #[source]
        source: Box<AssetError>,
    },

    #[error("unsupported mapping mode '{mapping}' on the {channel} channel")]
    UnsupportedMapping {
        channel: Channel,
        mapping: MappingMode,
    },

    #[error("mesh has no {0} channel")]
    MissingChannel(Channel),

    #[error("{channel} index {index} out of range (len {len})")]
    AttributeIndexOutOfRange {
        channel: Channel,
        index: usize,
        len: usize,
    },

    #[error("polygon {polygon} has {size} corners, expected a triangle")]
    NonTriangularPolygon { polygon: usize, size: usize },

    #[error("cluster for bone '{bone}' has {indices} indices but {weights} weights")]
    ClusterLengthMismatch {
        bone: String,
        indices: usize,
        weights: usize,
    },

    #[error("mesh has {0} skin deformers, at most one is supported")]
    MultipleSkins(usize),

    #[error("cluster for bone '{bone}' uses link mode {mode:?}, only normalize is supported")]
    UnsupportedLinkMode { bone: String, mode: LinkMode },

    #[error("skin has {0} bones, at most 256 can be indexed")]
    TooManyBones(usize),

    #[error("{unique} unique vertices exceed the index limit of {max}")]
    IndexOverflow { unique: usize, max: usize },

    #[error("no animation stacks in '{0}'")]
    NoAnimationStacks(PathBuf),

    #[error("animation '{clip}' has an invalid time span ({start}..{stop})")]
    InvalidTimeSpan { clip: String, start: f64, stop: f64 },

    #[error("cannot sample non-finite frame {0}")]
    InvalidFrame(f32),

    #[error("no mesh with index {0}")]
    UnknownMesh(usize),

    #[error("no animation clip with index {0}")]
    UnknownClip(usize),

    #[error("no material named '{0}'")]
    UnknownMaterial(String),

    #[error("bone '{bone}' is not present in animation '{clip}'")]
    MissingBone { clip: String, bone: String },

    #[error("mesh has {bones} bone transforms but the output holds {capacity}")]
    BoneCapacity { bones: usize, capacity: usize },

    #[error("no scene loaded")]
    NoSceneLoaded,
}
