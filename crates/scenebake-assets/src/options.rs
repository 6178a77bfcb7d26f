use serde::{Deserialize, Serialize};

/// Options controlling how scene documents are extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// UV channel read into vertex texture coordinates
    pub uv_set: usize,
    /// Keep only the file name of texture paths
    pub strip_texture_directories: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            uv_set: 0,
            strip_texture_directories: true,
        }
    }
}
