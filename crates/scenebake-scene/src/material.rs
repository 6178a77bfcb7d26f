//! Surface materials and their texture connections

use serde::{Deserialize, Serialize};

/// A texture connected to a material property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSource {
    /// A single image file
    File { file_name: String },
    /// A stack of image files blended together
    Layered { layers: Vec<String> },
}

/// A named material property, possibly compound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperty {
    pub name: String,
    #[serde(default)]
    pub textures: Vec<TextureSource>,
    #[serde(default)]
    pub children: Vec<MaterialProperty>,
}

impl MaterialProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach a file texture
    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.textures.push(TextureSource::File {
            file_name: file_name.into(),
        });
        self
    }

    /// Number of textures of any kind attached to this property
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn layered_texture_count(&self) -> usize {
        self.textures
            .iter()
            .filter(|t| matches!(t, TextureSource::Layered { .. }))
            .count()
    }

    /// File names of the plain file textures, in connection order
    pub fn file_textures(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().filter_map(|t| match t {
            TextureSource::File { file_name } => Some(file_name.as_str()),
            TextureSource::Layered { .. } => None,
        })
    }

    /// Find a descendant by a `|`-separated path relative to this property
    pub fn find_hierarchical(&self, path: &str) -> Option<&MaterialProperty> {
        let mut current = self;
        for part in path.split('|') {
            current = current.children.iter().find(|c| c.name == part)?;
        }
        Some(current)
    }
}

/// Entry of a shader implementation table: the property feeding one semantic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderEntry {
    pub source: String,
}

/// A surface material as authored in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    pub name: String,
    /// Shader implementation table, present for hardware-shader materials
    #[serde(default)]
    pub shader_table: Option<Vec<ShaderEntry>>,
    #[serde(default)]
    pub properties: Vec<MaterialProperty>,
}

impl SurfaceMaterial {
    /// Name of the plain diffuse property
    pub const DIFFUSE: &'static str = "DiffuseColor";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Top-level property with exactly this name
    pub fn find_property(&self, name: &str) -> Option<&MaterialProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Property found by walking a `|`-separated path from the material root
    pub fn find_property_hierarchical(&self, path: &str) -> Option<&MaterialProperty> {
        let (head, rest) = match path.split_once('|') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let top = self.find_property(head)?;
        match rest {
            Some(rest) => top.find_hierarchical(rest),
            None => Some(top),
        }
    }
}
