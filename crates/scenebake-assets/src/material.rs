//! Material texture resolution
//!
//! Materials with a shader implementation table are resolved through its
//! entries; every other material falls back to the textures connected to its
//! plain diffuse property.

use scenebake_scene::{ShaderEntry, SurfaceMaterial};
use serde::Serialize;
use tracing::debug;

/// Texture slots a material can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Diffuse,
    Normal,
    Specular,
    Falloff,
    ReflectionMap,
}

impl TextureSlot {
    /// Slot fed by a shader table entry, if the semantic is recognized
    pub fn from_semantic(source: &str) -> Option<Self> {
        match source {
            "Maya|DiffuseTexture" => Some(TextureSlot::Diffuse),
            "Maya|NormalTexture" => Some(TextureSlot::Normal),
            "Maya|SpecularTexture" => Some(TextureSlot::Specular),
            "Maya|FalloffTexture" => Some(TextureSlot::Falloff),
            "Maya|ReflectionMapTexture" => Some(TextureSlot::ReflectionMap),
            _ => None,
        }
    }
}

/// A resolved material with the file names of its textures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub falloff_texture: Option<String>,
    pub reflection_map_texture: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&str> {
        match slot {
            TextureSlot::Diffuse => self.diffuse_texture.as_deref(),
            TextureSlot::Normal => self.normal_texture.as_deref(),
            TextureSlot::Specular => self.specular_texture.as_deref(),
            TextureSlot::Falloff => self.falloff_texture.as_deref(),
            TextureSlot::ReflectionMap => self.reflection_map_texture.as_deref(),
        }
    }

    pub fn set_texture(&mut self, slot: TextureSlot, file_name: String) {
        let target = match slot {
            TextureSlot::Diffuse => &mut self.diffuse_texture,
            TextureSlot::Normal => &mut self.normal_texture,
            TextureSlot::Specular => &mut self.specular_texture,
            TextureSlot::Falloff => &mut self.falloff_texture,
            TextureSlot::ReflectionMap => &mut self.reflection_map_texture,
        };
        *target = Some(file_name);
    }
}

/// File name of a texture path, with the directory removed when `strip` is set
pub fn texture_file_name(path: &str, strip: bool) -> String {
    if !strip {
        return path.to_owned();
    }
    path.rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
        .to_owned()
}

fn resolve_shader_table(
    material: &SurfaceMaterial,
    entries: &[ShaderEntry],
    strip: bool,
) -> Material {
    let mut resolved = Material::new(material.name.clone());
    for entry in entries {
        let property = material
            .find_property(&entry.source)
            .or_else(|| material.find_property_hierarchical(&entry.source));
        let Some(property) = property else { continue };
        if property.texture_count() == 0 {
            continue;
        }
        let Some(slot) = TextureSlot::from_semantic(&entry.source) else {
            debug!("Ignoring shader semantic '{}'", entry.source);
            continue;
        };
        for file in property.file_textures() {
            resolved.set_texture(slot, texture_file_name(file, strip));
        }
    }
    resolved
}

fn resolve_diffuse(material: &SurfaceMaterial, strip: bool) -> Vec<Material> {
    let Some(diffuse) = material.find_property(SurfaceMaterial::DIFFUSE) else {
        return Vec::new();
    };
    if diffuse.layered_texture_count() > 0 {
        debug!(
            "Material '{}' uses layered diffuse textures, skipping",
            material.name
        );
        return Vec::new();
    }
    diffuse
        .file_textures()
        .map(|file| Material {
            name: material.name.clone(),
            diffuse_texture: Some(texture_file_name(file, strip)),
            ..Default::default()
        })
        .collect()
}

/// Resolve a surface material into zero or more materials.
///
/// A shader-table material always yields exactly one material. A plain
/// material yields one material per file texture on its diffuse property.
pub fn resolve_material(material: &SurfaceMaterial, strip_directories: bool) -> Vec<Material> {
    let resolved = match &material.shader_table {
        Some(entries) => vec![resolve_shader_table(material, entries, strip_directories)],
        None => resolve_diffuse(material, strip_directories),
    };
    for m in &resolved {
        debug!("Resolved {:?}", m);
    }
    resolved
}
