use std::collections::HashMap;
use std::path::Path;

use glam::Mat4;
use scenebake_scene::{JsonSceneImporter, NodeId, SceneDocument, SceneImporter};
use tracing::{debug, info};

use crate::animation::{self, AnimationClip};
use crate::error::AssetError;
use crate::handle::{AssetHandle, DocumentId};
use crate::material::{resolve_material, Material};
use crate::mesh::{extract_mesh, Mesh};
use crate::names::NameDictionary;
use crate::options::LoaderOptions;

/// Everything extracted from a base scene, committed only once it is complete.
struct Extracted {
    node_names: NameDictionary,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    material_ids: HashMap<String, usize>,
}

/// Owns the imported scene documents and everything extracted from them.
///
/// One base document provides meshes and materials; any number of animation
/// documents provide clips. A failed load leaves the loader unchanged.
pub struct AssetLoader {
    importer: Box<dyn SceneImporter + Send + Sync>,
    options: LoaderOptions,
    documents: Vec<Box<dyn SceneDocument>>,
    base: Option<DocumentId>,
    node_names: NameDictionary,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    material_ids: HashMap<String, usize>,
    clips: Vec<AnimationClip>,
}

impl AssetLoader {
    /// Create a loader reading JSON scene documents.
    pub fn new(options: LoaderOptions) -> Self {
        Self::with_importer(JsonSceneImporter, options)
    }

    /// Create a loader reading documents through `importer`.
    pub fn with_importer(
        importer: impl SceneImporter + Send + Sync + 'static,
        options: LoaderOptions,
    ) -> Self {
        Self {
            importer: Box::new(importer),
            options,
            documents: Vec::new(),
            base: None,
            node_names: NameDictionary::default(),
            meshes: Vec::new(),
            materials: Vec::new(),
            material_ids: HashMap::new(),
            clips: Vec::new(),
        }
    }

    /// Import the base scene at `path` and extract its meshes and materials.
    ///
    /// Replaces any previously loaded base scene; animation clips are kept.
    pub fn load(&mut self, path: &Path) -> Result<Vec<AssetHandle<Mesh>>, AssetError> {
        let doc = self.importer.import(path)?;
        info!("Loading scene {}", path.display());
        self.load_document(doc)
    }

    /// Extract meshes and materials from an already imported base document.
    pub fn load_document(
        &mut self,
        doc: Box<dyn SceneDocument>,
    ) -> Result<Vec<AssetHandle<Mesh>>, AssetError> {
        let extracted = extract_scene(doc.as_ref(), &self.options)?;
        info!(
            "Scene has {} nodes, {} meshes, {} materials",
            doc.node_count(),
            extracted.meshes.len(),
            extracted.materials.len()
        );

        match self.base {
            Some(id) => self.documents[id.0] = doc,
            None => {
                self.base = Some(DocumentId(self.documents.len()));
                self.documents.push(doc);
            }
        }
        self.node_names = extracted.node_names;
        self.meshes = extracted.meshes;
        self.materials = extracted.materials;
        self.material_ids = extracted.material_ids;

        Ok((0..self.meshes.len()).map(AssetHandle::new).collect())
    }

    /// Load a base scene, then one animation file.
    ///
    /// When only the animation fails the base scene stays loaded.
    pub fn load_with_animation(
        &mut self,
        model: &Path,
        animation: &Path,
    ) -> Result<Vec<AssetHandle<AnimationClip>>, AssetError> {
        self.load(model)?;
        self.load_animation(animation)
    }

    /// Import an animation document and add one clip per animation stack.
    pub fn load_animation(
        &mut self,
        path: &Path,
    ) -> Result<Vec<AssetHandle<AnimationClip>>, AssetError> {
        let doc = self.importer.import(path)?;
        self.add_animation_document(doc, path)
    }

    /// Add the clips of an already imported animation document.
    ///
    /// `origin` names the document in errors and logs.
    pub fn add_animation_document(
        &mut self,
        doc: Box<dyn SceneDocument>,
        origin: &Path,
    ) -> Result<Vec<AssetHandle<AnimationClip>>, AssetError> {
        let id = DocumentId(self.documents.len());
        let clips = animation::clips_from_document(doc.as_ref(), id, origin)?;

        let first = self.clips.len();
        self.documents.push(doc);
        self.clips.extend(clips);
        Ok((first..self.clips.len()).map(AssetHandle::new).collect())
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn mesh(&self, handle: AssetHandle<Mesh>) -> Option<&Mesh> {
        self.meshes.get(handle.index())
    }

    pub fn clip(&self, handle: AssetHandle<AnimationClip>) -> Option<&AnimationClip> {
        self.clips.get(handle.index())
    }

    /// Handle of the first mesh owned by the node named `name`
    pub fn mesh_index(&self, name: &str) -> Option<AssetHandle<Mesh>> {
        self.meshes
            .iter()
            .position(|m| m.node_name == name)
            .map(AssetHandle::new)
    }

    /// Handle of the first clip named `name`
    pub fn clip_index(&self, name: &str) -> Option<AssetHandle<AnimationClip>> {
        self.clips
            .iter()
            .position(|c| c.name == name)
            .map(AssetHandle::new)
    }

    /// Id of the material named `name`.
    ///
    /// Returns 0 while no material is registered.
    pub fn material_id(&self, name: &str) -> Result<usize, AssetError> {
        if self.material_ids.is_empty() {
            return Ok(0);
        }
        self.material_ids
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::UnknownMaterial(name.to_owned()))
    }

    /// Node names of the base scene
    pub fn node_names(&self) -> &NameDictionary {
        &self.node_names
    }

    pub fn base_document(&self) -> Result<&dyn SceneDocument, AssetError> {
        self.base
            .and_then(|id| self.document(id))
            .ok_or(AssetError::NoSceneLoaded)
    }

    pub fn document(&self, id: DocumentId) -> Option<&dyn SceneDocument> {
        self.documents.get(id.0).map(|doc| doc.as_ref())
    }

    fn resolve(
        &self,
        mesh: AssetHandle<Mesh>,
        clip: AssetHandle<AnimationClip>,
    ) -> Result<(&Mesh, &AnimationClip, &dyn SceneDocument), AssetError> {
        let mesh = self
            .mesh(mesh)
            .ok_or(AssetError::UnknownMesh(mesh.index()))?;
        let clip_ref = self
            .clip(clip)
            .ok_or(AssetError::UnknownClip(clip.index()))?;
        let doc = self
            .document(clip_ref.document)
            .ok_or(AssetError::UnknownClip(clip.index()))?;
        Ok((mesh, clip_ref, doc))
    }

    /// Transform of a mesh at `frame` of a clip
    pub fn sample_mesh_transform(
        &self,
        mesh: AssetHandle<Mesh>,
        clip: AssetHandle<AnimationClip>,
        frame: f32,
    ) -> Result<Mat4, AssetError> {
        let (mesh, clip, doc) = self.resolve(mesh, clip)?;
        animation::sample_mesh_transform(doc, mesh, clip, frame)
    }

    /// Skinning matrices of a mesh's bones at `frame` of a clip
    pub fn sample_bone_transforms(
        &self,
        mesh: AssetHandle<Mesh>,
        clip: AssetHandle<AnimationClip>,
        frame: f32,
    ) -> Result<Vec<Mat4>, AssetError> {
        let (mesh, clip, doc) = self.resolve(mesh, clip)?;
        animation::sample_bone_transforms(doc, mesh, clip, frame)
    }

    /// Write a mesh's skinning matrices into `out`, returning the count written
    pub fn write_bone_transforms(
        &self,
        mesh: AssetHandle<Mesh>,
        clip: AssetHandle<AnimationClip>,
        frame: f32,
        out: &mut [Mat4],
    ) -> Result<usize, AssetError> {
        let (mesh, clip, doc) = self.resolve(mesh, clip)?;
        animation::write_bone_transforms(doc, mesh, clip, frame, out)
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

fn extract_scene(
    doc: &dyn SceneDocument,
    options: &LoaderOptions,
) -> Result<Extracted, AssetError> {
    let mut materials = Vec::new();
    let mut material_ids = HashMap::new();
    for surface in doc.materials() {
        for material in resolve_material(surface, options.strip_texture_directories) {
            material_ids
                .entry(material.name.clone())
                .or_insert(materials.len());
            materials.push(material);
        }
    }

    let mut meshes = Vec::new();
    for &child in doc.children(doc.root()) {
        collect_meshes(doc, child, options, &mut meshes)?;
    }

    Ok(Extracted {
        node_names: NameDictionary::build(doc),
        meshes,
        materials,
        material_ids,
    })
}

fn collect_meshes(
    doc: &dyn SceneDocument,
    node: NodeId,
    options: &LoaderOptions,
    meshes: &mut Vec<Mesh>,
) -> Result<(), AssetError> {
    if let Some(data) = doc.mesh(node) {
        meshes.push(extract_mesh(doc, node, data, options)?);
    } else {
        debug!("Node '{}' has no mesh", doc.node_name(node));
    }
    for &child in doc.children(node) {
        collect_meshes(doc, child, options, meshes)?;
    }
    Ok(())
}
