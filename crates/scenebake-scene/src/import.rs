use std::fs;
use std::path::Path;

use tracing::debug;

use crate::document::SceneDocument;
use crate::error::ImportError;
use crate::memory::{MemoryScene, SceneDescription};

/// Opens scene documents from paths.
pub trait SceneImporter {
    fn import(&self, path: &Path) -> Result<Box<dyn SceneDocument>, ImportError>;
}

/// Imports scenes stored as JSON [`SceneDescription`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSceneImporter;

impl JsonSceneImporter {
    /// Parse and validate a scene from JSON text. `origin` is only used for error messages.
    pub fn parse(json: &str, origin: &Path) -> Result<MemoryScene, ImportError> {
        let desc: SceneDescription = serde_json::from_str(json)
            .map_err(|e| ImportError::Parse(origin.to_path_buf(), e.to_string()))?;
        MemoryScene::try_from(desc)
    }
}

impl SceneImporter for JsonSceneImporter {
    fn import(&self, path: &Path) -> Result<Box<dyn SceneDocument>, ImportError> {
        if !path.exists() {
            return Err(ImportError::NotFound(path.to_path_buf()));
        }

        let json =
            fs::read_to_string(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
        let scene = Self::parse(&json, path)?;

        debug!(
            "Imported scene '{}': {} nodes, {} materials, {} animation stacks",
            path.display(),
            scene.node_count(),
            scene.materials().len(),
            scene.anim_stacks().len()
        );

        Ok(Box::new(scene))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeId;
    use std::path::PathBuf;

    const CUBE_NODE_SCENE: &str = r#"{
        "nodes": [
            { "name": "RootNode", "children": [1] },
            {
                "name": "Cube",
                "transform": { "translation": [1.0, 2.0, 3.0] },
                "mesh": {
                    "control_points": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                    "polygons": [[0, 1, 2]],
                    "normals": [{
                        "mapping": "by_control_point",
                        "reference": "direct",
                        "direct": [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]]
                    }]
                },
                "materials": [0]
            }
        ],
        "materials": [{
            "name": "Lambert1",
            "properties": [{
                "name": "DiffuseColor",
                "textures": [{ "kind": "file", "file_name": "C:/art/cube.png" }]
            }]
        }],
        "anim_stacks": [{ "name": "Take 001", "start": 0.0, "stop": 1.0 }]
    }"#;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scenebake-import-{}-{}", std::process::id(), name))
    }

    #[test]
    fn parses_scene_description() {
        let scene = JsonSceneImporter::parse(CUBE_NODE_SCENE, Path::new("inline.json")).unwrap();
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.node_name(NodeId(1)), "Cube");
        assert_eq!(scene.mesh(NodeId(1)).unwrap().polygon_count(), 1);
        assert_eq!(scene.global_transform(NodeId(1)).w_axis.x, 1.0);
        assert_eq!(scene.anim_stacks()[0].name, "Take 001");
    }

    #[test]
    fn imports_from_disk() {
        let path = temp_path("cube.json");
        fs::write(&path, CUBE_NODE_SCENE).unwrap();
        let scene = JsonSceneImporter.import(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(scene.materials()[0].name, "Lambert1");
    }

    #[test]
    fn missing_file_returns_error() {
        let result = JsonSceneImporter.import(Path::new("/nonexistent/scene.json"));
        match result {
            Err(ImportError::NotFound(_)) => {}
            Err(other) => panic!("expected NotFound, got: {:?}", other),
            Ok(_) => panic!("expected NotFound, got a scene"),
        }
    }

    #[test]
    fn malformed_json_returns_parse_error() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ \"nodes\": [").unwrap();
        let result = JsonSceneImporter.import(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ImportError::Parse(_, _))));
    }
}
