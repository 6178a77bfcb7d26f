use std::collections::HashMap;

use scenebake_scene::{NodeId, SceneDocument};

/// Node name to node id lookup for exactly one scene document.
///
/// When several nodes share a name the first one in document order wins.
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    ids: HashMap<String, NodeId>,
}

impl NameDictionary {
    /// Index every node of `doc` by name
    pub fn build(doc: &dyn SceneDocument) -> Self {
        let mut ids = HashMap::with_capacity(doc.node_count());
        for index in 0..doc.node_count() {
            let node = NodeId(index);
            ids.entry(doc.node_name(node).to_owned()).or_insert(node);
        }
        Self { ids }
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenebake_scene::{MemoryScene, SceneDescription};

    #[test]
    fn first_node_with_a_name_wins() {
        let mut desc = SceneDescription::new();
        let first = desc.add_node(desc.root(), "Arm");
        desc.add_node(desc.root(), "Arm");
        desc.add_node(first, "Hand");
        let scene = MemoryScene::try_from(desc).unwrap();

        let names = NameDictionary::build(&scene);
        assert_eq!(names.len(), 3);
        assert_eq!(names.get("Arm"), Some(first));
        assert!(names.contains(SceneDescription::ROOT_NAME));
        assert_eq!(names.get("Leg"), None);
    }

    #[test]
    fn dictionaries_are_scoped_to_their_document() {
        let mut base = SceneDescription::new();
        base.add_node(base.root(), "Head");
        let mut anim = SceneDescription::new();
        anim.add_node(anim.root(), "Spacer");
        let head = anim.add_node(anim.root(), "Head");

        let base_names = NameDictionary::build(&MemoryScene::try_from(base).unwrap());
        let anim_names = NameDictionary::build(&MemoryScene::try_from(anim).unwrap());
        assert_eq!(base_names.get("Head"), Some(NodeId(1)));
        assert_eq!(anim_names.get("Head"), Some(head));
        assert!(!base_names.contains("Spacer"));
    }
}
