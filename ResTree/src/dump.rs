//! Captured world state
//!
//! A [`WorldDump`] is a JSON snapshot of everything the tree builder asks the
//! game about: the object table, who each character is, which collection
//! applies to it, and the raw resources it had loaded. It implements every
//! service trait, so trees can be rebuilt offline from a capture.
//!
//! ```json
//! {
//!   "local_player": 256,
//!   "characters": [
//!     { "object_index": 0, "id": 256, "name": "Aria", "address": 4096, "draw_object": 8192 }
//!   ],
//!   "identities": { "0": { "type": "player", "name": "Aria" } },
//!   "collections": [ { "name": "Default", "redirects": { "chara/a.mdl": "/mods/a.mdl" } } ],
//!   "default_collection": "Default",
//!   "resources": {
//!     "0": {
//!       "roots": [ { "address": 12288 } ],
//!       "records": [ { "key": { "address": 12288 }, "game_path": "chara/a.mdl" } ]
//!     }
//!   }
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::collection::{CollectionResolver, ModCollection, RedirectionTable};
use crate::error::{Error, Result};
use crate::paths::{FullPath, GamePath};
use crate::tree::{GlobalResolveContext, NodeContext, NodeId, ResourceGraphSource, ResourceKey, ResourceNode, ResourceType};
use crate::ui_data::{UiData, UiIcon};
use crate::world::{ActorIdentifier, ActorKind, Character, EntityId, Identity, ObjectTable};

/// One raw resource a character had loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub key: ResourceKey,
    /// Inferred from the path extension when absent
    #[serde(default)]
    pub resource_type: Option<ResourceType>,
    #[serde(default)]
    pub game_path: Option<GamePath>,
    #[serde(default)]
    pub full_path: Option<FullPath>,
    /// Authoritative display name, only used when UI data is requested
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: UiIcon,
    #[serde(default)]
    pub fallback_name: Option<String>,
    #[serde(default)]
    pub context: NodeContext,
    #[serde(default)]
    pub object_address: u64,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub children: Vec<ResourceKey>,
}

impl ResourceRecord {
    fn resource_type(&self) -> ResourceType {
        if let Some(resource_type) = self.resource_type {
            return resource_type;
        }
        let extension = self
            .game_path
            .as_ref()
            .and_then(GamePath::extension)
            .or_else(|| {
                self.full_path
                    .as_ref()
                    .and_then(|path| path.as_path().extension())
                    .and_then(|extension| extension.to_str())
            });
        extension.map_or(ResourceType::Unknown, ResourceType::from_extension)
    }

    fn to_node(&self, with_ui_data: bool) -> ResourceNode {
        let mut node = ResourceNode::new(
            self.resource_type(),
            self.game_path.clone().unwrap_or_default(),
            self.full_path.clone().unwrap_or_default(),
            self.context,
        )
        .with_addresses(self.object_address, self.key.address)
        .with_length(self.length);

        if let Some(fallback_name) = &self.fallback_name {
            node = node.with_fallback_name(fallback_name.clone());
        }
        if with_ui_data && let Some(name) = &self.name {
            node = node.with_ui_data(UiData::new(name.clone(), self.icon));
        }
        node
    }
}

/// Resource graph of one character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGraph {
    #[serde(default)]
    pub roots: Vec<ResourceKey>,
    #[serde(default)]
    pub records: Vec<ResourceRecord>,
}

/// Snapshot of the world, loadable from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldDump {
    #[serde(default)]
    pub local_player: Option<EntityId>,
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Object index -> identity; unlisted characters are of unknown kind
    #[serde(default)]
    pub identities: IndexMap<u16, Identity>,
    #[serde(default)]
    pub collections: Vec<RedirectionTable>,
    /// Collection for characters without an assignment
    #[serde(default)]
    pub default_collection: Option<String>,
    /// Object index -> collection name
    #[serde(default)]
    pub assignments: IndexMap<u16, String>,
    /// Object index -> loaded resources
    #[serde(default)]
    pub resources: IndexMap<u16, ResourceGraph>,
}

impl WorldDump {
    /// Load and validate a dump from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading world dump from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a dump
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: Self = serde_json::from_str(json)?;
        dump.validate()?;
        tracing::debug!(
            "World dump: {} characters, {} collections, {} resource graphs",
            dump.characters.len(),
            dump.collections.len(),
            dump.resources.len()
        );
        Ok(dump)
    }

    /// Check that every reference inside the dump points at something
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        let mut indices = HashSet::new();
        for character in &self.characters {
            if !indices.insert(character.object_index) {
                return Err(Error::DuplicateObjectIndex {
                    index: character.object_index,
                });
            }
        }

        if let Some(name) = &self.default_collection
            && self.collection(name).is_none()
        {
            return Err(Error::UnknownDefaultCollection(name.clone()));
        }

        for (&index, name) in &self.assignments {
            if self.collection(name).is_none() {
                return Err(Error::UnknownCollection {
                    index,
                    collection: name.clone(),
                });
            }
        }

        for (&index, graph) in &self.resources {
            if !indices.contains(&index) {
                return Err(Error::ResourcesForUnknownCharacter { index });
            }
            let mut keys = HashSet::new();
            for record in &graph.records {
                if !keys.insert(record.key) {
                    return Err(Error::DuplicateResourceKey {
                        index,
                        key: record.key.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&RedirectionTable> {
        self.collections.iter().find(|collection| collection.name == name)
    }

    /// Look up a character by object index
    pub fn character(&self, object_index: u16) -> Option<&Character> {
        self.characters
            .iter()
            .find(|character| character.object_index == object_index)
    }
}

impl ObjectTable for WorldDump {
    fn characters(&self) -> Vec<Character> {
        self.characters.clone()
    }

    fn local_player_id(&self) -> Option<EntityId> {
        self.local_player
    }
}

impl ActorIdentifier for WorldDump {
    fn identify(&self, character: &Character) -> Identity {
        self.identities
            .get(&character.object_index)
            .cloned()
            .unwrap_or(Identity::Other {
                kind: ActorKind::Unknown,
            })
    }
}

impl CollectionResolver for WorldDump {
    fn identify_collection(&self, character: &Character) -> Option<&dyn ModCollection> {
        let name = self
            .assignments
            .get(&character.object_index)
            .or(self.default_collection.as_ref())?;
        self.collection(name).map(|collection| collection as &dyn ModCollection)
    }
}

impl ResourceGraphSource for WorldDump {
    fn load_resources(&self, context: &mut GlobalResolveContext<'_>) {
        let object_index = context.object_index();
        let Some(graph) = self.resources.get(&object_index) else {
            tracing::debug!("No resources recorded for object {object_index}");
            return;
        };
        let records: HashMap<ResourceKey, &ResourceRecord> =
            graph.records.iter().map(|record| (record.key, record)).collect();
        let with_ui_data = context.with_ui_data();

        // Nodes created but whose children are not loaded yet
        let mut pending: Vec<(ResourceKey, NodeId)> = Vec::new();

        for &root in &graph.roots {
            let Some(record) = records.get(&root) else {
                tracing::warn!("Root {root} of object {object_index} has no record");
                continue;
            };
            let (id, created) = context.get_or_create(root, || record.to_node(with_ui_data));
            if !context.add_root(id) {
                tracing::debug!("Root {root} of object {object_index} listed twice");
                continue;
            }
            if created {
                pending.push((root, id));
            }

            while let Some((key, parent)) = pending.pop() {
                let Some(record) = records.get(&key) else {
                    continue;
                };
                for &child in &record.children {
                    let Some(child_record) = records.get(&child) else {
                        tracing::warn!("{key} references missing resource {child}");
                        continue;
                    };
                    let (child_id, created) = context.get_or_create(child, || child_record.to_node(with_ui_data));
                    context.add_child(parent, child_id);
                    if created {
                        pending.push((child, child_id));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ResourceTree;
    use crate::world::TreeBuildCache;

    const DUMP: &str = r#"{
        "local_player": 256,
        "characters": [
            { "object_index": 0, "id": 256, "name": "Aria", "address": 4096, "draw_object": 8192 },
            { "object_index": 2, "id": 300, "name": "Eos", "address": 4352, "draw_object": 8448, "owner_id": 256 }
        ],
        "identities": {
            "0": { "type": "player", "name": "Aria" },
            "2": { "type": "owned", "owner": 256, "kind": "Pet" }
        },
        "collections": [
            { "name": "Default", "redirects": {} },
            { "name": "Pets", "redirects": { "chara/demihuman/d1001/obj/equipment/e0001/model/d1001e0001_top.mdl": "/mods/eos.mdl" } }
        ],
        "default_collection": "Default",
        "assignments": { "2": "Pets" },
        "resources": {
            "0": {
                "roots": [ { "address": 100 }, { "address": 101 } ],
                "records": [
                    { "key": { "address": 100 }, "game_path": "chara/equipment/e0001/model/c0101e0001_top.mdl",
                      "name": "Smallclothes", "icon": "Equipment",
                      "children": [ { "address": 200 }, { "address": 201 } ] },
                    { "key": { "address": 101 }, "game_path": "chara/equipment/e0001/model/c0101e0001_dwn.mdl",
                      "children": [ { "address": 200 }, { "address": 999 } ] },
                    { "key": { "address": 200 }, "full_path": "/mods/skin.tex", "fallback_name": "Skin" },
                    { "key": { "address": 201 }, "resource_type": "Sklb" }
                ]
            }
        }
    }"#;

    fn load_tree(dump: &WorldDump, object_index: u16, with_ui_data: bool) -> ResourceTree {
        let cache = TreeBuildCache::default();
        let character = dump.character(object_index).unwrap();
        let mut tree = ResourceTree::new(character.name.clone(), character, false, false, String::new());
        let mut context = GlobalResolveContext::new(&mut tree, &cache, with_ui_data);
        dump.load_resources(&mut context);
        drop(context);
        tree
    }

    #[test]
    fn test_services() {
        let dump = WorldDump::from_json(DUMP).unwrap();
        assert_eq!(dump.local_player_id(), Some(EntityId(256)));
        assert_eq!(dump.characters().len(), 2);

        let aria = dump.character(0).unwrap();
        let eos = dump.character(2).unwrap();
        assert_eq!(dump.identify(aria), Identity::Player { name: "Aria".into() });
        assert_eq!(dump.identify(eos).kind(), ActorKind::Pet);

        assert_eq!(dump.identify_collection(aria).map(|collection| collection.name()), Some("Default"));
        assert_eq!(dump.identify_collection(eos).map(|collection| collection.name()), Some("Pets"));
    }

    #[test]
    fn test_no_default_collection() {
        let mut dump = WorldDump::from_json(DUMP).unwrap();
        dump.default_collection = None;
        let aria = dump.character(0).unwrap();
        assert!(dump.identify_collection(aria).is_none());
    }

    #[test]
    fn test_load_resources_dedups_shared_records() {
        let dump = WorldDump::from_json(DUMP).unwrap();
        let tree = load_tree(&dump, 0, true);

        // Two models, one shared texture, one skeleton; the dangling child is skipped
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.roots().len(), 2);
        let top = tree.roots()[0];
        let bottom = tree.roots()[1];
        assert_eq!(tree[top].children().len(), 2);
        assert_eq!(tree[bottom].children().len(), 1);
        assert_eq!(tree[top].children()[0], tree[bottom].children()[0]);

        let texture = &tree[tree[top].children()[0]];
        assert_eq!(texture.resource_type(), ResourceType::Tex);
        assert_eq!(texture.resource_handle(), 200);
        assert_eq!(texture.fallback_name(), Some("Skin"));
        assert_eq!(tree[tree[top].children()[1]].resource_type(), ResourceType::Sklb);
        assert_eq!(tree[top].name(), Some("Smallclothes"));
    }

    #[test]
    fn test_repeated_root_is_added_once() {
        let mut dump = WorldDump::from_json(DUMP).unwrap();
        let graph = dump.resources.get_mut(&0).unwrap();
        graph.roots.push(ResourceKey::new(100, 0));
        graph.roots.push(ResourceKey::new(200, 0));
        let tree = load_tree(&dump, 0, false);

        // The texture was already reached as a child; it still becomes a root, once
        assert_eq!(tree.node_count(), 4);
        let top = tree.roots()[0];
        let texture = tree[top].children()[0];
        assert_eq!(tree.roots(), &[top, tree.roots()[1], texture]);
        assert_eq!(tree[top].children().len(), 2);
    }

    #[test]
    fn test_names_only_with_ui_data() {
        let dump = WorldDump::from_json(DUMP).unwrap();
        let tree = load_tree(&dump, 0, false);
        assert_eq!(tree[tree.roots()[0]].name(), None);
    }

    #[test]
    fn test_validation_errors() {
        let duplicate = r#"{ "characters": [
            { "object_index": 1, "name": "A" }, { "object_index": 1, "name": "B" } ] }"#;
        assert!(matches!(
            WorldDump::from_json(duplicate),
            Err(Error::DuplicateObjectIndex { index: 1 })
        ));

        let unknown_default = r#"{ "default_collection": "Missing" }"#;
        assert!(matches!(
            WorldDump::from_json(unknown_default),
            Err(Error::UnknownDefaultCollection(_))
        ));

        let unknown_assignment = r#"{ "characters": [ { "object_index": 3, "name": "A" } ],
            "assignments": { "3": "Missing" } }"#;
        assert!(matches!(
            WorldDump::from_json(unknown_assignment),
            Err(Error::UnknownCollection { index: 3, .. })
        ));

        let orphan_resources = r#"{ "resources": { "7": { "roots": [] } } }"#;
        assert!(matches!(
            WorldDump::from_json(orphan_resources),
            Err(Error::ResourcesForUnknownCharacter { index: 7 })
        ));

        let duplicate_key = r#"{ "characters": [ { "object_index": 0, "name": "A" } ],
            "resources": { "0": { "records": [ { "key": { "address": 5 } }, { "key": { "address": 5 } } ] } } }"#;
        assert!(matches!(
            WorldDump::from_json(duplicate_key),
            Err(Error::DuplicateResourceKey { index: 0, .. })
        ));

        assert!(matches!(WorldDump::from_json("[]"), Err(Error::JsonError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        fs::write(&path, DUMP).unwrap();
        let dump = WorldDump::load(&path).unwrap();
        assert_eq!(dump.characters.len(), 2);
        assert!(matches!(WorldDump::load(dir.path().join("absent.json")), Err(Error::Io(_))));
    }
}
