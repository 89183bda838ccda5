//! Scratch state used while a tree is being assembled
//!
//! [`GlobalResolveContext`] lives for one tree build and owns the dedup map
//! that guarantees one node per raw resource. [`NodeContext`] is attached to
//! each node until cleanup and narrows ambiguous reverse resolutions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::node::{NodeId, ResourceKey, ResourceNode};
use super::ResourceTree;
use crate::equipment::{parse_prefixed_id, EquipSlot};
use crate::paths::GamePath;
use crate::world::TreeBuildCache;

/// Per-build state shared by every node of one tree
///
/// The only way to add nodes and edges to a tree under construction. Once
/// the context is dropped the tree exposes accessors only.
pub struct GlobalResolveContext<'a> {
    tree: &'a mut ResourceTree,
    cache: &'a TreeBuildCache,
    with_ui_data: bool,
    nodes: IndexMap<ResourceKey, NodeId>,
}

impl<'a> GlobalResolveContext<'a> {
    pub(crate) fn new(tree: &'a mut ResourceTree, cache: &'a TreeBuildCache, with_ui_data: bool) -> Self {
        Self {
            tree,
            cache,
            with_ui_data,
            nodes: IndexMap::new(),
        }
    }

    pub fn cache(&self) -> &TreeBuildCache {
        self.cache
    }

    /// The tree being built, read-only
    pub fn tree(&self) -> &ResourceTree {
        self.tree
    }

    /// Object table index of the character the tree is built for
    pub fn object_index(&self) -> u16 {
        self.tree.object_index()
    }

    /// Body model of the character the tree is built for
    pub fn model_id(&self) -> u32 {
        self.tree.model_id()
    }

    /// Whether presentation data was requested
    pub fn with_ui_data(&self) -> bool {
        self.with_ui_data
    }

    /// The node already created for a raw resource, if any
    pub fn node(&self, key: ResourceKey) -> Option<NodeId> {
        self.nodes.get(&key).copied()
    }

    /// Return the node for `key`, creating it with `create` on first sight
    ///
    /// The boolean is `true` when the node was created by this call, telling
    /// the caller its children still need loading.
    pub fn get_or_create(&mut self, key: ResourceKey, create: impl FnOnce() -> ResourceNode) -> (NodeId, bool) {
        if let Some(&id) = self.nodes.get(&key) {
            return (id, false);
        }
        let id = self.tree.add_node(create());
        self.nodes.insert(key, id);
        (id, true)
    }

    /// Attach `child` under `parent`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.add_child(parent, child);
    }

    /// Make `node` a root; `false` if it already was one
    pub fn add_root(&mut self, node: NodeId) -> bool {
        self.tree.add_root(node)
    }

    /// Every node created through this context, in creation order
    pub(crate) fn into_nodes(self) -> Vec<NodeId> {
        self.nodes.into_values().collect()
    }
}

/// What a node was loaded for, used to pick among candidate game paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeContext {
    #[serde(default)]
    pub slot: EquipSlot,
    /// Equipment, accessory or weapon set id
    #[serde(default)]
    pub set_id: Option<u16>,
    /// Race/gender code of the body (`c0101` -> 101)
    #[serde(default)]
    pub race_code: Option<u16>,
}

impl NodeContext {
    pub fn equipment(slot: EquipSlot, set_id: u16) -> Self {
        Self {
            slot,
            set_id: Some(set_id),
            race_code: None,
        }
    }

    pub fn human(race_code: u16) -> Self {
        Self {
            slot: EquipSlot::Unknown,
            set_id: None,
            race_code: Some(race_code),
        }
    }

    fn is_empty(&self) -> bool {
        self.slot == EquipSlot::Unknown && self.set_id.is_none() && self.race_code.is_none()
    }

    /// Keep the candidates consistent with this context
    ///
    /// Paths that carry no recognizable hint are kept. The result may be
    /// empty; callers decide what to fall back to.
    pub fn filter_game_paths(&self, paths: &[GamePath]) -> Vec<GamePath> {
        if self.is_empty() {
            return paths.to_vec();
        }
        paths
            .iter()
            .filter(|path| self.is_match(path).unwrap_or(true))
            .cloned()
            .collect()
    }

    /// `None` when the path says nothing about this context
    fn is_match(&self, path: &GamePath) -> Option<bool> {
        let mut segments = path.segments();
        if segments.next()? != "chara" {
            return None;
        }
        let category = segments.next()?;
        let directory = segments.next()?;
        match category {
            "equipment" => {
                let id = parse_prefixed_id(directory, &['e'])?;
                Some(self.slot.is_equipment() && self.set_id == Some(id))
            }
            "accessory" => {
                let id = parse_prefixed_id(directory, &['a'])?;
                Some(self.slot.is_accessory() && self.set_id == Some(id))
            }
            "weapon" => {
                let id = parse_prefixed_id(directory, &['w'])?;
                Some(self.slot.is_weapon() && self.set_id == Some(id))
            }
            "human" => {
                let race = parse_prefixed_id(directory, &['c'])?;
                self.race_code.map(|code| code == race)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::FullPath;
    use crate::tree::ResourceType;

    fn paths(list: &[&str]) -> Vec<GamePath> {
        list.iter().map(GamePath::new).collect()
    }

    #[test]
    fn test_filter_equipment() {
        let context = NodeContext::equipment(EquipSlot::Body, 1);
        let candidates = paths(&[
            "chara/equipment/e0001/texture/v01_c0101e0001_top_d.tex",
            "chara/equipment/e0002/texture/v01_c0101e0002_top_d.tex",
            "chara/accessory/a0001/texture/v01_c0101a0001_ear_d.tex",
            "vfx/common/texture/glow.atex",
        ]);
        assert_eq!(
            context.filter_game_paths(&candidates),
            paths(&[
                "chara/equipment/e0001/texture/v01_c0101e0001_top_d.tex",
                "vfx/common/texture/glow.atex",
            ])
        );
    }

    #[test]
    fn test_filter_human_race() {
        let context = NodeContext::human(201);
        let candidates = paths(&[
            "chara/human/c0101/obj/body/b0001/texture/c0101b0001_d.tex",
            "chara/human/c0201/obj/body/b0001/texture/c0201b0001_d.tex",
        ]);
        assert_eq!(
            context.filter_game_paths(&candidates),
            paths(&["chara/human/c0201/obj/body/b0001/texture/c0201b0001_d.tex"])
        );
    }

    #[test]
    fn test_filter_may_empty() {
        let context = NodeContext::equipment(EquipSlot::Head, 9);
        let candidates = paths(&["chara/equipment/e0001/a.tex", "chara/equipment/e0002/b.tex"]);
        assert!(context.filter_game_paths(&candidates).is_empty());
        assert_eq!(NodeContext::default().filter_game_paths(&candidates), candidates);
    }

    #[test]
    fn test_get_or_create_dedups() {
        let cache = TreeBuildCache::default();
        let mut tree = ResourceTree::empty();
        let mut context = GlobalResolveContext::new(&mut tree, &cache, false);
        let make = || {
            ResourceNode::new(ResourceType::Tex, GamePath::empty(), FullPath::from("/mods/a.tex"), NodeContext::default())
        };

        let (first, created) = context.get_or_create(ResourceKey::new(0x10, 0), make);
        assert!(created);
        let (second, created) = context.get_or_create(ResourceKey::new(0x10, 0), make);
        assert!(!created);
        assert_eq!(first, second);
        let (third, _) = context.get_or_create(ResourceKey::new(0x10, 1), make);
        assert_ne!(first, third);
        assert_eq!(context.node(ResourceKey::new(0x10, 1)), Some(third));
        assert_eq!(context.into_nodes(), vec![first, third]);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_roots_are_added_once() {
        let cache = TreeBuildCache::default();
        let mut tree = ResourceTree::empty();
        let mut context = GlobalResolveContext::new(&mut tree, &cache, false);
        let (model, _) = context.get_or_create(ResourceKey::new(0x20, 0), || {
            ResourceNode::new(ResourceType::Mdl, GamePath::new("chara/a.mdl"), FullPath::empty(), NodeContext::default())
        });

        assert!(context.add_root(model));
        assert!(!context.add_root(model));
        assert_eq!(context.tree().roots(), &[model]);
    }
}
