//! Resource trees: everything a character visually depends on
//!
//! # Overview
//!
//! A [`ResourceTree`] owns its nodes in an arena; edges between nodes are
//! [`NodeId`]s, so a texture shared by two materials is one node with two
//! parents. Next to the structural `roots`, the tree keeps `flat_nodes`, the
//! deduplicated set of every node, which is what all post-assembly passes
//! iterate over.
//!
//! Nodes are created by a [`ResourceGraphSource`] through a
//! [`GlobalResolveContext`], which hands out one node per raw resource. The
//! context is the only handle that can change a tree's structure; a tree
//! returned by the factory is read-only.

mod context;
mod node;
mod source;
pub mod walk;

pub use context::{GlobalResolveContext, NodeContext};
pub use node::{NodeId, ResourceKey, ResourceNode, ResourceType};
pub use source::ResourceGraphSource;

use std::ops::Index;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::world::Character;

/// Resources of one character, with identity information about it
///
/// Every node reachable from [`roots`](Self::roots) is listed in
/// [`flat_node_ids`](Self::flat_node_ids). Nodes can only be added while the
/// tree is being built:
///
/// ```compile_fail
/// use restree::tree::{NodeContext, ResourceNode, ResourceTree, ResourceType};
/// use restree::paths::{FullPath, GamePath};
///
/// fn tamper(tree: &mut ResourceTree) {
///     let node = ResourceNode::new(ResourceType::Tex, GamePath::empty(), FullPath::empty(), NodeContext::default());
///     let id = tree.add_node(node);
///     tree.add_root(id);
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ResourceTree {
    name: String,
    object_index: u16,
    game_object_address: u64,
    draw_object_address: u64,
    local_player_related: bool,
    player_related: bool,
    networked: bool,
    collection_name: String,
    model_id: u32,
    roots: Vec<NodeId>,
    nodes: Vec<ResourceNode>,
    flat_nodes: IndexSet<NodeId>,
}

impl ResourceTree {
    /// Create an empty tree shell for a character
    pub(crate) fn new(
        name: String,
        character: &Character,
        local_player_related: bool,
        player_related: bool,
        collection_name: String,
    ) -> Self {
        Self {
            name,
            object_index: character.object_index,
            game_object_address: character.address,
            draw_object_address: character.draw_object.unwrap_or_default(),
            local_player_related,
            player_related,
            networked: character.is_networked(),
            collection_name,
            model_id: character.model_id,
            roots: Vec::new(),
            nodes: Vec::new(),
            flat_nodes: IndexSet::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            name: String::new(),
            object_index: 0,
            game_object_address: 0,
            draw_object_address: 0,
            local_player_related: false,
            player_related: false,
            networked: false,
            collection_name: String::new(),
            model_id: 0,
            roots: Vec::new(),
            nodes: Vec::new(),
            flat_nodes: IndexSet::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_index(&self) -> u16 {
        self.object_index
    }

    pub fn game_object_address(&self) -> u64 {
        self.game_object_address
    }

    pub fn draw_object_address(&self) -> u64 {
        self.draw_object_address
    }

    /// The local player or something it owns
    pub fn local_player_related(&self) -> bool {
        self.local_player_related
    }

    /// A player or something a player owns
    pub fn player_related(&self) -> bool {
        self.player_related
    }

    pub fn networked(&self) -> bool {
        self.networked
    }

    /// Name of the collection paths were resolved against
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn model_id(&self) -> u32 {
        self.model_id
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Add a node to the arena without attaching it anywhere
    pub(crate) fn add_node(&mut self, node: ResourceNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Attach `child` under `parent`
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].push_child(child);
    }

    /// `false` if `node` already is a root
    pub(crate) fn add_root(&mut self, node: NodeId) -> bool {
        if self.roots.contains(&node) {
            return false;
        }
        self.roots.push(node);
        true
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ResourceNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of every distinct node, in discovery order
    pub fn flat_node_ids(&self) -> &IndexSet<NodeId> {
        &self.flat_nodes
    }

    /// Every distinct node, in discovery order
    pub fn flat_nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.flat_nodes.iter().map(|&id| &self.nodes[id.0])
    }

    pub(crate) fn insert_flat_node(&mut self, id: NodeId) -> bool {
        self.flat_nodes.insert(id)
    }

    /// Snapshot of the flat node ids, for passes that mutate nodes
    pub(crate) fn flat_node_list(&self) -> Vec<NodeId> {
        self.flat_nodes.iter().copied().collect()
    }

    /// Postfix order over the roots: each node once, children first
    pub fn postfix_order(&self) -> Vec<(NodeId, Option<NodeId>)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        walk::postfix(
            self.roots.iter().copied(),
            |id| self.nodes[id.0].children().to_vec(),
            |id, parent| order.push((id, parent)),
        );
        order
    }

    /// Run `action` over every node reachable from the roots, children first
    ///
    /// The traversal order is fixed before the first call, so `action` may
    /// freely mutate the tree.
    pub(crate) fn process_postfix(&mut self, mut action: impl FnMut(&mut Self, NodeId, Option<NodeId>)) {
        for (id, parent) in self.postfix_order() {
            action(self, id, parent);
        }
    }

    // -------------------------------------------------------------------------
    // Export helpers
    // -------------------------------------------------------------------------

    /// Disk path -> game paths, for every node that has a disk path
    pub fn resource_paths(&self) -> IndexMap<String, IndexSet<String>> {
        let mut paths: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for node in self.flat_nodes() {
            if node.full_path().is_empty() {
                continue;
            }
            paths
                .entry(node.full_path().to_string())
                .or_default()
                .extend(node.possible_game_paths().iter().map(ToString::to_string));
        }
        paths
    }

    /// Nodes of one resource type, in discovery order
    pub fn nodes_of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &ResourceNode> {
        self.flat_nodes()
            .filter(move |node| node.resource_type() == resource_type)
    }
}

impl Index<NodeId> for ResourceTree {
    type Output = ResourceNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{FullPath, GamePath};

    fn node(resource_type: ResourceType, game_path: &str, full_path: &str) -> ResourceNode {
        ResourceNode::new(
            resource_type,
            GamePath::new(game_path),
            FullPath::from(full_path),
            NodeContext::default(),
        )
    }

    #[test]
    fn test_postfix_order_over_shared_texture() {
        let mut tree = ResourceTree::empty();
        let model = tree.add_node(node(ResourceType::Mdl, "a.mdl", ""));
        let first = tree.add_node(node(ResourceType::Mtrl, "a.mtrl", ""));
        let second = tree.add_node(node(ResourceType::Mtrl, "b.mtrl", ""));
        let texture = tree.add_node(node(ResourceType::Tex, "a.tex", ""));
        tree.add_root(model);
        tree.add_child(model, first);
        tree.add_child(model, second);
        tree.add_child(first, texture);
        tree.add_child(second, texture);

        let order = tree.postfix_order();
        assert_eq!(
            order,
            vec![(texture, Some(first)), (first, Some(model)), (second, Some(model)), (model, None)]
        );
    }

    #[test]
    fn test_resource_paths_and_types() {
        let mut tree = ResourceTree::empty();
        let model = tree.add_node(node(ResourceType::Mdl, "chara/a.mdl", "/mods/a.mdl"));
        let texture = tree.add_node(node(ResourceType::Tex, "chara/a.tex", "/mods/shared.tex"));
        let other = tree.add_node(node(ResourceType::Tex, "chara/b.tex", "/mods/shared.tex"));
        let unresolved = tree.add_node(node(ResourceType::Tex, "chara/c.tex", ""));
        for id in [model, texture, other, unresolved] {
            tree.insert_flat_node(id);
        }

        let paths = tree.resource_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths["/mods/shared.tex"].len(), 2);
        assert_eq!(tree.nodes_of_type(ResourceType::Tex).count(), 3);
    }
}
