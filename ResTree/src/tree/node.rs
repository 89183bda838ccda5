//! Resource nodes stored in a tree's arena

use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::NodeContext;
use crate::paths::{FullPath, GamePath};
use crate::ui_data::{UiData, UiIcon};

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of a raw resource: its native handle address and the slot it
/// was reached through. Never derived from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub address: u64,
    #[serde(default)]
    pub slot: u32,
}

impl ResourceKey {
    pub fn new(address: u64, slot: u32) -> Self {
        Self { address, slot }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}:{}", self.address, self.slot)
    }
}

/// Category of a resource, named after its file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceType {
    /// Per-variant metadata block
    Imc,
    Mdl,
    Mtrl,
    Tex,
    Sklb,
    Skp,
    Pbd,
    Phyb,
    Eid,
    Shpk,
    Pap,
    Tmb,
    Atex,
    Avfx,
    #[default]
    Unknown,
}

impl ResourceType {
    /// Guess the category from a path's extension
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "imc" => ResourceType::Imc,
            "mdl" => ResourceType::Mdl,
            "mtrl" => ResourceType::Mtrl,
            "tex" => ResourceType::Tex,
            "sklb" => ResourceType::Sklb,
            "skp" => ResourceType::Skp,
            "pbd" => ResourceType::Pbd,
            "phyb" => ResourceType::Phyb,
            "eid" => ResourceType::Eid,
            "shpk" => ResourceType::Shpk,
            "pap" => ResourceType::Pap,
            "tmb" => ResourceType::Tmb,
            "atex" => ResourceType::Atex,
            "avfx" => ResourceType::Avfx,
            _ => ResourceType::Unknown,
        }
    }
}

/// Data only needed while the tree is being assembled
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeBuildState {
    pub(crate) fallback_name: Option<String>,
    pub(crate) context: NodeContext,
}

/// One resource in a tree
#[derive(Debug, Clone, Serialize)]
pub struct ResourceNode {
    resource_type: ResourceType,
    name: Option<String>,
    icon: UiIcon,
    possible_game_paths: Vec<GamePath>,
    full_path: FullPath,
    object_address: u64,
    resource_handle: u64,
    length: u64,
    children: Vec<NodeId>,
    #[serde(skip)]
    build: Option<NodeBuildState>,
}

impl ResourceNode {
    /// Create a node as the graph source first sees it
    ///
    /// `game_path` may be empty when only the disk path is known.
    pub fn new(resource_type: ResourceType, game_path: GamePath, full_path: FullPath, context: NodeContext) -> Self {
        Self {
            resource_type,
            name: None,
            icon: UiIcon::Unknown,
            possible_game_paths: if game_path.is_empty() { Vec::new() } else { vec![game_path] },
            full_path,
            object_address: 0,
            resource_handle: 0,
            length: 0,
            children: Vec::new(),
            build: Some(NodeBuildState {
                fallback_name: None,
                context,
            }),
        }
    }

    #[must_use]
    pub fn with_addresses(mut self, object_address: u64, resource_handle: u64) -> Self {
        self.object_address = object_address;
        self.resource_handle = resource_handle;
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    /// Set an authoritative name and icon
    #[must_use]
    pub fn with_ui_data(mut self, data: UiData) -> Self {
        self.set_ui_data(data);
        self
    }

    /// Name used only if nothing better is found while building
    #[must_use]
    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        if let Some(build) = self.build.as_mut() {
            build.fallback_name = Some(name.into());
        }
        self
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn icon(&self) -> UiIcon {
        self.icon
    }

    /// The game path, if exactly one candidate is known
    pub fn game_path(&self) -> Option<&GamePath> {
        match self.possible_game_paths.as_slice() {
            [path] => Some(path),
            _ => None,
        }
    }

    pub fn possible_game_paths(&self) -> &[GamePath] {
        &self.possible_game_paths
    }

    pub fn full_path(&self) -> &FullPath {
        &self.full_path
    }

    pub fn object_address(&self) -> u64 {
        self.object_address
    }

    pub fn resource_handle(&self) -> u64 {
        self.resource_handle
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Name to fall back on, only available until the tree is finished
    pub fn fallback_name(&self) -> Option<&str> {
        self.build.as_ref()?.fallback_name.as_deref()
    }

    pub(crate) fn context(&self) -> Option<&NodeContext> {
        self.build.as_ref().map(|build| &build.context)
    }

    pub(crate) fn set_ui_data(&mut self, data: UiData) {
        self.name = data.name;
        self.icon = data.icon;
    }

    pub(crate) fn clear_name(&mut self) {
        self.name = None;
    }

    pub(crate) fn set_possible_game_paths(&mut self, paths: Vec<GamePath>) {
        self.possible_game_paths = paths;
    }

    pub(crate) fn set_full_path(&mut self, path: FullPath) {
        self.full_path = path;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Adopt the fallback name if still unnamed, then drop build-time state
    pub(crate) fn finish(&mut self) {
        if let Some(build) = self.build.take()
            && self.name.is_none()
        {
            self.name = build.fallback_name;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.build.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from_extension() {
        assert_eq!(ResourceType::from_extension("MDL"), ResourceType::Mdl);
        assert_eq!(ResourceType::from_extension("tex"), ResourceType::Tex);
        assert_eq!(ResourceType::from_extension("lsf"), ResourceType::Unknown);
    }

    #[test]
    fn test_game_path_requires_single_candidate() {
        let mut node = ResourceNode::new(
            ResourceType::Tex,
            GamePath::new("chara/common/texture/dummy.tex"),
            FullPath::empty(),
            NodeContext::default(),
        );
        assert!(node.game_path().is_some());
        node.set_possible_game_paths(vec![GamePath::new("a.tex"), GamePath::new("b.tex")]);
        assert!(node.game_path().is_none());
    }

    #[test]
    fn test_finish_adopts_fallback_name() {
        let mut node = ResourceNode::new(ResourceType::Sklb, GamePath::empty(), FullPath::empty(), NodeContext::default())
            .with_fallback_name("Skeleton");
        assert!(node.possible_game_paths().is_empty());
        assert_eq!(node.fallback_name(), Some("Skeleton"));
        node.finish();
        assert_eq!(node.name(), Some("Skeleton"));
        assert_eq!(node.fallback_name(), None);
        assert!(node.is_finished());
    }

    #[test]
    fn test_finish_keeps_existing_name() {
        let mut node = ResourceNode::new(ResourceType::Mdl, GamePath::empty(), FullPath::empty(), NodeContext::default())
            .with_ui_data(UiData::new("Body", UiIcon::Equipment))
            .with_fallback_name("Model");
        node.finish();
        assert_eq!(node.name(), Some("Body"));
    }
}
