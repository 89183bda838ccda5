//! Characters in the game world and the read-only views over them
//!
//! A [`Character`] is a captured handle to a live game object. Its native
//! addresses are opaque identifiers and are never dereferenced here.

mod cache;
mod identity;
pub mod naming;

pub use cache::TreeBuildCache;
pub use identity::{ActorIdentifier, ActorKind, Identity};
pub use naming::character_name;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network identity of a game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Identity carried by client-side objects that have no network presence
    pub const INVALID: EntityId = EntityId(0xE000_0000);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// A character in the object table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Slot in the object table
    pub object_index: u16,
    /// Network identity, [`EntityId::INVALID`] for client-side objects
    #[serde(default)]
    pub id: EntityId,
    /// Name as displayed in game
    pub name: String,
    /// Whether the game object is still alive
    #[serde(default = "default_true")]
    pub valid: bool,
    /// Native game object address
    #[serde(default)]
    pub address: u64,
    /// Native draw object address, absent when the character is not drawn
    #[serde(default)]
    pub draw_object: Option<u64>,
    /// Body model identifier
    #[serde(default)]
    pub model_id: u32,
    /// Identity of the owning character (pets, companions, mounts)
    #[serde(default)]
    pub owner_id: Option<EntityId>,
}

fn default_true() -> bool {
    true
}

impl Character {
    pub fn is_valid(&self) -> bool {
        self.valid && self.address != 0
    }

    /// Whether the object carries a valid network identity
    pub fn is_networked(&self) -> bool {
        self.id.is_valid()
    }
}

/// Enumerates the objects currently in the world
pub trait ObjectTable {
    /// All characters, in object table order
    fn characters(&self) -> Vec<Character>;

    /// Identity of the local player, if logged in
    fn local_player_id(&self) -> Option<EntityId>;
}
