//! Actor identification: who a character is, and who owns it

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Character, EntityId};

/// Kind of actor behind a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    BattleNpc,
    EventNpc,
    Companion,
    Pet,
    Mount,
    Ornament,
    Retainer,
    #[default]
    Unknown,
}

impl ActorKind {
    /// Human-readable kind, as shown after a character's name
    pub fn display_name(self) -> &'static str {
        match self {
            ActorKind::Player => "Player",
            ActorKind::BattleNpc => "Battle NPC",
            ActorKind::EventNpc => "Event NPC",
            ActorKind::Companion => "Companion",
            ActorKind::Pet => "Pet",
            ActorKind::Mount => "Mount",
            ActorKind::Ornament => "Accessory",
            ActorKind::Retainer => "Retainer",
            ActorKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classification of a character by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Identity {
    /// A player character, known by its player name
    Player { name: String },
    /// A character owned by another one
    Owned { owner: EntityId, kind: ActorKind },
    /// Anything else
    Other { kind: ActorKind },
}

impl Identity {
    /// The actor kind, players included
    pub fn kind(&self) -> ActorKind {
        match self {
            Identity::Player { .. } => ActorKind::Player,
            Identity::Owned { kind, .. } | Identity::Other { kind } => *kind,
        }
    }
}

/// Identifies characters as players, owned actors or others
pub trait ActorIdentifier {
    fn identify(&self, character: &Character) -> Identity;
}
