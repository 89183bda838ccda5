//! Equipment slots and the identifiers encoded in game paths
//!
//! Character resources live under directories such as
//! `chara/equipment/e0123`, `chara/weapon/w0201` or `chara/human/c0101`.
//! The helpers here pull those identifiers back out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Slot a resource was loaded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Ears,
    Neck,
    Wrists,
    RFinger,
    LFinger,
    MainHand,
    OffHand,
    #[default]
    Unknown,
}

impl EquipSlot {
    pub fn is_equipment(self) -> bool {
        matches!(
            self,
            EquipSlot::Head | EquipSlot::Body | EquipSlot::Hands | EquipSlot::Legs | EquipSlot::Feet
        )
    }

    pub fn is_accessory(self) -> bool {
        matches!(
            self,
            EquipSlot::Ears | EquipSlot::Neck | EquipSlot::Wrists | EquipSlot::RFinger | EquipSlot::LFinger
        )
    }

    pub fn is_weapon(self) -> bool {
        matches!(self, EquipSlot::MainHand | EquipSlot::OffHand)
    }

    /// File name suffix used by the game for this slot (`top`, `met`, ...)
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            EquipSlot::Head => Some("met"),
            EquipSlot::Body => Some("top"),
            EquipSlot::Hands => Some("glv"),
            EquipSlot::Legs => Some("dwn"),
            EquipSlot::Feet => Some("sho"),
            EquipSlot::Ears => Some("ear"),
            EquipSlot::Neck => Some("nek"),
            EquipSlot::Wrists => Some("wrs"),
            EquipSlot::RFinger => Some("rir"),
            EquipSlot::LFinger => Some("ril"),
            _ => None,
        }
    }

    /// Parse a slot from a file name suffix
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        [
            EquipSlot::Head,
            EquipSlot::Body,
            EquipSlot::Hands,
            EquipSlot::Legs,
            EquipSlot::Feet,
            EquipSlot::Ears,
            EquipSlot::Neck,
            EquipSlot::Wrists,
            EquipSlot::RFinger,
            EquipSlot::LFinger,
        ]
        .into_iter()
        .find(|slot| slot.suffix() == Some(suffix))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EquipSlot::Head => "Head",
            EquipSlot::Body => "Body",
            EquipSlot::Hands => "Hands",
            EquipSlot::Legs => "Legs",
            EquipSlot::Feet => "Feet",
            EquipSlot::Ears => "Ears",
            EquipSlot::Neck => "Neck",
            EquipSlot::Wrists => "Wrists",
            EquipSlot::RFinger => "Right Ring",
            EquipSlot::LFinger => "Left Ring",
            EquipSlot::MainHand => "Main Hand",
            EquipSlot::OffHand => "Off Hand",
            EquipSlot::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Parse a four-digit identifier with one of the given prefixes (`e0123` -> 123)
pub fn parse_prefixed_id(segment: &str, prefixes: &[char]) -> Option<u16> {
    let mut chars = segment.chars();
    let prefix = chars.next()?;
    if !prefixes.contains(&prefix) {
        return None;
    }
    let digits = chars.as_str();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Slot encoded in a file stem such as `c0101e0001_top` or `mt_c0101e0001_top_a`
pub fn slot_from_stem(stem: &str) -> Option<EquipSlot> {
    stem.split('_').skip(1).find_map(EquipSlot::from_suffix)
}
