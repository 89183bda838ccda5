//! Best-guess presentation data for resources
//!
//! Names are inferred from game paths alone. The guesser is a trait so that a
//! caller with real item data can plug in a better one.

use serde::{Deserialize, Serialize};

use crate::equipment::{parse_prefixed_id, slot_from_stem};
use crate::paths::GamePath;

/// Icon category shown next to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UiIcon {
    #[default]
    Unknown,
    Equipment,
    Accessory,
    Weapon,
    Customization,
    Monster,
    Demihuman,
}

/// Display name and icon for a resource node
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiData {
    pub name: Option<String>,
    pub icon: UiIcon,
}

impl UiData {
    pub fn new(name: impl Into<String>, icon: UiIcon) -> Self {
        Self {
            name: Some(name.into()),
            icon,
        }
    }

    /// Prefix the name, if there is one
    #[must_use]
    pub fn prepend_name(self, prefix: &str) -> Self {
        Self {
            name: self.name.map(|name| format!("{prefix}{name}")),
            icon: self.icon,
        }
    }
}

/// Guesses presentation data from game paths
pub trait UiGuesser {
    /// Guess for a model (or a metadata block describing a model)
    fn guess_model_ui_data(&self, path: &GamePath) -> UiData;

    /// Guess for any other resource
    fn guess_ui_data_from_path(&self, path: &GamePath) -> UiData;
}

/// Guesser working purely from the directory layout of character resources
#[derive(Debug, Clone, Copy, Default)]
pub struct PathUiGuesser;

impl UiGuesser for PathUiGuesser {
    fn guess_model_ui_data(&self, path: &GamePath) -> UiData {
        identify_path(path).unwrap_or_else(|| UiData::new(path.file_stem(), UiIcon::Unknown))
    }

    fn guess_ui_data_from_path(&self, path: &GamePath) -> UiData {
        identify_path(path).unwrap_or_else(|| {
            let file_name = path.file_name();
            if file_name.is_empty() {
                UiData::default()
            } else {
                UiData::new(file_name, UiIcon::Unknown)
            }
        })
    }
}

/// Name a path by the character asset directory it lives in
fn identify_path(path: &GamePath) -> Option<UiData> {
    let segments: Vec<&str> = path.segments().collect();
    if segments.first() != Some(&"chara") {
        return None;
    }
    let category = *segments.get(1)?;
    let directory = *segments.get(2)?;

    match category {
        "equipment" => {
            let set = parse_prefixed_id(directory, &['e'])?;
            Some(UiData::new(
                with_slot(format!("Equipment e{set:04}"), path),
                UiIcon::Equipment,
            ))
        }
        "accessory" => {
            let set = parse_prefixed_id(directory, &['a'])?;
            Some(UiData::new(
                with_slot(format!("Accessory a{set:04}"), path),
                UiIcon::Accessory,
            ))
        }
        "weapon" => {
            let set = parse_prefixed_id(directory, &['w'])?;
            let name = match segments.get(5).and_then(|s| parse_prefixed_id(s, &['b'])) {
                Some(body) => format!("Weapon w{set:04} b{body:04}"),
                None => format!("Weapon w{set:04}"),
            };
            Some(UiData::new(name, UiIcon::Weapon))
        }
        "human" => {
            let race = parse_prefixed_id(directory, &['c'])?;
            let part = segments.get(4).copied().and_then(customization_part);
            let id = segments
                .get(5)
                .and_then(|s| parse_prefixed_id(s, &['b', 'f', 'h', 't', 'z']));
            let name = match (part, id) {
                (Some(part), Some(id)) => format!("Customization: {part} #{id} (c{race:04})"),
                (Some(part), None) => format!("Customization: {part} (c{race:04})"),
                _ => format!("Customization (c{race:04})"),
            };
            Some(UiData::new(name, UiIcon::Customization))
        }
        "monster" => {
            let id = parse_prefixed_id(directory, &['m'])?;
            Some(UiData::new(format!("Monster m{id:04}"), UiIcon::Monster))
        }
        "demihuman" => {
            let id = parse_prefixed_id(directory, &['d'])?;
            Some(UiData::new(format!("Demihuman d{id:04}"), UiIcon::Demihuman))
        }
        _ => None,
    }
}

fn with_slot(name: String, path: &GamePath) -> String {
    match slot_from_stem(path.file_stem()) {
        Some(slot) => format!("{name} ({slot})"),
        None => name,
    }
}

fn customization_part(directory: &str) -> Option<&'static str> {
    match directory {
        "body" => Some("Body"),
        "face" => Some("Face"),
        "hair" => Some("Hair"),
        "tail" => Some("Tail"),
        "zear" => Some("Ears"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_model() {
        let data = PathUiGuesser
            .guess_model_ui_data(&GamePath::new("chara/equipment/e0001/model/c0101e0001_top.mdl"));
        assert_eq!(data, UiData::new("Equipment e0001 (Body)", UiIcon::Equipment));
    }

    #[test]
    fn test_customization_texture() {
        let data = PathUiGuesser.guess_ui_data_from_path(&GamePath::new(
            "chara/human/c0101/obj/hair/h0005/texture/c0101h0005_hir_n.tex",
        ));
        assert_eq!(data.name.as_deref(), Some("Customization: Hair #5 (c0101)"));
        assert_eq!(data.icon, UiIcon::Customization);
    }

    #[test]
    fn test_unknown_falls_back_to_file_name() {
        let path = GamePath::new("vfx/common/texture/glow.atex");
        assert_eq!(
            PathUiGuesser.guess_ui_data_from_path(&path).name.as_deref(),
            Some("glow.atex")
        );
        assert_eq!(PathUiGuesser.guess_model_ui_data(&path).name.as_deref(), Some("glow"));
    }

    #[test]
    fn test_prepend_name() {
        let data = UiData::new("Equipment e0001", UiIcon::Equipment).prepend_name("IMC: ");
        assert_eq!(data.name.as_deref(), Some("IMC: Equipment e0001"));
        assert_eq!(UiData::default().prepend_name("IMC: ").name, None);
    }
}
