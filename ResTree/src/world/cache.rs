//! Snapshot of the object table for one tree build
//!
//! Built once per call, then only read. A new call takes a new snapshot since
//! characters may have moved or despawned in between.

use std::collections::{HashMap, HashSet};

use super::{Character, EntityId, ObjectTable};

/// Read-only view of the world used while building resource trees
#[derive(Debug, Clone, Default)]
pub struct TreeBuildCache {
    /// Characters in object table order (empty if built without characters)
    characters: Vec<Character>,
    /// Networked characters indexed by identity (first occurrence wins)
    by_id: HashMap<EntityId, usize>,
    local_player_id: Option<EntityId>,
    /// Identities that are the local player or owned by it, transitively
    local_player_related: HashSet<EntityId>,
}

impl TreeBuildCache {
    /// Snapshot the object table
    ///
    /// Without characters the index stays empty, but
    /// [`is_local_player_related`](Self::is_local_player_related) still
    /// answers through the local player identity and direct ownership.
    pub fn new(objects: &dyn ObjectTable, with_characters: bool) -> Self {
        let local_player_id = objects.local_player_id();
        if !with_characters {
            return Self {
                local_player_id,
                ..Self::default()
            };
        }

        let characters = objects.characters();
        let mut by_id = HashMap::with_capacity(characters.len());
        for (position, character) in characters.iter().enumerate() {
            if character.id.is_valid() {
                by_id.entry(character.id).or_insert(position);
            }
        }

        let mut cache = Self {
            characters,
            by_id,
            local_player_id,
            local_player_related: HashSet::new(),
        };
        cache.local_player_related = cache.collect_local_player_related();

        tracing::debug!(
            "Snapshot taken: {} characters, {} networked, {} related to the local player",
            cache.characters.len(),
            cache.by_id.len(),
            cache.local_player_related.len()
        );

        cache
    }

    /// Characters in object table order
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Look up a networked character by identity
    pub fn character_by_id(&self, id: EntityId) -> Option<&Character> {
        self.by_id.get(&id).map(|&position| &self.characters[position])
    }

    pub fn local_player_id(&self) -> Option<EntityId> {
        self.local_player_id
    }

    /// Whether the character is the local player or (transitively) owned by it
    pub fn is_local_player_related(&self, character: &Character) -> bool {
        let Some(local) = self.local_player_id else {
            return false;
        };
        if character.id == local || self.local_player_related.contains(&character.id) {
            return true;
        }
        character
            .owner_id
            .is_some_and(|owner| owner == local || self.local_player_related.contains(&owner))
    }

    /// Characters related to the local player, in object table order
    pub fn local_player_related_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters
            .iter()
            .filter(|character| self.is_local_player_related(character))
    }

    fn collect_local_player_related(&self) -> HashSet<EntityId> {
        let mut related = HashSet::new();
        let Some(local) = self.local_player_id else {
            return related;
        };

        for character in self.characters.iter().filter(|c| c.id.is_valid()) {
            let mut seen = HashSet::new();
            let mut current = character;
            loop {
                if current.id == local || related.contains(&current.id) {
                    related.insert(character.id);
                    break;
                }
                if !seen.insert(current.id) {
                    tracing::warn!("Ownership cycle detected at {}", current.id);
                    break;
                }
                let Some(owner) = current.owner_id else {
                    break;
                };
                if owner == local {
                    related.insert(character.id);
                    break;
                }
                let Some(next) = self.character_by_id(owner) else {
                    break;
                };
                current = next;
            }
        }

        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Table {
        characters: Vec<Character>,
        local: Option<EntityId>,
    }

    impl ObjectTable for Table {
        fn characters(&self) -> Vec<Character> {
            self.characters.clone()
        }

        fn local_player_id(&self) -> Option<EntityId> {
            self.local
        }
    }

    fn character(index: u16, id: u32, owner: Option<u32>) -> Character {
        Character {
            object_index: index,
            id: EntityId(id),
            name: format!("Character {index}"),
            valid: true,
            address: 0x1000 + u64::from(index),
            draw_object: Some(0x2000 + u64::from(index)),
            model_id: 0,
            owner_id: owner.map(EntityId),
        }
    }

    fn table() -> Table {
        Table {
            characters: vec![
                character(0, 1, None),
                character(1, 2, Some(1)),
                character(2, 3, Some(2)),
                character(3, 4, None),
                character(4, 5, Some(4)),
            ],
            local: Some(EntityId(1)),
        }
    }

    #[test]
    fn test_transitive_ownership() {
        let table = table();
        let cache = TreeBuildCache::new(&table, true);
        let related: Vec<u16> = cache
            .local_player_related_characters()
            .map(|c| c.object_index)
            .collect();
        assert_eq!(related, vec![0, 1, 2]);
        assert!(cache.character_by_id(EntityId(4)).is_some());
        assert!(cache.character_by_id(EntityId::INVALID).is_none());
    }

    #[test]
    fn test_without_characters_uses_direct_owner() {
        let table = table();
        let cache = TreeBuildCache::new(&table, false);
        assert!(cache.characters().is_empty());
        assert!(cache.is_local_player_related(&table.characters[0]));
        assert!(cache.is_local_player_related(&table.characters[1]));
        // Second hop needs the index
        assert!(!cache.is_local_player_related(&table.characters[2]));
        assert!(!cache.is_local_player_related(&table.characters[4]));
    }

    #[test]
    fn test_ownership_cycle_terminates() {
        let table = Table {
            characters: vec![character(0, 1, None), character(1, 2, Some(3)), character(2, 3, Some(2))],
            local: Some(EntityId(1)),
        };
        let cache = TreeBuildCache::new(&table, true);
        assert_eq!(cache.local_player_related_characters().count(), 1);
    }
}
