//! Display names for characters, following ownership chains
//!
//! An owned character is named after its owner: a pet of player `P` named
//! `E` becomes `[P] E (Pet)`, and that pet's own minion would become
//! `[[P] E (Pet)] M (Companion)`.

use std::collections::HashSet;

use super::{ActorIdentifier, Character, Identity, TreeBuildCache};

/// Resolve a character's display name and whether it belongs to a player
///
/// Walks the ownership chain iteratively. An identity seen twice is named
/// as if it had no owner, so a malformed chain still terminates.
pub fn character_name(
    character: &Character,
    cache: &TreeBuildCache,
    identifier: &dyn ActorIdentifier,
) -> (String, bool) {
    // Owned links from the character up to (excluding) the chain's end
    let mut chain: Vec<(&Character, Identity)> = Vec::new();
    let mut visited = HashSet::new();
    let mut current = character;

    let (mut name, player_related) = loop {
        let identity = identifier.identify(current);
        let first_visit = visited.insert(current.id) || !current.id.is_valid();

        match identity {
            Identity::Player { name } if first_visit => break (name, true),
            Identity::Owned { owner, .. } if first_visit => {
                if let Some(owner_character) = cache.character_by_id(owner) {
                    chain.push((current, identity));
                    current = owner_character;
                    continue;
                }
                break (plain_name(current, &identity), false);
            }
            other => {
                if !first_visit {
                    tracing::warn!(
                        "Ownership chain of {} revisits {}, naming it without owner",
                        character.name,
                        current.id
                    );
                }
                break (plain_name(current, &other), false);
            }
        }
    };

    for (owned, identity) in chain.iter().rev() {
        name = format!("[{name}] {}", plain_name(owned, identity));
    }

    (name, player_related)
}

fn plain_name(character: &Character, identity: &Identity) -> String {
    format!("{} ({})", character.name, identity.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ActorKind, EntityId, ObjectTable};
    use std::collections::HashMap;

    struct World {
        characters: Vec<Character>,
        identities: HashMap<u16, Identity>,
    }

    impl ObjectTable for World {
        fn characters(&self) -> Vec<Character> {
            self.characters.clone()
        }

        fn local_player_id(&self) -> Option<EntityId> {
            Some(EntityId(1))
        }
    }

    impl ActorIdentifier for World {
        fn identify(&self, character: &Character) -> Identity {
            self.identities[&character.object_index].clone()
        }
    }

    fn character(index: u16, id: u32, name: &str) -> Character {
        Character {
            object_index: index,
            id: EntityId(id),
            name: name.to_string(),
            valid: true,
            address: 1,
            draw_object: Some(1),
            model_id: 0,
            owner_id: None,
        }
    }

    fn world() -> World {
        World {
            characters: vec![
                character(0, 1, "Alpha Tester"),
                character(1, 2, "Carbuncle"),
                character(2, 3, "Wind-up Minion"),
                character(3, 4, "Stray Chocobo"),
                character(4, 5, "Guard"),
            ],
            identities: HashMap::from([
                (0, Identity::Player { name: "Alpha Tester".into() }),
                (1, Identity::Owned { owner: EntityId(1), kind: ActorKind::Pet }),
                (2, Identity::Owned { owner: EntityId(2), kind: ActorKind::Companion }),
                (3, Identity::Owned { owner: EntityId(99), kind: ActorKind::Mount }),
                (4, Identity::Other { kind: ActorKind::BattleNpc }),
            ]),
        }
    }

    #[test]
    fn test_player_name() {
        let world = world();
        let cache = TreeBuildCache::new(&world, true);
        let name = character_name(&world.characters[0], &cache, &world);
        assert_eq!(name, ("Alpha Tester".to_string(), true));
    }

    #[test]
    fn test_owned_chain() {
        let world = world();
        let cache = TreeBuildCache::new(&world, true);
        assert_eq!(
            character_name(&world.characters[1], &cache, &world),
            ("[Alpha Tester] Carbuncle (Pet)".to_string(), true)
        );
        assert_eq!(
            character_name(&world.characters[2], &cache, &world),
            ("[[Alpha Tester] Carbuncle (Pet)] Wind-up Minion (Companion)".to_string(), true)
        );
    }

    #[test]
    fn test_missing_owner_and_other() {
        let world = world();
        let cache = TreeBuildCache::new(&world, true);
        assert_eq!(
            character_name(&world.characters[3], &cache, &world),
            ("Stray Chocobo (Mount)".to_string(), false)
        );
        assert_eq!(
            character_name(&world.characters[4], &cache, &world),
            ("Guard (Battle NPC)".to_string(), false)
        );
    }

    #[test]
    fn test_owner_unknown_without_characters() {
        let world = world();
        let cache = TreeBuildCache::new(&world, false);
        assert_eq!(
            character_name(&world.characters[1], &cache, &world),
            ("Carbuncle (Pet)".to_string(), false)
        );
    }

    #[test]
    fn test_ownership_cycle_terminates() {
        let mut world = world();
        world.identities.insert(1, Identity::Owned { owner: EntityId(3), kind: ActorKind::Pet });
        let cache = TreeBuildCache::new(&world, true);
        let (name, related) = character_name(&world.characters[1], &cache, &world);
        assert_eq!(name, "[[Carbuncle (Pet)] Wind-up Minion (Companion)] Carbuncle (Pet)");
        assert!(!related);
    }
}
