//! Redirection sets ("collections") mapping game paths to disk paths
//!
//! The tree builder only needs the query side of a collection: forward
//! resolution of logical paths and batched reverse resolution of disk paths.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::paths::{FullPath, GamePath};
use crate::world::Character;

/// Query surface of a redirection set
pub trait ModCollection {
    /// Name shown to users
    fn name(&self) -> &str;

    /// Where `path` is redirected to, or `None` if it is not redirected
    fn resolve_path(&self, path: &GamePath) -> Option<FullPath>;

    /// Batched forward resolution, aligned with the input order
    fn resolve_paths(&self, paths: &[GamePath]) -> Vec<Option<FullPath>> {
        paths.iter().map(|path| self.resolve_path(path)).collect()
    }

    /// Batched reverse resolution: every game path that maps onto each disk path
    fn reverse_resolve_paths(&self, paths: &[FullPath]) -> Vec<HashSet<GamePath>>;
}

/// Picks the collection that applies to a character
pub trait CollectionResolver {
    fn identify_collection(&self, character: &Character) -> Option<&dyn ModCollection>;
}

/// In-memory collection backed by an explicit redirect table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedirectionTable {
    pub name: String,
    /// Game path -> disk path, in definition order
    #[serde(default)]
    pub redirects: IndexMap<GamePath, FullPath>,
}

impl RedirectionTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            redirects: IndexMap::new(),
        }
    }

    /// Add a redirect, builder style
    #[must_use]
    pub fn with_redirect(mut self, game_path: impl Into<GamePath>, full_path: impl Into<FullPath>) -> Self {
        self.redirects.insert(game_path.into(), full_path.into());
        self
    }
}

impl ModCollection for RedirectionTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_path(&self, path: &GamePath) -> Option<FullPath> {
        self.redirects.get(path).cloned()
    }

    fn reverse_resolve_paths(&self, paths: &[FullPath]) -> Vec<HashSet<GamePath>> {
        paths
            .iter()
            .map(|full_path| {
                let mut game_paths: HashSet<GamePath> = self
                    .redirects
                    .iter()
                    .filter(|(_, target)| *target == full_path)
                    .map(|(game_path, _)| game_path.clone())
                    .collect();

                // An unredirected vanilla file reverses onto itself
                if !full_path.is_rooted() && !full_path.is_empty() {
                    let vanilla = GamePath::new(full_path.as_str());
                    if !self.redirects.contains_key(&vanilla) {
                        game_paths.insert(vanilla);
                    }
                }

                game_paths
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> RedirectionTable {
        RedirectionTable::new("Default")
            .with_redirect("chara/human/c0101/obj/body/b0001/texture/c0101b0001_d.tex", "/mods/skin.tex")
            .with_redirect("chara/human/c0201/obj/body/b0001/texture/c0201b0001_d.tex", "/mods/skin.tex")
            .with_redirect("chara/equipment/e0001/model/c0101e0001_top.mdl", "/mods/top.mdl")
    }

    #[test]
    fn test_forward() {
        let collection = collection();
        let resolved = collection.resolve_paths(&[
            GamePath::new("chara/equipment/e0001/model/c0101e0001_top.mdl"),
            GamePath::new("chara/equipment/e0002/model/c0101e0002_top.mdl"),
        ]);
        assert_eq!(resolved, vec![Some(FullPath::from("/mods/top.mdl")), None]);
    }

    #[test]
    fn test_reverse() {
        let collection = collection();
        let reversed = collection.reverse_resolve_paths(&[
            FullPath::from("/mods/skin.tex"),
            FullPath::from("chara/common/texture/dummy.tex"),
            FullPath::from("/mods/unused.tex"),
        ]);
        assert_eq!(reversed.len(), 3);
        assert_eq!(reversed[0].len(), 2);
        assert_eq!(
            reversed[1],
            HashSet::from([GamePath::new("chara/common/texture/dummy.tex")])
        );
        assert!(reversed[2].is_empty());
    }
}
