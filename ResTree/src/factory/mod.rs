//! Resource tree assembly
//!
//! [`ResourceTreeFactory`] turns characters into [`ResourceTree`]s. Each
//! tree goes through the same passes: the graph source creates nodes, paths
//! are resolved against the character's collection in two batched queries,
//! display names are guessed, disk paths are redacted, and build-time state
//! is dropped.
//!
//! ```no_run
//! use restree::dump::WorldDump;
//! use restree::factory::{ResourceTreeFactory, TreeFlags};
//!
//! let world = WorldDump::load("world.json")?;
//! let factory = ResourceTreeFactory::for_world(&world);
//! for (character, tree) in factory.from_object_table(TreeFlags::WITH_UI_DATA) {
//!     println!("{}: {} nodes", character.name, tree.flat_node_ids().len());
//! }
//! # Ok::<(), restree::Error>(())
//! ```

mod filter;
mod resolve;
mod ui;

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf};

use crate::collection::CollectionResolver;
use crate::config::{Config, DefaultFlags};
use crate::tree::{GlobalResolveContext, ResourceGraphSource, ResourceTree};
use crate::ui_data::{PathUiGuesser, UiGuesser};
use crate::world::{character_name, ActorIdentifier, Character, ObjectTable, TreeBuildCache};

static PATH_UI_GUESSER: PathUiGuesser = PathUiGuesser;

/// Options for building trees, combined with `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TreeFlags(u8);

impl TreeFlags {
    pub const NONE: Self = Self(0);
    /// Blank disk paths outside the mod directory or missing from disk
    pub const REDACT_EXTERNAL_PATHS: Self = Self(1);
    /// Guess display names and icons
    pub const WITH_UI_DATA: Self = Self(1 << 1);
    /// Only build trees for the local player and what it owns
    pub const LOCAL_PLAYER_RELATED_ONLY: Self = Self(1 << 2);
    /// Snapshot the whole object table so ownership chains can be followed
    pub const WITH_OWNERSHIP: Self = Self(1 << 3);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TreeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TreeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<DefaultFlags> for TreeFlags {
    fn from(defaults: DefaultFlags) -> Self {
        let mut flags = TreeFlags::NONE;
        if defaults.with_ui_data {
            flags |= TreeFlags::WITH_UI_DATA;
        }
        if defaults.redact_external_paths {
            flags |= TreeFlags::REDACT_EXTERNAL_PATHS;
        }
        flags
    }
}

impl fmt::Display for TreeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(TreeFlags, &str); 4] = [
            (TreeFlags::REDACT_EXTERNAL_PATHS, "REDACT_EXTERNAL_PATHS"),
            (TreeFlags::WITH_UI_DATA, "WITH_UI_DATA"),
            (TreeFlags::LOCAL_PLAYER_RELATED_ONLY, "LOCAL_PLAYER_RELATED_ONLY"),
            (TreeFlags::WITH_OWNERSHIP, "WITH_OWNERSHIP"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}

/// Builds resource trees from the services describing the live world
pub struct ResourceTreeFactory<'a> {
    objects: &'a dyn ObjectTable,
    collections: &'a dyn CollectionResolver,
    actors: &'a dyn ActorIdentifier,
    resources: &'a dyn ResourceGraphSource,
    ui: &'a dyn UiGuesser,
    mod_directory: Option<PathBuf>,
}

impl<'a> ResourceTreeFactory<'a> {
    /// Create a factory over separate services, guessing names from paths
    pub fn new(
        objects: &'a dyn ObjectTable,
        collections: &'a dyn CollectionResolver,
        actors: &'a dyn ActorIdentifier,
        resources: &'a dyn ResourceGraphSource,
    ) -> Self {
        Self {
            objects,
            collections,
            actors,
            resources,
            ui: &PATH_UI_GUESSER,
            mod_directory: None,
        }
    }

    /// Create a factory over one value providing every service
    pub fn for_world<W>(world: &'a W) -> Self
    where
        W: ObjectTable + CollectionResolver + ActorIdentifier + ResourceGraphSource,
    {
        Self::new(world, world, world, world)
    }

    /// Replace the name guesser
    #[must_use]
    pub fn with_ui_guesser(mut self, ui: &'a dyn UiGuesser) -> Self {
        self.ui = ui;
        self
    }

    /// Set the root that disk paths must lie under when redacting
    ///
    /// An empty path counts as no root.
    #[must_use]
    pub fn with_mod_directory(mut self, mod_directory: Option<PathBuf>) -> Self {
        self.mod_directory = mod_directory.filter(|dir| {
            let empty = dir.as_os_str().is_empty();
            if empty {
                tracing::warn!("Ignoring empty mod directory");
            }
            !empty
        });
        self
    }

    /// Take the mod directory from a config
    #[must_use]
    pub fn with_config(self, config: &Config) -> Self {
        self.with_mod_directory(config.mod_directory())
    }

    pub fn mod_directory(&self) -> Option<&Path> {
        self.mod_directory.as_deref()
    }

    fn create_cache(&self, with_characters: bool) -> TreeBuildCache {
        TreeBuildCache::new(self.objects, with_characters)
    }

    /// The local player and everything it owns, without building any tree
    pub fn local_player_related_characters(&self) -> Vec<Character> {
        self.create_cache(true)
            .local_player_related_characters()
            .cloned()
            .collect()
    }

    /// Trees for every character in the object table, built as they are pulled
    ///
    /// Characters without a tree are skipped.
    pub fn from_object_table(&self, flags: TreeFlags) -> impl Iterator<Item = (Character, ResourceTree)> {
        let cache = self.create_cache(true);
        let local_only = flags.contains(TreeFlags::LOCAL_PLAYER_RELATED_ONLY);
        let characters = cache.characters().to_vec();
        tracing::debug!("Building trees for {} characters ({flags})", characters.len());

        characters.into_iter().filter_map(move |character| {
            if local_only && !cache.is_local_player_related(&character) {
                return None;
            }
            let tree = self.build(&character, &cache, flags)?;
            Some((character, tree))
        })
    }

    /// Trees for the given characters, in input order, built as they are pulled
    ///
    /// The object table is only snapshotted in full under
    /// [`TreeFlags::WITH_OWNERSHIP`]; without it owned characters are named
    /// without their owner.
    pub fn from_characters<I>(&self, characters: I, flags: TreeFlags) -> impl Iterator<Item = (Character, ResourceTree)>
    where
        I: IntoIterator<Item = Character>,
    {
        let cache = self.create_cache(flags.contains(TreeFlags::WITH_OWNERSHIP));
        characters.into_iter().filter_map(move |character| {
            let tree = self.build(&character, &cache, flags)?;
            Some((character, tree))
        })
    }

    /// The tree for a single character
    pub fn from_character(&self, character: &Character, flags: TreeFlags) -> Option<ResourceTree> {
        let cache = self.create_cache(flags.contains(TreeFlags::WITH_OWNERSHIP));
        self.build(character, &cache, flags)
    }

    fn build(&self, character: &Character, cache: &TreeBuildCache, flags: TreeFlags) -> Option<ResourceTree> {
        if !character.is_valid() {
            tracing::debug!("Skipping object {}: not a valid character", character.object_index);
            return None;
        }
        if character.draw_object.is_none_or(|address| address == 0) {
            tracing::debug!("Skipping object {}: not drawn", character.object_index);
            return None;
        }
        let Some(collection) = self.collections.identify_collection(character) else {
            tracing::debug!("Skipping object {}: no collection", character.object_index);
            return None;
        };

        let local_player_related = cache.is_local_player_related(character);
        let (name, player_related) = character_name(character, cache, self.actors);
        tracing::debug!(
            "Building tree for {name} (object {}) in {}",
            character.object_index,
            collection.name()
        );

        let mut tree = ResourceTree::new(
            name,
            character,
            local_player_related,
            player_related,
            collection.name().to_string(),
        );

        let with_ui_data = flags.contains(TreeFlags::WITH_UI_DATA);
        let mut context = GlobalResolveContext::new(&mut tree, cache, with_ui_data);
        self.resources.load_resources(&mut context);

        for id in context.into_nodes() {
            tree.insert_flat_node(id);
        }
        tree.process_postfix(|tree, id, _| {
            tree.insert_flat_node(id);
        });
        tracing::debug!(
            "Loaded {} nodes under {} roots",
            tree.flat_node_ids().len(),
            tree.roots().len()
        );

        resolve::resolve_game_paths(&mut tree, collection);

        if with_ui_data {
            ui::resolve_ui_data(&mut tree, self.ui);
        }

        let only_within = if flags.contains(TreeFlags::REDACT_EXTERNAL_PATHS) {
            self.mod_directory.as_deref()
        } else {
            None
        };
        filter::filter_full_paths(&mut tree, only_within);

        for id in tree.flat_node_list() {
            tree.node_mut(id).finish();
        }

        Some(tree)
    }
}
