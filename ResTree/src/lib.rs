#![allow(non_snake_case)]
//! # ResTree
//!
//! Builds, for each character on screen, the tree of game resources it
//! visually depends on: models, materials, textures, skeletons and the rest,
//! each with its logical game path and the disk path a mod collection
//! redirects it to.
//!
//! ## Quick Start
//!
//! ### Building Trees From a World Dump
//!
//! ```no_run
//! use restree::prelude::*;
//!
//! let world = WorldDump::load("world.json")?;
//! let config = Config::load();
//! let factory = ResourceTreeFactory::for_world(&world).with_config(&config);
//!
//! let flags = TreeFlags::WITH_UI_DATA | TreeFlags::REDACT_EXTERNAL_PATHS;
//! for (character, tree) in factory.from_object_table(flags) {
//!     println!("{} ({}): {} resources", tree.name(), character.object_index, tree.flat_node_ids().len());
//! }
//! # Ok::<(), restree::Error>(())
//! ```
//!
//! ### Plugging In Live Services
//!
//! The factory only talks to the world through traits: [`world::ObjectTable`],
//! [`world::ActorIdentifier`], [`collection::CollectionResolver`],
//! [`tree::ResourceGraphSource`] and [`ui_data::UiGuesser`]. Implement them
//! over a live process and pass them to [`factory::ResourceTreeFactory::new`].
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `restree` command-line binary

pub mod collection;
pub mod config;
pub mod dump;
pub mod equipment;
pub mod error;
pub mod factory;
pub mod paths;
pub mod tree;
pub mod ui_data;
pub mod world;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::collection::{CollectionResolver, ModCollection, RedirectionTable};
    pub use crate::config::Config;
    pub use crate::dump::WorldDump;
    pub use crate::factory::{ResourceTreeFactory, TreeFlags};
    pub use crate::paths::{FullPath, GamePath};
    pub use crate::tree::{NodeId, ResourceGraphSource, ResourceNode, ResourceTree, ResourceType};
    pub use crate::ui_data::{PathUiGuesser, UiData, UiGuesser, UiIcon};
    pub use crate::world::{ActorIdentifier, Character, EntityId, Identity, ObjectTable};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
