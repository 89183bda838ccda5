//! CLI command for printing resource path dictionaries

use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use super::{load_world, write_json, BuildOptions};
use crate::config::Config;
use crate::factory::ResourceTreeFactory;

pub fn execute(
    dump: &Path,
    index: Option<u16>,
    config: &Config,
    options: &BuildOptions,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let world = load_world(dump)?;
    let (flags, mod_directory) = options.resolve(config)?;
    let factory = ResourceTreeFactory::for_world(&world).with_mod_directory(mod_directory);

    let characters = match index {
        Some(index) => match world.character(index) {
            Some(character) => vec![character.clone()],
            None => anyhow::bail!("No character with object index {index}"),
        },
        None => world.characters.clone(),
    };

    // Keyed by tree name, then disk path
    let mut dictionaries: IndexMap<String, IndexMap<String, IndexSet<String>>> = IndexMap::new();
    for (character, tree) in factory.from_characters(characters, flags) {
        let key = format!("{} #{}", tree.name(), character.object_index);
        dictionaries.insert(key, tree.resource_paths());
    }

    write_json(&dictionaries, output)
}
