//! CLI command for building one character's tree

use std::path::Path;

use super::{load_world, write_json, BuildOptions};
use crate::config::Config;
use crate::factory::ResourceTreeFactory;

pub fn execute(
    dump: &Path,
    index: u16,
    config: &Config,
    options: &BuildOptions,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let world = load_world(dump)?;
    let (flags, mod_directory) = options.resolve(config)?;

    let Some(character) = world.character(index) else {
        anyhow::bail!("No character with object index {index}");
    };

    let factory = ResourceTreeFactory::for_world(&world).with_mod_directory(mod_directory);
    let Some(tree) = factory.from_character(character, flags) else {
        anyhow::bail!(
            "No tree for {} (object {index}): not drawn, invalid, or without a collection",
            character.name
        );
    };

    write_json(&tree, output)
}
