//! CLI command for building every tree in a world dump

use std::path::Path;

use super::{load_world, write_json, BuildOptions};
use crate::config::Config;
use crate::factory::{ResourceTreeFactory, TreeFlags};
use crate::tree::ResourceTree;

pub fn execute(
    dump: &Path,
    config: &Config,
    options: &BuildOptions,
    local_only: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let world = load_world(dump)?;
    let (mut flags, mod_directory) = options.resolve(config)?;
    if local_only {
        flags |= TreeFlags::LOCAL_PLAYER_RELATED_ONLY;
    }

    let factory = ResourceTreeFactory::for_world(&world).with_mod_directory(mod_directory);
    let trees: Vec<ResourceTree> = factory.from_object_table(flags).map(|(_, tree)| tree).collect();
    tracing::info!(
        "Built {} trees from {} characters",
        trees.len(),
        world.characters.len()
    );

    write_json(&trees, output)
}
