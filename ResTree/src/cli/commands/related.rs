//! CLI command for listing characters related to the local player

use std::path::Path;

use super::load_world;
use crate::factory::ResourceTreeFactory;

pub fn execute(dump: &Path) -> anyhow::Result<()> {
    let world = load_world(dump)?;
    let factory = ResourceTreeFactory::for_world(&world);
    let related = factory.local_player_related_characters();

    if related.is_empty() {
        println!("No characters related to the local player");
        return Ok(());
    }

    println!("{:>6}  {:<10}  Name", "Index", "Id");
    for character in &related {
        let id = character.id.to_string();
        println!("{:>6}  {id:<10}  {}", character.object_index, character.name);
    }
    println!("\nTotal: {} characters", related.len());

    Ok(())
}
