//! Map scenario loader.
//!
//! A scenario is an ASCII layout (see [`Map::from_ascii`]) plus placements
//! for the player, monsters, spawners and floor objects.

use std::path::Path;

use crawl_core::{GlobeKind, Item, Map, MapObject, Position, Spawner, UnitCatalog, UnitId, World};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// A unit model placed at a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub model: String,
    pub at: (i32, i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerPlacement {
    pub model: String,
    pub at: (i32, i32),
    pub life: u32,
    pub interval: u32,
    pub max_alive: usize,
}

/// Map scenario as stored in RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub layout: String,
    pub player: Placement,
    #[serde(default)]
    pub units: Vec<Placement>,
    #[serde(default)]
    pub spawners: Vec<SpawnerPlacement>,
    /// Items on the floor, by catalog name.
    #[serde(default)]
    pub loot: Vec<(String, (i32, i32))>,
    #[serde(default)]
    pub globes: Vec<(GlobeKind, (i32, i32))>,
}

fn position((x, y): (i32, i32)) -> Position {
    Position::new(x, y)
}

impl Scenario {
    /// Builds the terrain and floor objects (no units).
    pub fn build_map(&self, items: &[Item]) -> LoadResult<Map> {
        let mut map = Map::from_ascii(&self.layout);

        for spawner in &self.spawners {
            let at = position(spawner.at);
            if !map.is_open(at) {
                anyhow::bail!("Spawner for '{}' placed on a blocked tile {}", spawner.model, at);
            }
            map.add_object(
                at,
                MapObject::Spawner(Spawner::new(
                    spawner.model.clone(),
                    spawner.life,
                    spawner.interval,
                    spawner.max_alive,
                )),
            );
        }
        for (name, at) in &self.loot {
            let item = items
                .iter()
                .find(|item| &item.name == name)
                .ok_or_else(|| anyhow::anyhow!("Unknown item '{}' in loot", name))?;
            map.add_object(position(*at), MapObject::Loot(item.clone()));
        }
        for (kind, at) in &self.globes {
            map.add_object(position(*at), MapObject::Globe(*kind));
        }

        Ok(map)
    }

    /// Builds a ready-to-play world: map, player, then monsters in listed order.
    pub fn build_world(&self, catalog: UnitCatalog, items: &[Item]) -> LoadResult<World> {
        let map = self.build_map(items)?;
        for spawner in &self.spawners {
            if !catalog.contains(&spawner.model) {
                anyhow::bail!("Spawner references unknown model '{}'", spawner.model);
            }
        }

        // The id is reassigned on placement.
        let hero = catalog.build(&self.player.model, UnitId(0), position(self.player.at))?;
        let mut world = World::new(map, catalog);
        world.add_player(hero)?;
        for placement in &self.units {
            world.spawn(&placement.model, position(placement.at))?;
        }

        Ok(world)
    }
}

/// Loader for map scenarios from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))
    }
}
