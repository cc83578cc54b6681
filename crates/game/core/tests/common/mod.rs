//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use crawl_core::{
    AbilityKind, AiParameters, Faction, GameConfig, Map, Position, RecordingSink, ResourceMeter,
    Unit, UnitCatalog, UnitId, World, WorldContext,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const SEED: u64 = 0x5eed;

/// A world plus everything needed to build a [`WorldContext`] over it.
pub struct Harness {
    pub world: World,
    pub rng: ChaCha8Rng,
    pub sink: RecordingSink,
    pub config: GameConfig,
}

impl Harness {
    /// Builds a harness over an ASCII layout with regeneration and drops off,
    /// so that life and mana only change when the test says so.
    pub fn new(layout: &str) -> Self {
        Self::with_catalog(layout, UnitCatalog::new())
    }

    pub fn with_catalog(layout: &str, catalog: UnitCatalog) -> Self {
        let mut config = GameConfig::default().without_drops();
        config.life_regen = 0.0;
        config.mana_regen = 0.0;
        Self {
            world: World::new(Map::from_ascii(layout), catalog),
            rng: ChaCha8Rng::seed_from_u64(SEED),
            sink: RecordingSink::new(),
            config,
        }
    }

    pub fn ctx(&mut self) -> WorldContext<'_> {
        WorldContext::new(&mut self.world, &mut self.rng, &mut self.sink, &self.config)
    }

    pub fn add(&mut self, unit: Unit) -> UnitId {
        self.world.add_unit(unit).expect("tile should be free")
    }

    pub fn add_player(&mut self, unit: Unit) -> UnitId {
        self.world.add_player(unit).expect("tile should be free")
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        self.world.unit(id).expect("unit should be on the map")
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        self.world.unit_mut(id).expect("unit should be on the map")
    }

    pub fn logs(&self) -> Vec<String> {
        self.sink.logs().map(str::to_string).collect()
    }
}

pub fn hero(x: i32, y: i32) -> Unit {
    let mut unit = Unit::new(UnitId(0), "hero", Faction::Player, Position::new(x, y));
    unit.life = ResourceMeter::full(20);
    unit
}

/// An enemy without AI parameters; the AI controller keeps it in place.
pub fn dummy(name: &str, x: i32, y: i32, life: u32) -> Unit {
    let mut unit = Unit::new(UnitId(0), name, Faction::Enemy, Position::new(x, y));
    unit.life = ResourceMeter::full(life);
    unit
}

/// An AI-driven enemy.
pub fn monster(name: &str, x: i32, y: i32, life: u32, params: AiParameters) -> Unit {
    let mut unit = dummy(name, x, y, life);
    unit.ai = Some(params);
    unit
}

pub fn caster(mut unit: Unit, mana: u32, abilities: &[AbilityKind]) -> Unit {
    unit.mana = ResourceMeter::full(mana);
    for &ability in abilities {
        unit.learn(ability);
    }
    unit
}
