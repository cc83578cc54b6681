//! Top-level game state: the active map plus turn bookkeeping.

use crate::factory::{SpawnError, UnitCatalog};
use crate::geometry::Position;
use crate::state::map::Map;
use crate::state::unit::{Unit, UnitId};

#[derive(Clone, Debug)]
pub struct World {
    pub map: Map,
    /// Models available to summons and spawners.
    pub catalog: UnitCatalog,
    /// Global turn counter, starting at 1.
    pub turn: u64,
    pub in_progress: bool,
    pub game_over: bool,
    player: Option<UnitId>,
    next_id: u32,
}

impl World {
    pub fn new(map: Map, catalog: UnitCatalog) -> Self {
        // Units placed on the map beforehand keep their ids.
        let next_id = map.unit_ids().last().map_or(1, |id| id.0 + 1);
        Self {
            map,
            catalog,
            turn: 1,
            in_progress: false,
            game_over: false,
            player: None,
            next_id,
        }
    }

    /// Hands out a fresh id. Ids are never reused.
    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The player's id, while the player is on the map.
    pub fn player_id(&self) -> Option<UnitId> {
        self.player.filter(|id| self.map.unit(*id).is_some())
    }

    pub fn player(&self) -> Option<&Unit> {
        self.player.and_then(|id| self.map.unit(id))
    }

    pub fn is_player(&self, id: UnitId) -> bool {
        self.player == Some(id)
    }

    /// Places `unit` under a fresh id and returns that id.
    pub fn add_unit(&mut self, mut unit: Unit) -> Result<UnitId, SpawnError> {
        let id = self.allocate_id();
        unit.id = id;
        self.map.add_unit(unit)?;
        Ok(id)
    }

    /// Places the player unit.
    pub fn add_player(&mut self, unit: Unit) -> Result<UnitId, SpawnError> {
        let id = self.add_unit(unit)?;
        self.player = Some(id);
        Ok(id)
    }

    /// Builds a unit from a catalog model and places it at `position`.
    pub fn spawn(&mut self, model: &str, position: Position) -> Result<UnitId, SpawnError> {
        let unit = self
            .catalog
            .build(model, UnitId(self.next_id), position)?;
        self.add_unit(unit)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.map.unit(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.map.unit_mut(id)
    }

    /// Living summons created by `summoner`.
    pub fn summons_of(&self, summoner: UnitId) -> usize {
        self.map
            .units()
            .filter(|unit| unit.summoner == Some(summoner) && unit.is_alive())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::UnitModel;
    use crate::state::Faction;

    #[test]
    fn ids_are_never_reused() {
        let catalog: UnitCatalog = [UnitModel::new("rat", Faction::Enemy, 2)].into_iter().collect();
        let mut world = World::new(Map::from_ascii("....\n"), catalog);

        let first = world.spawn("rat", Position::new(0, 0)).unwrap();
        world.map.remove_unit(first);
        let second = world.spawn("rat", Position::new(0, 0)).unwrap();

        assert_ne!(first, second);
        assert_eq!(world.unit(second).map(|u| u.id), Some(second));
    }

    #[test]
    fn player_is_tracked_until_removed() {
        let mut world = World::new(Map::from_ascii("..\n"), UnitCatalog::new());
        let hero = Unit::new(UnitId(0), "hero", Faction::Player, Position::new(1, 0));
        let id = world.add_player(hero).unwrap();

        assert_eq!(world.player_id(), Some(id));
        world.map.remove_unit(id);
        assert_eq!(world.player_id(), None);
        assert!(world.is_player(id));
    }

    #[test]
    fn spawn_reports_unknown_models() {
        let mut world = World::new(Map::from_ascii("..\n"), UnitCatalog::new());
        assert!(matches!(
            world.spawn("dragon", Position::ORIGIN),
            Err(SpawnError::UnknownModel(_))
        ));
    }
}
