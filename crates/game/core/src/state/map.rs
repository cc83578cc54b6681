//! The map: terrain, occupancy and map objects.
//!
//! The map is the single source of truth for "who stands where". It owns the
//! units standing on it; everything else addresses units by [`UnitId`].
//! Moving a unit vacates the origin before occupying the destination, so a
//! unit is never registered on two tiles.

use std::collections::{BTreeMap, HashMap, HashSet};

use bitflags::bitflags;

use crate::error::{ErrorSeverity, GameError};
use crate::geometry::Position;
use crate::state::item::Item;
use crate::state::unit::{ResourceMeter, Unit, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}

/// Static terrain of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    Floor,
    Wall,
}

bitflags! {
    /// Everything that currently stands in the way on a tile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Blockers: u8 {
        const OUT_OF_BOUNDS = 1 << 0;
        const WALL = 1 << 1;
        const DOOR = 1 << 2;
        const BLOCK = 1 << 3;
        const SPAWNER = 1 << 4;
        const UNIT = 1 << 5;
    }
}

impl Blockers {
    /// Blockers that make the tile itself impassable (units excluded).
    pub const TILE: Self = Self::OUT_OF_BOUNDS
        .union(Self::WALL)
        .union(Self::DOOR)
        .union(Self::BLOCK)
        .union(Self::SPAWNER);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Door {
    pub open: bool,
    pub locked: bool,
}

/// Destructible object that periodically spawns units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spawner {
    /// Model name of the spawned units.
    pub model: String,
    pub life: ResourceMeter,
    /// Turns between spawns.
    pub interval: u32,
    pub countdown: u32,
    /// Maximum living units spawned by this spawner.
    pub max_alive: usize,
    pub spawned: Vec<UnitId>,
}

impl Spawner {
    pub fn new(model: impl Into<String>, life: u32, interval: u32, max_alive: usize) -> Self {
        Self {
            model: model.into(),
            life: ResourceMeter::full(life),
            interval,
            countdown: interval,
            max_alive,
            spawned: Vec::new(),
        }
    }

    /// A spawner blocks its tile (and can be attacked) while it stands.
    pub fn is_blocking(&self) -> bool {
        !self.life.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlobeKind {
    Life,
    Mana,
}

/// Anything other than a unit that can sit on a tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapObject {
    Door(Door),
    /// Movable block, pushed one tile at a time.
    Block,
    Spawner(Spawner),
    /// Item lying on the floor.
    Loot(Item),
    Globe(GlobeKind),
}

impl MapObject {
    fn blockers(&self) -> Blockers {
        match self {
            MapObject::Door(door) if !door.open => Blockers::DOOR,
            MapObject::Block => Blockers::BLOCK,
            MapObject::Spawner(spawner) if spawner.is_blocking() => Blockers::SPAWNER,
            _ => Blockers::empty(),
        }
    }

    /// Loot and globes are collected by walking onto them.
    pub fn is_pickup(&self) -> bool {
        matches!(self, MapObject::Loot(_) | MapObject::Globe(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("position {0} is outside the map")]
    OutOfBounds(Position),

    #[error("position {0} is blocked")]
    Blocked(Position),

    #[error("position {position} is occupied by {occupant}")]
    Occupied { position: Position, occupant: UnitId },

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is already on the map")]
    DuplicateUnit(UnitId),

    #[error("occupancy desync for unit {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: Position },
}

impl GameError for MapError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MapError::OutOfBounds(_) | MapError::Blocked(_) | MapError::Occupied { .. } => {
                ErrorSeverity::Recoverable
            }
            MapError::UnitNotFound(_) => ErrorSeverity::Validation,
            MapError::DuplicateUnit(_) | MapError::OccupancyDesync { .. } => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MapError::OutOfBounds(_) => "MAP_OUT_OF_BOUNDS",
            MapError::Blocked(_) => "MAP_BLOCKED",
            MapError::Occupied { .. } => "MAP_OCCUPIED",
            MapError::UnitNotFound(_) => "MAP_UNIT_NOT_FOUND",
            MapError::DuplicateUnit(_) => "MAP_DUPLICATE_UNIT",
            MapError::OccupancyDesync { .. } => "MAP_OCCUPANCY_DESYNC",
        }
    }
}

/// The grid plus everything standing on it.
#[derive(Clone, Debug)]
pub struct Map {
    dimensions: MapDimensions,
    terrain: Vec<Terrain>,
    units: BTreeMap<UnitId, Unit>,
    occupancy: HashMap<Position, UnitId>,
    objects: BTreeMap<Position, Vec<MapObject>>,
    revealed: HashSet<Position>,
}

impl Map {
    /// An all-floor map.
    pub fn new(dimensions: MapDimensions) -> Self {
        let tiles = dimensions.width as usize * dimensions.height as usize;
        Self {
            dimensions,
            terrain: vec![Terrain::Floor; tiles],
            units: BTreeMap::new(),
            occupancy: HashMap::new(),
            objects: BTreeMap::new(),
            revealed: HashSet::new(),
        }
    }

    /// Builds a map from a text layout.
    ///
    /// `#` wall, `+` closed door, `L` locked door, `'` open door, `B` block;
    /// every other character is floor. Rows may have different lengths; the
    /// map is as wide as the longest row.
    pub fn from_ascii(layout: &str) -> Self {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut map = Self::new(MapDimensions::new(width as u32, rows.len() as u32));

        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                match glyph {
                    '#' => map.set_terrain(position, Terrain::Wall),
                    '+' => map.add_object(position, MapObject::Door(Door { open: false, locked: false })),
                    'L' => map.add_object(position, MapObject::Door(Door { open: false, locked: true })),
                    '\'' => map.add_object(position, MapObject::Door(Door { open: true, locked: false })),
                    'B' => map.add_object(position, MapObject::Block),
                    _ => {}
                }
            }
        }
        map
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        self.dimensions
            .index(position)
            .map(|index| self.terrain[index])
    }

    pub fn set_terrain(&mut self, position: Position, terrain: Terrain) {
        if let Some(index) = self.dimensions.index(position) {
            self.terrain[index] = terrain;
        }
    }

    /// Everything in the way on `position`, including units.
    pub fn blockers(&self, position: Position) -> Blockers {
        let Some(terrain) = self.terrain(position) else {
            return Blockers::OUT_OF_BOUNDS;
        };
        let mut blockers = match terrain {
            Terrain::Wall => Blockers::WALL,
            Terrain::Floor => Blockers::empty(),
        };
        for object in self.objects_at(position) {
            blockers |= object.blockers();
        }
        if self.occupancy.contains_key(&position) {
            blockers |= Blockers::UNIT;
        }
        blockers
    }

    /// True when the tile itself is impassable (off-map, wall, closed door,
    /// block, standing spawner). Units do not count.
    pub fn is_blocked(&self, position: Position) -> bool {
        self.blockers(position).intersects(Blockers::TILE)
    }

    /// Passable and unoccupied.
    pub fn is_open(&self, position: Position) -> bool {
        self.blockers(position).is_empty()
    }

    /// Every open tile on the map.
    pub fn open_tiles(&self) -> HashSet<Position> {
        let (width, height) = (self.dimensions.width as i32, self.dimensions.height as i32);
        (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|&position| self.is_open(position))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------------

    pub fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.occupancy.get(&position).copied()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Ids of all units on the map, in ascending id (insertion) order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Places a unit on its own `position`.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), MapError> {
        let position = unit.position;
        if self.units.contains_key(&unit.id) {
            return Err(MapError::DuplicateUnit(unit.id));
        }
        if self.is_blocked(position) {
            return Err(if self.contains(position) {
                MapError::Blocked(position)
            } else {
                MapError::OutOfBounds(position)
            });
        }
        if let Some(occupant) = self.unit_at(position) {
            return Err(MapError::Occupied { position, occupant });
        }
        self.occupancy.insert(position, unit.id);
        self.units.insert(unit.id, unit);
        Ok(())
    }

    /// Takes a unit off the map; it no longer takes part in anything.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        if self.occupancy.get(&unit.position) == Some(&id) {
            self.occupancy.remove(&unit.position);
        }
        Some(unit)
    }

    /// Moves a unit to an open tile (vacate, then occupy).
    pub fn move_unit(&mut self, id: UnitId, destination: Position) -> Result<(), MapError> {
        let origin = self.unit(id).ok_or(MapError::UnitNotFound(id))?.position;
        if origin == destination {
            return Ok(());
        }
        if !self.contains(destination) {
            return Err(MapError::OutOfBounds(destination));
        }
        if self.is_blocked(destination) {
            return Err(MapError::Blocked(destination));
        }
        if let Some(occupant) = self.unit_at(destination) {
            return Err(MapError::Occupied {
                position: destination,
                occupant,
            });
        }
        if self.occupancy.remove(&origin) != Some(id) {
            return Err(MapError::OccupancyDesync {
                unit: id,
                position: origin,
            });
        }
        self.occupancy.insert(destination, id);
        if let Some(unit) = self.units.get_mut(&id) {
            unit.position = destination;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------------

    pub fn objects_at(&self, position: Position) -> &[MapObject] {
        self.objects.get(&position).map_or(&[], Vec::as_slice)
    }

    pub fn objects_at_mut(&mut self, position: Position) -> Option<&mut Vec<MapObject>> {
        self.objects.get_mut(&position)
    }

    pub fn add_object(&mut self, position: Position, object: MapObject) {
        self.objects.entry(position).or_default().push(object);
    }

    /// Positions of every tile holding at least one object.
    pub fn object_positions(&self) -> Vec<Position> {
        self.objects.keys().copied().collect()
    }

    pub fn door_mut(&mut self, position: Position) -> Option<&mut Door> {
        self.objects.get_mut(&position)?.iter_mut().find_map(|object| match object {
            MapObject::Door(door) => Some(door),
            _ => None,
        })
    }

    pub fn spawner_mut(&mut self, position: Position) -> Option<&mut Spawner> {
        self.objects.get_mut(&position)?.iter_mut().find_map(|object| match object {
            MapObject::Spawner(spawner) => Some(spawner),
            _ => None,
        })
    }

    /// Removes a block from `position`, returning whether one was there.
    pub fn take_block(&mut self, position: Position) -> bool {
        let Some(objects) = self.objects.get_mut(&position) else {
            return false;
        };
        let Some(index) = objects.iter().position(|o| matches!(o, MapObject::Block)) else {
            return false;
        };
        objects.remove(index);
        if objects.is_empty() {
            self.objects.remove(&position);
        }
        true
    }

    /// Removes and returns all loot and globes lying on `position`.
    pub fn take_pickups(&mut self, position: Position) -> Vec<MapObject> {
        let Some(objects) = self.objects.get_mut(&position) else {
            return Vec::new();
        };
        let (pickups, rest): (Vec<_>, Vec<_>) =
            objects.drain(..).partition(MapObject::is_pickup);
        if rest.is_empty() {
            self.objects.remove(&position);
        } else {
            *objects = rest;
        }
        pickups
    }

    // ------------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------------

    pub fn reveal(&mut self, position: Position) {
        if self.contains(position) {
            self.revealed.insert(position);
        }
    }

    pub fn is_revealed(&self, position: Position) -> bool {
        self.revealed.contains(&position)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Walls and closed doors stop sight; units and blocks do not.
    pub fn blocks_sight(&self, position: Position) -> bool {
        self.blockers(position)
            .intersects(Blockers::OUT_OF_BOUNDS | Blockers::WALL | Blockers::DOOR)
    }
}
