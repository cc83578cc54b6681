//! Game state: units, items, status effects and the map they live on.
//!
//! The [`Map`] owns every [`Unit`] standing on it; everything else refers to
//! units by [`UnitId`]. [`World`] bundles the active map with turn
//! bookkeeping and is mutated through the ability, combat and turn layers.
pub mod item;
pub mod map;
pub mod status;
pub mod unit;
pub mod world;

pub use item::{EquipSlot, Equipment, Inventory, Item, ItemCategory};
pub use map::{
    Blockers, Door, GlobeKind, Map, MapDimensions, MapError, MapObject, Spawner, Terrain,
};
pub use status::{StatusEffect, StatusEffectKind, StatusEffects};
pub use unit::{AiParameters, Faction, ManaError, ResourceMeter, Unit, UnitId};
pub use world::World;
