//! Turn resolution and combat decisions for a tile-based dungeon crawler.
//!
//! `crawl-core` decides, each game turn, what every unit does and what happens
//! as a result. It owns the ability catalog, the combat pipeline, the AI
//! decision layer and the pathfinder. Rendering, audio and input devices are
//! external: the core only pushes [`event`]s into an [`EventSink`].
//!
//! All mutation flows through a [`WorldContext`] handed to
//! [`TurnScheduler::play_turn`]; randomness comes from the RNG inside that
//! context, so a seeded RNG replays a game exactly.
pub mod ability;
pub mod ai;
pub mod combat;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod factory;
pub mod geometry;
pub mod input;
pub mod order;
pub mod path;
pub mod state;
pub mod turn;

pub use ability::{AbilityCategory, AbilityError, AbilityKind};
pub use ai::{AiController, Behavior, BehaviorSelector};
pub use config::{BurnTiming, GameConfig, Progression};
pub use context::WorldContext;
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use event::{
    Activity, EventSink, Frame, GameEvent, NullSink, Pacing, Projectile, RecordingSink, SoundCue,
};
pub use factory::{SpawnError, UnitCatalog, UnitModel};
pub use geometry::{Direction, Position};
pub use input::{PlayerCommand, PlayerInput};
pub use order::{Order, OrderError, OrderOutcome};
pub use path::find_path;
pub use state::{
    AiParameters, Blockers, Door, EquipSlot, Equipment, Faction, GlobeKind, Inventory, Item,
    ItemCategory, ManaError, Map, MapDimensions, MapError, MapObject, ResourceMeter, Spawner,
    StatusEffect, StatusEffectKind, StatusEffects, Terrain, Unit, UnitId, World,
};
pub use turn::{Controller, TurnReport, TurnScheduler};
