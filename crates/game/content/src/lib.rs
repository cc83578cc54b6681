//! Data-driven content definitions and loaders.
//!
//! This crate loads static game content from RON/TOML data files:
//! - Game configuration (TOML)
//! - Unit models (RON)
//! - Item catalogs (RON)
//! - Map scenarios: ASCII layout plus placements (RON)
//!
//! Every loader produces `crawl-core` types directly via their serde derives.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ItemLoader, LoadResult, MapLoader, ModelLoader, Placement,
    Scenario, SpawnerPlacement,
};
