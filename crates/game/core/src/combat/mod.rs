//! Combat resolution.
//!
//! Every damaging ability funnels into [`deal_damage`], which applies
//! mitigation, bookkeeping and, when life runs out, the death pipeline.
//!
//! # Core Functions
//!
//! - `deal_damage`: mitigated damage to a unit, death included
//! - `damage_object`: damage to a destructible map object
//! - `kill`: removal, drops, rewards and level-ups
//! - `collect_pickups`: loot and globes under the player

pub mod damage;
pub mod death;
pub mod loot;

pub use damage::{damage_object, deal_damage, mitigate, mitigation};
pub use death::{kill, level_up};
pub use loot::{collect_pickups, drop_loot};
