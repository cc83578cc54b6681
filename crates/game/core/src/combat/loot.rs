//! Drops left by the dead and pickups collected by the player.

use rand::Rng;
use rand::seq::SliceRandom;
use strum::IntoEnumIterator;

use crate::context::WorldContext;
use crate::event::SoundCue;
use crate::state::{GlobeKind, Item, ItemCategory, MapObject, Unit, UnitId};

/// Rolls the drop table for a slain unit.
///
/// An item roll comes first and, if it succeeds, drops one random item the
/// unit carried or wore. Only when no item drops is the globe roll made.
pub fn drop_loot(ctx: &mut WorldContext<'_>, dead: &Unit) {
    let position = dead.position;

    if ctx.rng.gen_bool(probability(ctx.config.item_drop_chance)) {
        let belongings: Vec<&Item> = ItemCategory::iter()
            .flat_map(|category| dead.inventory.items(category))
            .chain(dead.equipment.iter().map(|(_, item)| item))
            .collect();
        if let Some(item) = belongings.choose(ctx.rng) {
            tracing::debug!(%position, item = %item.name, "item dropped");
            ctx.world
                .map
                .add_object(position, MapObject::Loot((*item).clone()));
            return;
        }
    }

    if ctx.rng.gen_bool(probability(ctx.config.globe_drop_chance)) {
        let kind = if ctx.rng.gen_bool(0.5) {
            GlobeKind::Life
        } else {
            GlobeKind::Mana
        };
        tracing::debug!(%position, ?kind, "globe dropped");
        ctx.world.map.add_object(position, MapObject::Globe(kind));
    }
}

/// Picks up everything lying under `collector`. Only the player collects.
pub fn collect_pickups(ctx: &mut WorldContext<'_>, collector: UnitId) {
    if !ctx.world.is_player(collector) {
        return;
    }
    let Some(position) = ctx.unit(collector).map(|unit| unit.position) else {
        return;
    };

    for pickup in ctx.world.map.take_pickups(position) {
        let restore = ctx.config.globe_restore;
        let Some(unit) = ctx.world.unit_mut(collector) else {
            return;
        };
        let line = match pickup {
            MapObject::Globe(GlobeKind::Life) => {
                unit.life.restore(restore);
                format!("{} absorbs a life globe", unit.name)
            }
            MapObject::Globe(GlobeKind::Mana) => {
                unit.mana.restore(restore);
                format!("{} absorbs a mana globe", unit.name)
            }
            MapObject::Loot(item) => {
                let name = item.name.clone();
                let free_slot = item
                    .slot
                    .is_some_and(|slot| unit.equipment.get(slot).is_none());
                if free_slot && unit.equip(item.clone()).is_ok() {
                    format!("{} equips {name}", unit.name)
                } else {
                    unit.inventory.add(item);
                    format!("{} picks up {name}", unit.name)
                }
            }
            _ => continue,
        };
        ctx.sound(SoundCue::Pickup);
        ctx.log(line);
    }
}

fn probability(chance: f32) -> f64 {
    f64::from(chance).clamp(0.0, 1.0)
}
