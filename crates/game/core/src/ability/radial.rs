//! Area effects centred on the caster.

use std::collections::{HashSet, VecDeque};

use crate::ability::{AbilityError, AbilityKind};
use crate::combat;
use crate::context::WorldContext;
use crate::event::{Activity, Frame, Pacing, SoundCue};
use crate::geometry::Position;
use crate::state::{StatusEffectKind, Unit, UnitId, World};

const FLOOR_FIRE_DAMAGE: u32 = 4;
const FLOOR_FIRE_BURN_TURNS: u32 = 2;
const CHAIN_LIGHTNING_DAMAGE: u32 = 3;
const SHOCK_TURNS: u32 = 1;

pub(super) fn plan(
    world: &World,
    actor: &Unit,
    kind: AbilityKind,
) -> Result<Vec<UnitId>, AbilityError> {
    let victims = match kind {
        AbilityKind::FloorFire => actor
            .position
            .neighbors()
            .filter_map(|tile| world.map.unit_at(tile))
            .collect(),
        AbilityKind::ChainLightning => chain(world, actor),
        _ => Vec::new(),
    };
    if victims.is_empty() {
        return Err(AbilityError::NoTarget(kind));
    }
    Ok(victims)
}

/// Breadth-first spread over hostile units, starting next to the caster.
///
/// Every unit is enqueued at most once, so the walk ends after visiting each
/// member of the connected cluster exactly once.
pub(super) fn chain(world: &World, caster: &Unit) -> Vec<UnitId> {
    let hostile_at = |tile: Position| {
        world
            .map
            .unit_at(tile)
            .and_then(|id| world.unit(id))
            .filter(|unit| caster.is_hostile_to(unit))
            .map(|unit| unit.id)
    };

    let mut seen: HashSet<UnitId> = HashSet::from([caster.id]);
    let mut queue: VecDeque<UnitId> = VecDeque::new();
    for id in caster.position.neighbors().filter_map(hostile_at) {
        if seen.insert(id) {
            queue.push_back(id);
        }
    }

    let mut order = Vec::new();
    while let Some(id) = queue.pop_front() {
        order.push(id);
        let Some(position) = world.unit(id).map(|unit| unit.position) else {
            continue;
        };
        for next in position.neighbors().filter_map(hostile_at) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    order
}

pub(super) fn resolve(
    ctx: &mut WorldContext<'_>,
    actor: UnitId,
    kind: AbilityKind,
    victims: &[UnitId],
) {
    let (damage, effect, turns) = match kind {
        AbilityKind::FloorFire => (
            FLOOR_FIRE_DAMAGE,
            StatusEffectKind::Burning,
            FLOOR_FIRE_BURN_TURNS,
        ),
        _ => (
            CHAIN_LIGHTNING_DAMAGE,
            StatusEffectKind::Shocked,
            SHOCK_TURNS,
        ),
    };

    ctx.frame(Frame::new(actor, Activity::Cast, Pacing::Long));
    ctx.sound(SoundCue::Spell);

    for &victim in victims {
        combat::deal_damage(ctx, damage, Some(actor), victim);
        if let Some(unit) = ctx.unit_mut(victim) {
            unit.apply_effect(effect, turns);
        }
    }
}
