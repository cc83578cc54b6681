//! Melee family: attacks against an adjacent unit.

use crate::ability::{AbilityError, AbilityKind};
use crate::combat;
use crate::context::WorldContext;
use crate::event::{Activity, Frame, Pacing};
use crate::geometry::{Direction, Position};
use crate::state::{StatusEffectKind, Unit, UnitId, World};

const BURN_TURNS: u32 = 3;
const STUN_TURNS: u32 = 2;
const KNOCKBACK_STUN_TURNS: u32 = 1;

pub(super) struct Strike {
    target: UnitId,
    position: Position,
    direction: Direction,
}

pub(super) fn plan(
    world: &World,
    actor: &Unit,
    kind: AbilityKind,
    target: Position,
) -> Result<Strike, AbilityError> {
    if !actor.position.is_adjacent(target) {
        return Err(AbilityError::NotAdjacent(target));
    }
    let direction = actor
        .position
        .direction_to(target)
        .ok_or(AbilityError::NotAdjacent(target))?;
    let victim = world
        .map
        .unit_at(target)
        .ok_or(AbilityError::NoTarget(kind))?;
    Ok(Strike {
        target: victim,
        position: target,
        direction,
    })
}

pub(super) fn resolve(ctx: &mut WorldContext<'_>, actor: UnitId, kind: AbilityKind, strike: Strike) {
    let Some(origin) = ctx.unit(actor).map(|unit| unit.position) else {
        return;
    };
    let base = ctx.unit(actor).map_or(0, Unit::melee_damage);
    let damage = scale(base, kind.multiplier());

    ctx.frame(Frame::new(actor, Activity::Attack, Pacing::Short));

    if kind == AbilityKind::Cleave {
        // Flanking tiles are the two neighbours of the target that also
        // touch the attacker.
        let flanks = [
            origin.step(strike.direction.clockwise()),
            origin.step(strike.direction.counter_clockwise()),
        ];
        let victims: Vec<UnitId> = std::iter::once(strike.position)
            .chain(flanks)
            .filter_map(|tile| ctx.world.map.unit_at(tile))
            .filter(|&id| id != actor)
            .collect();
        for victim in victims {
            combat::deal_damage(ctx, damage, Some(actor), victim);
        }
        return;
    }

    let dealt = combat::deal_damage(ctx, damage, Some(actor), strike.target);
    if kind == AbilityKind::Attack && dealt > 0 {
        if let Some(unit) = ctx.unit_mut(actor) {
            unit.mana.restore(1);
        }
    }

    // Secondary effects only land on survivors.
    if ctx.unit(strike.target).is_none() {
        return;
    }
    match kind {
        AbilityKind::BurningAttack => {
            apply(ctx, strike.target, StatusEffectKind::Burning, BURN_TURNS)
        }
        AbilityKind::StunAttack => apply(ctx, strike.target, StatusEffectKind::Stunned, STUN_TURNS),
        AbilityKind::KnockbackAttack => {
            knock_back(ctx, strike.target, strike.direction);
            apply(
                ctx,
                strike.target,
                StatusEffectKind::Stunned,
                KNOCKBACK_STUN_TURNS,
            );
        }
        _ => {}
    }
}

/// Pushes `victim` tile by tile along `direction`, stopping before the first
/// tile that is off the map, blocked or occupied.
fn knock_back(ctx: &mut WorldContext<'_>, victim: UnitId, direction: Direction) {
    for _ in 0..ctx.config.knockback_distance {
        let Some(position) = ctx.unit(victim).map(|unit| unit.position) else {
            return;
        };
        let next = position.step(direction);
        if !ctx.world.map.is_open(next) {
            break;
        }
        if ctx.world.map.move_unit(victim, next).is_err() {
            break;
        }
    }
}

fn apply(ctx: &mut WorldContext<'_>, target: UnitId, kind: StatusEffectKind, turns: u32) {
    if let Some(unit) = ctx.unit_mut(target) {
        unit.apply_effect(kind, turns);
    }
}

pub(super) fn scale(base: u32, multiplier: f32) -> u32 {
    (base as f32 * multiplier).round() as u32
}
