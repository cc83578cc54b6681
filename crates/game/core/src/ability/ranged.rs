//! Projectiles and bolts.
//!
//! A shot travels from the caster in a straight compass direction until it
//! reaches a unit, the map edge or a blocked tile. Only a unit standing on the
//! stopping tile is hit; otherwise the shot is not legal at all and nothing is
//! spent.

use crate::ability::{AbilityError, AbilityKind};
use crate::combat;
use crate::context::WorldContext;
use crate::event::{Activity, Frame, Pacing, Projectile, SoundCue};
use crate::geometry::{Direction, Position};
use crate::state::{Map, StatusEffectKind, Unit, UnitId, World};

pub(super) struct Shot {
    target: UnitId,
    stop: Position,
    damage: u32,
}

/// Follows `direction` from `from` and returns the stopping tile.
///
/// The stopping tile is the first tile holding a unit, or the last passable
/// tile before the map edge or a blocked tile. Returns `from` when the very
/// first step is impassable.
pub fn trace(map: &Map, from: Position, direction: Direction) -> Position {
    let mut current = from;
    loop {
        let next = current.step(direction);
        if map.is_blocked(next) {
            return current;
        }
        if map.unit_at(next).is_some() {
            return next;
        }
        current = next;
    }
}

pub(super) fn plan(
    world: &World,
    actor: &Unit,
    kind: AbilityKind,
    target: Position,
) -> Result<Shot, AbilityError> {
    let damage = match kind {
        AbilityKind::ShootArrow => actor
            .ranged_damage()
            .ok_or(AbilityError::MissingEquipment(kind))?,
        _ => spell_damage(kind),
    };
    let direction = actor
        .position
        .direction_to(target)
        .ok_or(AbilityError::NoTarget(kind))?;

    let stop = trace(&world.map, actor.position, direction);
    let victim = world
        .map
        .unit_at(stop)
        .filter(|_| stop != actor.position)
        .ok_or(AbilityError::NoTarget(kind))?;

    Ok(Shot {
        target: victim,
        stop,
        damage,
    })
}

pub(super) fn resolve(ctx: &mut WorldContext<'_>, actor: UnitId, kind: AbilityKind, shot: Shot) {
    let Some(origin) = ctx.unit(actor).map(|unit| unit.position) else {
        return;
    };
    let projectile = Projectile {
        ability: kind,
        from: origin,
        to: shot.stop,
    };
    ctx.frame(Frame::new(actor, Activity::Cast, Pacing::Long).with_projectile(projectile));
    if kind.is_spell() {
        ctx.sound(SoundCue::Spell);
    }

    combat::deal_damage(ctx, shot.damage, Some(actor), shot.target);

    let effect = match kind {
        AbilityKind::Firebolt | AbilityKind::Fireball => Some((StatusEffectKind::Burning, 3)),
        AbilityKind::Frostbolt => Some((StatusEffectKind::Frozen, 2)),
        _ => None,
    };
    if let (Some((effect, turns)), Some(unit)) = (effect, ctx.unit_mut(shot.target)) {
        unit.apply_effect(effect, turns);
    }
}

fn spell_damage(kind: AbilityKind) -> u32 {
    match kind {
        AbilityKind::Bolt | AbilityKind::Firebolt => 4,
        AbilityKind::Frostbolt => 3,
        AbilityKind::Fireball => 8,
        _ => 0,
    }
}
