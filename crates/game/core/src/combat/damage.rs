//! Damage mitigation and application.

use crate::combat::death;
use crate::context::WorldContext;
use crate::event::SoundCue;
use crate::geometry::Position;
use crate::state::{MapObject, StatusEffectKind, Unit, UnitId};

// ============================================================================
// Mitigation
// ============================================================================

/// Fraction of incoming damage the defender shrugs off.
///
/// # Formula
///
/// ```text
/// ratio = sum(absorb of worn items)
///       + sum(block of worn shields)   if the source is in line
/// ratio = clamp(ratio, 0, 1)
/// ```
///
/// "In line" means the source shares a row or a column with the defender.
/// Diagonal attacks and sourceless damage never meet the shield.
pub fn mitigation(defender: &Unit, source: Option<Position>) -> f32 {
    let mut ratio = defender.equipment.absorb_ratio();
    if source.is_some_and(|position| position.is_in_line(defender.position)) {
        ratio += defender.equipment.block_ratio();
    }
    ratio.clamp(0.0, 1.0)
}

/// `round(base * (1 - ratio))`; never more than `base`.
pub fn mitigate(base: u32, ratio: f32) -> u32 {
    let adjusted = (base as f32 * (1.0 - ratio.clamp(0.0, 1.0))).round() as u32;
    adjusted.min(base)
}

// ============================================================================
// Application
// ============================================================================

/// Deals `base` damage from `source` (if any) to `target`.
///
/// Returns the life actually lost, which is at most the target's current
/// life. Both combatants enter combat, the target's Frozen effect shatters
/// and the hit flash is applied. A target brought to zero life goes through
/// the death pipeline before this returns. Damage to a unit that is no longer
/// on the map is ignored.
pub fn deal_damage(
    ctx: &mut WorldContext<'_>,
    base: u32,
    source: Option<UnitId>,
    target: UnitId,
) -> u32 {
    let source_position = source.and_then(|id| ctx.unit(id)).map(|unit| unit.position);
    let Some(defender) = ctx.world.unit_mut(target) else {
        return 0;
    };

    let adjusted = mitigate(base, mitigation(defender, source_position));
    let taken = defender.life.drain(adjusted);
    defender.damage_taken += u64::from(taken);
    defender.enter_combat();
    defender.effects.remove(StatusEffectKind::Frozen);
    defender.apply_effect(StatusEffectKind::Damaged, 1);
    let defender_name = defender.name.clone();
    let survived = defender.is_alive();

    let attacker_name = match source.and_then(|id| ctx.world.unit_mut(id)) {
        Some(attacker) => {
            attacker.damage_dealt += u64::from(taken);
            attacker.enter_combat();
            Some(attacker.name.clone())
        }
        None => None,
    };

    ctx.sound(if taken > 0 { SoundCue::Hit } else { SoundCue::Miss });
    match attacker_name {
        Some(attacker) => ctx.log(format!("{attacker} hits {defender_name} for {taken}")),
        None => ctx.log(format!("{defender_name} takes {taken} damage")),
    }
    tracing::trace!(source = ?source, target = %target, base, taken, "damage dealt");

    if !survived {
        death::kill(ctx, target, source);
    }
    taken
}

/// Damages a standing spawner at `position`.
///
/// Objects have no armour; the damage is clamped to the remaining life.
/// Returns the damage dealt, zero if nothing destructible stands there.
pub fn damage_object(
    ctx: &mut WorldContext<'_>,
    position: Position,
    base: u32,
    source: Option<UnitId>,
) -> u32 {
    let Some(spawner) = ctx
        .world
        .map
        .spawner_mut(position)
        .filter(|spawner| spawner.is_blocking())
    else {
        return 0;
    };
    let taken = spawner.life.drain(base);
    let destroyed = !spawner.is_blocking();

    if let Some(attacker) = source.and_then(|id| ctx.world.unit_mut(id)) {
        attacker.damage_dealt += u64::from(taken);
        attacker.enter_combat();
    }

    ctx.sound(SoundCue::Hit);
    ctx.log(format!("the spawner at {position} takes {taken} damage"));
    if destroyed {
        if let Some(objects) = ctx.world.map.objects_at_mut(position) {
            objects.retain(|object| !matches!(object, MapObject::Spawner(_)));
        }
        ctx.sound(SoundCue::Death);
        ctx.log(format!("the spawner at {position} crumbles"));
        tracing::info!(%position, "spawner destroyed");
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EquipSlot, Faction, Item};

    fn defender(at: Position) -> Unit {
        Unit::new(UnitId(1), "defender", Faction::Enemy, at)
    }

    #[test]
    fn shield_needs_straight_line() {
        let mut unit = defender(Position::new(5, 5));
        unit.equip(Item::shield("kite shield", 0.5)).unwrap();

        assert_eq!(mitigation(&unit, Some(Position::new(5, 4))), 0.5);
        assert_eq!(mitigation(&unit, Some(Position::new(6, 4))), 0.0);
        assert_eq!(mitigation(&unit, None), 0.0);
    }

    #[test]
    fn ratio_is_clamped() {
        let mut unit = defender(Position::ORIGIN);
        unit.equip(Item::armor("plate", EquipSlot::Body, 0.8)).unwrap();
        unit.equip(Item::armor("helm", EquipSlot::Head, 0.5)).unwrap();
        unit.equip(Item::shield("tower", 0.6)).unwrap();

        assert_eq!(mitigation(&unit, Some(Position::new(0, 1))), 1.0);
        assert_eq!(mitigate(10, 1.0), 0);
    }

    #[test]
    fn mitigate_rounds_and_never_exceeds_base() {
        assert_eq!(mitigate(10, 0.5), 5);
        assert_eq!(mitigate(3, 0.5), 2);
        assert_eq!(mitigate(7, 0.0), 7);
        for base in 0..50 {
            for step in 0..=10 {
                assert!(mitigate(base, step as f32 / 10.0) <= base);
            }
        }
    }
}
