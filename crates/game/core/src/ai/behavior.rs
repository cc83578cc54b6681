//! Behavior selection.
//!
//! The decision tree is evaluated from scratch every turn. Nothing about a
//! unit's previous decision is remembered beyond the unit's own fields.

use rand::Rng;

use crate::ability::{self, AbilityKind};
use crate::config::GameConfig;
use crate::context::WorldContext;
use crate::state::{AiParameters, Unit, UnitId, World};

/// A sub-strategy chosen for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Stay,
    /// Close in and melee `target`.
    Attack { target: UnitId },
    /// Fire a ranged ability at `target`.
    Shoot { target: UnitId, ability: AbilityKind },
    /// Get away from `threat`.
    Avoid { threat: UnitId },
    /// Step somewhere at random.
    Wander,
}

/// Chooses a [`Behavior`] for an AI-controlled unit.
pub struct BehaviorSelector;

impl BehaviorSelector {
    /// # Decision Process
    ///
    /// 1. **Speed gate**: not this unit's turn → Stay
    /// 2. **Survival**: life ratio below the flee threshold → Avoid
    /// 3. **Combat**: target in vision and (already fighting or the
    ///    aggressiveness roll succeeds) → Shoot (ranged, shot available) or
    ///    Attack; otherwise Wander
    /// 4. **Idle**: target out of sight → Stay or Wander, evenly
    pub fn select(ctx: &mut WorldContext<'_>, unit: UnitId, params: &AiParameters) -> Behavior {
        let Some(me) = ctx.unit(unit) else {
            return Behavior::Stay;
        };

        if !params.acts_on_turn(ctx.world.turn) {
            tracing::trace!(unit = %unit, turn = ctx.world.turn, "speed gate: stay");
            return Behavior::Stay;
        }

        let target = nearest_hostile(ctx.world, me);
        let life_ratio = me.life.ratio();
        let in_combat = me.in_combat(ctx.config);
        let distance = target.map(|t| me.position.euclidean(t.position));
        let shot = target.and_then(|t| pick_shot(ctx.world, ctx.config, me, params, t));
        let target = target.map(|t| t.id);

        tracing::debug!(
            "BehaviorSelector: unit={}, life={:.2}, target={:?}, distance={:?}, in_combat={}",
            unit,
            life_ratio,
            target,
            distance,
            in_combat
        );

        // ====================================================================
        // Priority 1: Survival
        // ====================================================================

        if let Some(threat) = target {
            if life_ratio < params.flee_threshold {
                tracing::debug!("  → Avoid (life below flee threshold)");
                return Behavior::Avoid { threat };
            }
        }

        // ====================================================================
        // Priority 2: Combat
        // ====================================================================

        if let (Some(target), Some(distance)) = (target, distance) {
            if distance <= params.vision_range {
                let engage = in_combat
                    || ctx
                        .rng
                        .gen_bool(f64::from(params.aggressiveness).clamp(0.0, 1.0));
                if !engage {
                    tracing::debug!("  → Wander (not engaging)");
                    return Behavior::Wander;
                }
                if let Some(ability) = shot {
                    tracing::debug!("  → Shoot with {}", ability);
                    return Behavior::Shoot { target, ability };
                }
                tracing::debug!("  → Attack");
                return Behavior::Attack { target };
            }
        }

        // ====================================================================
        // Priority 3: Idle
        // ====================================================================

        if ctx.rng.gen_bool(0.5) {
            Behavior::Stay
        } else {
            Behavior::Wander
        }
    }
}

/// The closest unit hostile to `me`, by Euclidean distance.
///
/// Ties go to the lower id.
pub fn nearest_hostile<'w>(world: &'w World, me: &Unit) -> Option<&'w Unit> {
    world
        .map
        .units()
        .filter(|other| other.is_alive() && me.is_hostile_to(other))
        .min_by(|a, b| {
            let da = me.position.euclidean(a.position);
            let db = me.position.euclidean(b.position);
            da.total_cmp(&db).then(a.id.cmp(&b.id))
        })
}

/// A ranged ability that would hit `target` right now, if the unit prefers
/// shooting.
fn pick_shot(
    world: &World,
    config: &GameConfig,
    me: &Unit,
    params: &AiParameters,
    target: &Unit,
) -> Option<AbilityKind> {
    if !params.ranged {
        return None;
    }
    // Shots only fly along the eight compass rays.
    me.position.straight_direction_to(target.position)?;

    ranged_abilities(me)
        .filter(|&kind| ability::check(world, config, me.id, kind, Some(target.position)).is_ok())
        .find(|&kind| {
            me.position
                .direction_to(target.position)
                .is_some_and(|d| ability::trace(&world.map, me.position, d) == target.position)
        })
}

/// Ranged abilities known by `me`, strongest first.
fn ranged_abilities(me: &Unit) -> impl Iterator<Item = AbilityKind> + '_ {
    [
        AbilityKind::Fireball,
        AbilityKind::Firebolt,
        AbilityKind::Frostbolt,
        AbilityKind::Bolt,
        AbilityKind::ShootArrow,
    ]
    .into_iter()
    .filter(|&kind| me.knows(kind))
}
