//! Repositioning abilities. Each returns the landing tile during planning.

use crate::ability::{AbilityError, AbilityKind};
use crate::combat;
use crate::config::GameConfig;
use crate::context::WorldContext;
use crate::event::{Activity, Frame, Pacing, SoundCue};
use crate::geometry::Position;
use crate::state::{Unit, UnitId, World};

pub(super) fn plan(
    world: &World,
    config: &GameConfig,
    actor: &Unit,
    kind: AbilityKind,
    target: Position,
) -> Result<Position, AbilityError> {
    let origin = actor.position;
    let map = &world.map;

    match kind {
        AbilityKind::FreeMove | AbilityKind::Strafe => {
            if !origin.is_adjacent(target) {
                return Err(AbilityError::NotAdjacent(target));
            }
            if !map.is_open(target) {
                return Err(AbilityError::Blocked(target));
            }
            Ok(target)
        }
        AbilityKind::Dash => {
            let direction = origin
                .direction_to(target)
                .ok_or(AbilityError::NoTarget(kind))?;
            let mut landing = origin;
            for _ in 0..config.dash_range {
                let next = landing.step(direction);
                if !map.is_open(next) {
                    break;
                }
                landing = next;
            }
            if landing == origin {
                return Err(AbilityError::Blocked(origin.step(direction)));
            }
            Ok(landing)
        }
        AbilityKind::Blink => {
            let direction = origin
                .direction_to(target)
                .ok_or(AbilityError::NoTarget(kind))?;
            // Units are jumped over; walls and closed doors end the search.
            let mut landing = None;
            for distance in 1..=config.blink_range as i32 {
                let tile = origin.offset(direction, distance);
                if map.is_blocked(tile) {
                    break;
                }
                if map.unit_at(tile).is_none() {
                    landing = Some(tile);
                }
            }
            landing.ok_or(AbilityError::Blocked(origin.step(direction)))
        }
        AbilityKind::Teleport => {
            if origin.manhattan(target) > config.teleport_range {
                return Err(AbilityError::out_of_range(
                    kind,
                    actor.id,
                    origin,
                    target,
                    config.teleport_range,
                    world.turn,
                ));
            }
            if target == origin || !map.is_open(target) {
                return Err(AbilityError::Blocked(target));
            }
            Ok(target)
        }
        _ => Err(AbilityError::NoTarget(kind)),
    }
}

pub(super) fn resolve(
    ctx: &mut WorldContext<'_>,
    actor: UnitId,
    kind: AbilityKind,
    destination: Position,
) {
    if let Err(error) = ctx.world.map.move_unit(actor, destination) {
        tracing::warn!(actor = %actor, ability = kind.as_str(), %error, "move failed after planning");
        return;
    }

    let (activity, cue) = match kind {
        AbilityKind::Blink | AbilityKind::Teleport => (Activity::Cast, SoundCue::Spell),
        _ => (Activity::Walk, SoundCue::Footstep),
    };
    ctx.frame(Frame::new(actor, activity, Pacing::Short));
    ctx.sound(cue);
    combat::collect_pickups(ctx, actor);
}
