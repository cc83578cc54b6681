//! Summoning: conjures a unit of the caster's summon class next to it.

use rand::seq::SliceRandom;

use crate::ability::AbilityError;
use crate::config::GameConfig;
use crate::context::WorldContext;
use crate::event::{Activity, Frame, Pacing, SoundCue};
use crate::factory::SpawnError;
use crate::geometry::Position;
use crate::state::{Unit, UnitId, World};

pub(super) fn plan(
    world: &World,
    config: &GameConfig,
    actor: &Unit,
) -> Result<String, AbilityError> {
    let model = actor
        .summon_class
        .clone()
        .ok_or(AbilityError::NoSummonClass)?;
    if !world.catalog.contains(&model) {
        return Err(SpawnError::UnknownModel(model).into());
    }
    if world.summons_of(actor.id) >= config.max_summons {
        return Err(AbilityError::SummonLimit(config.max_summons));
    }
    if open_neighbors(world, actor.position).is_empty() {
        return Err(AbilityError::Blocked(actor.position));
    }
    Ok(model)
}

pub(super) fn resolve(
    ctx: &mut WorldContext<'_>,
    actor: UnitId,
    model: &str,
) -> Result<(), AbilityError> {
    let Some((origin, faction, caster)) = ctx
        .unit(actor)
        .map(|unit| (unit.position, unit.faction, unit.name.clone()))
    else {
        return Err(AbilityError::ActorNotFound(actor));
    };
    let tiles = open_neighbors(ctx.world, origin);
    let Some(&tile) = tiles.choose(ctx.rng) else {
        return Err(AbilityError::Blocked(origin));
    };

    let id = ctx.world.spawn(model, tile)?;
    if let Some(summoned) = ctx.unit_mut(id) {
        summoned.faction = faction;
        summoned.summoner = Some(actor);
    }

    ctx.frame(Frame::new(actor, Activity::Cast, Pacing::Long));
    ctx.sound(SoundCue::Spell);
    ctx.log(format!("{caster} summons a {model}"));
    tracing::debug!(caster = %actor, summoned = %id, model, "summoned");
    Ok(())
}

fn open_neighbors(world: &World, origin: Position) -> Vec<Position> {
    origin
        .neighbors()
        .filter(|&tile| world.map.is_open(tile))
        .collect()
}
