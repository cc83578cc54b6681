//! Turning a behavior into a concrete order.

use rand::seq::SliceRandom;

use crate::ability::{self, AbilityKind};
use crate::ai::Behavior;
use crate::context::WorldContext;
use crate::geometry::Position;
use crate::order::Order;
use crate::path::find_path;
use crate::state::UnitId;

/// Minimum distance a teleport has to put between the unit and its threat.
const SAFE_TELEPORT_DISTANCE: u32 = 3;

pub fn order_for(ctx: &mut WorldContext<'_>, unit: UnitId, behavior: Behavior) -> Order {
    let order = match behavior {
        Behavior::Stay => Some(Order::Stay),
        Behavior::Attack { target } => attack(ctx, unit, target),
        Behavior::Shoot { target, ability } => ctx.unit(target).map(|t| Order::Ability {
            kind: ability,
            target: Some(t.position),
        }),
        Behavior::Avoid { threat } => avoid(ctx, unit, threat),
        Behavior::Wander => wander(ctx, unit),
    };
    order.unwrap_or_else(|| {
        tracing::warn!(unit = %unit, ?behavior, "no valid order, staying");
        Order::Stay
    })
}

/// Melee when adjacent, otherwise take the next step along a path.
fn attack(ctx: &mut WorldContext<'_>, unit: UnitId, target: UnitId) -> Option<Order> {
    let origin = ctx.unit(unit)?.position;
    let goal = ctx.unit(target)?.position;

    if origin.is_adjacent(goal) {
        let specials: Vec<AbilityKind> = ctx
            .unit(unit)?
            .abilities
            .iter()
            .copied()
            .filter(|kind| kind.is_special_attack())
            .filter(|&kind| {
                ability::check(ctx.world, ctx.config, unit, kind, Some(goal)).is_ok()
            })
            .collect();
        let kind = specials
            .choose(ctx.rng)
            .copied()
            .unwrap_or(AbilityKind::Attack);
        return Some(Order::Ability {
            kind,
            target: Some(goal),
        });
    }

    // The target's own tile counts as walkable so the path can end there.
    let mut walkable = ctx.world.map.open_tiles();
    walkable.insert(goal);
    let path = find_path(origin, goal, &walkable, ctx.rng);
    let next = *path.get(1)?;
    Some(Order::AttackMove {
        to: next,
        ability: AbilityKind::Attack,
    })
}

/// Steps to the neighbour farthest from `threat`, or teleports well away.
fn avoid(ctx: &mut WorldContext<'_>, unit: UnitId, threat: UnitId) -> Option<Order> {
    let me = ctx.unit(unit)?;
    let origin = me.position;
    let danger = ctx.unit(threat)?.position;

    if me.knows(AbilityKind::Teleport) && me.can_afford(AbilityKind::Teleport.mana_cost()) {
        let range = ctx.config.teleport_range as i32;
        let best = (-range..=range)
            .flat_map(|dy| (-range..=range).map(move |dx| (dx, dy)))
            .map(|(dx, dy)| Position::new(origin.x + dx, origin.y + dy))
            .filter(|&tile| origin.manhattan(tile) <= ctx.config.teleport_range)
            .filter(|&tile| tile != origin && ctx.world.map.is_open(tile))
            .max_by_key(|&tile| (tile.manhattan(danger), std::cmp::Reverse(tile)));
        if let Some(tile) = best.filter(|&tile| tile.manhattan(danger) >= SAFE_TELEPORT_DISTANCE) {
            return Some(Order::Ability {
                kind: AbilityKind::Teleport,
                target: Some(tile),
            });
        }
    }

    let candidates: Vec<Position> = origin
        .neighbors()
        .filter(|&tile| ctx.world.map.is_open(tile) || tile == danger)
        .collect();
    let farthest = candidates.iter().map(|tile| tile.manhattan(danger)).max()?;
    let best: Vec<Position> = candidates
        .into_iter()
        .filter(|tile| tile.manhattan(danger) == farthest)
        .collect();
    let to = *best.choose(ctx.rng)?;
    Some(Order::AttackMove {
        to,
        ability: AbilityKind::Attack,
    })
}

/// A random open neighbour, approached with an attack-move.
fn wander(ctx: &mut WorldContext<'_>, unit: UnitId) -> Option<Order> {
    let origin = ctx.unit(unit)?.position;
    let open: Vec<Position> = origin
        .neighbors()
        .filter(|&tile| ctx.world.map.is_open(tile))
        .collect();
    let to = *open.choose(ctx.rng)?;
    Some(Order::AttackMove {
        to,
        ability: AbilityKind::Attack,
    })
}
