//! Turn scheduler.
//!
//! One call to [`TurnScheduler::play_turn`] resolves one global turn: every
//! living unit gets exactly one slot, the player first, then map objects
//! update, the player's view is refreshed and the turn counter advances.
//!
//! Within a unit's slot:
//!
//! ```text
//! upkeep (regeneration, combat recency)  [+ burn when BurnTiming::Upkeep]
//! if alive and able: controller -> order -> execute  (free orders repeat)
//! [burn when BurnTiming::EndOfTurn]
//! status effects count down
//! ```

use std::collections::BTreeSet;

use rand::seq::SliceRandom;

use crate::ai::AiController;
use crate::combat;
use crate::config::BurnTiming;
use crate::context::WorldContext;
use crate::error::GameError;
use crate::geometry::{Position, line};
use crate::order::{Order, OrderError};
use crate::state::{StatusEffectKind, UnitId};

/// Source of orders for a unit.
pub trait Controller {
    /// Whether an order is available for `unit` right now.
    ///
    /// A player controller whose queued input was all rejected answers
    /// `false`; the scheduler then waits instead of resolving the turn.
    fn ready(&mut self, _ctx: &mut WorldContext<'_>, _unit: UnitId) -> bool {
        true
    }

    /// Produces the next order for `unit`. Called at most once per order.
    fn next_order(&mut self, ctx: &mut WorldContext<'_>, unit: UnitId) -> Order;

    /// Called instead of [`Controller::next_order`] when `unit` is frozen or
    /// stunned and loses its slot.
    fn skip(&mut self, _ctx: &mut WorldContext<'_>, _unit: UnitId) {}
}

/// What happened during one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: u64,
    /// Units that were asked for an order, in resolution order.
    pub acted: Vec<UnitId>,
    /// Units that were on the map at the start of the turn and are gone now.
    pub deaths: Vec<UnitId>,
    pub game_over: bool,
    /// The player had no legal order; nothing was resolved.
    pub awaiting_input: bool,
}

/// Drives whole turns.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnScheduler {
    ai: AiController,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one global turn.
    ///
    /// `player` supplies the player unit's orders; every other unit is driven
    /// by the AI. Nothing happens once the game is over, or while an able
    /// player has no legal order.
    pub fn play_turn(
        &mut self,
        ctx: &mut WorldContext<'_>,
        player: &mut dyn Controller,
    ) -> TurnReport {
        let turn = ctx.world.turn;
        if ctx.world.game_over {
            return TurnReport {
                turn,
                game_over: true,
                ..TurnReport::default()
            };
        }
        if let Some(hero) = ctx.world.player_id() {
            let can_act = ctx.unit(hero).is_some_and(|unit| unit.can_act());
            if can_act && !player.ready(ctx, hero) {
                tracing::debug!(turn, "waiting for player input");
                return TurnReport {
                    turn,
                    awaiting_input: true,
                    ..TurnReport::default()
                };
            }
        }

        ctx.world.in_progress = true;
        let _span = tracing::debug_span!("turn", turn).entered();

        let mut queue: Vec<UnitId> = ctx
            .world
            .map
            .units()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.id)
            .collect();
        let present: BTreeSet<UnitId> = queue.iter().copied().collect();
        // Stable: everyone else keeps their relative order.
        queue.sort_by_key(|&id| !ctx.world.is_player(id));

        let mut acted = Vec::new();
        for id in queue {
            if ctx.world.game_over {
                break;
            }
            if self.play_slot(ctx, id, player) {
                acted.push(id);
            }
        }

        if !ctx.world.game_over {
            update_spawners(ctx);
            reveal_around_player(ctx);
        }

        let deaths = present
            .into_iter()
            .filter(|&id| ctx.world.unit(id).is_none())
            .collect();
        ctx.world.turn += 1;
        ctx.world.in_progress = false;

        TurnReport {
            turn,
            acted,
            deaths,
            game_over: ctx.world.game_over,
            awaiting_input: false,
        }
    }

    /// One unit's slot. Returns whether the controller was consulted.
    fn play_slot(
        &mut self,
        ctx: &mut WorldContext<'_>,
        id: UnitId,
        player: &mut dyn Controller,
    ) -> bool {
        let config = ctx.config;
        let Some(unit) = ctx.world.unit_mut(id) else {
            return false;
        };
        unit.upkeep(config);

        if config.burn_timing == BurnTiming::Upkeep {
            burn(ctx, id);
        }
        let Some(can_act) = ctx.unit(id).map(|unit| unit.can_act()) else {
            return false;
        };

        let is_player = ctx.world.is_player(id);
        let controller: &mut dyn Controller = if is_player { player } else { &mut self.ai };

        if can_act {
            run_controller(ctx, id, controller);
        } else {
            tracing::debug!(unit = %id, "cannot act, slot skipped");
            controller.skip(ctx, id);
        }

        if config.burn_timing == BurnTiming::EndOfTurn {
            burn(ctx, id);
        }
        if let Some(unit) = ctx.world.unit_mut(id) {
            unit.effects.decrement_all();
        }
        can_act
    }
}

/// Asks for orders until one consumes the turn, `max_free_actions` free
/// orders have been spent or the unit can no longer act.
fn run_controller(ctx: &mut WorldContext<'_>, id: UnitId, controller: &mut dyn Controller) {
    let mut free_actions = 0;
    loop {
        if !controller.ready(ctx, id) {
            tracing::debug!(unit = %id, "no order available, slot ends");
            break;
        }
        let order = controller.next_order(ctx, id);
        let consumed = match order.execute(ctx, id) {
            Ok(outcome) => outcome.consumed_turn,
            Err(error) => {
                report(&error, id, order);
                true
            }
        };
        if consumed {
            break;
        }
        free_actions += 1;
        if free_actions >= ctx.config.max_free_actions
            || ctx.world.game_over
            || ctx.world.unit(id).is_none_or(|unit| !unit.can_act())
        {
            break;
        }
    }
}

fn report(error: &OrderError, id: UnitId, order: Order) {
    let severity = error.severity();
    if severity.is_internal() {
        tracing::error!(
            unit = %id,
            ?order,
            code = error.error_code(),
            severity = severity.as_str(),
            context = ?error.context(),
            "order aborted: {error}"
        );
    } else {
        tracing::warn!(unit = %id, ?order, code = error.error_code(), "order failed, staying: {error}");
    }
}

fn burn(ctx: &mut WorldContext<'_>, id: UnitId) {
    let burning = ctx
        .unit(id)
        .is_some_and(|unit| unit.effects.has(StatusEffectKind::Burning));
    if burning {
        combat::deal_damage(ctx, ctx.config.burn_damage, None, id);
    }
}

/// Standing spawners count down and produce a unit when due.
fn update_spawners(ctx: &mut WorldContext<'_>) {
    for position in ctx.world.map.object_positions() {
        let due = {
            let living: Vec<UnitId> = ctx.world.map.unit_ids();
            let Some(spawner) = ctx.world.map.spawner_mut(position) else {
                continue;
            };
            if !spawner.is_blocking() {
                continue;
            }
            spawner.spawned.retain(|id| living.contains(id));
            spawner.countdown = spawner.countdown.saturating_sub(1);
            if spawner.countdown > 0 {
                continue;
            }
            spawner.countdown = spawner.interval.max(1);
            (spawner.spawned.len() < spawner.max_alive).then(|| spawner.model.clone())
        };
        let Some(model) = due else {
            continue;
        };

        let open: Vec<Position> = position
            .neighbors()
            .filter(|&tile| ctx.world.map.is_open(tile))
            .collect();
        let Some(&tile) = open.choose(ctx.rng) else {
            continue;
        };
        match ctx.world.spawn(&model, tile) {
            Ok(id) => {
                if let Some(spawner) = ctx.world.map.spawner_mut(position) {
                    spawner.spawned.push(id);
                }
                tracing::debug!(%position, unit = %id, model = %model, "spawner produced a unit");
            }
            Err(error) => tracing::warn!(%position, model = %model, %error, "spawner failed"),
        }
    }
}

/// Marks every tile within the player's vision radius that is in line of
/// sight as revealed.
fn reveal_around_player(ctx: &mut WorldContext<'_>) {
    let Some(origin) = ctx.world.player().map(|player| player.position) else {
        return;
    };
    let radius = ctx.config.player_vision as i32;
    let map = &mut ctx.world.map;
    map.reveal(origin);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let tile = Position::new(origin.x + dx, origin.y + dy);
            if !map.contains(tile) || origin.euclidean(tile) > radius as f32 {
                continue;
            }
            let path = line(origin, tile);
            let visible = path
                .iter()
                .take(path.len().saturating_sub(1))
                .all(|&step| !map.blocks_sight(step));
            if visible {
                map.reveal(tile);
            }
        }
    }
}
