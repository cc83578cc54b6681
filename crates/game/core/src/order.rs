//! Orders: one concrete action per unit per turn slot.
//!
//! An order is produced by a controller and consumed by [`Order::execute`],
//! which takes it by value; a pending order is executed exactly once and is
//! gone afterwards.

use crate::ability::{self, AbilityError, AbilityKind};
use crate::combat;
use crate::config::GameConfig;
use crate::context::WorldContext;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::event::{Activity, Frame, Pacing, SoundCue};
use crate::geometry::{Direction, Position};
use crate::state::{Blockers, ItemCategory, MapError, MapObject, UnitId, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Do nothing this turn.
    Stay,
    /// Walk onto an adjacent open tile.
    Move(Position),
    Ability {
        kind: AbilityKind,
        target: Option<Position>,
    },
    /// Walk, or deal with whatever stands on the adjacent tile.
    AttackMove { to: Position, ability: AbilityKind },
    /// Keep walking in one direction until something is in the way.
    FastMove(Direction),
}

/// Result of a successfully executed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderOutcome {
    /// False for turn-exempt orders; the controller may act again.
    pub consumed_turn: bool,
}

impl OrderOutcome {
    const TURN: Self = Self {
        consumed_turn: true,
    };
    const FREE: Self = Self {
        consumed_turn: false,
    };
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("actor {0} not found")]
    ActorNotFound(UnitId),

    #[error("{0} is not adjacent")]
    NotAdjacent(Position),

    #[error("{0} is blocked")]
    Blocked(Position),

    #[error("the door at {0} is locked")]
    Locked(Position),

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Map(#[from] MapError),
}

impl GameError for OrderError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            OrderError::ActorNotFound(_) => ErrorSeverity::Validation,
            OrderError::NotAdjacent(_) | OrderError::Blocked(_) | OrderError::Locked(_) => {
                ErrorSeverity::Recoverable
            }
            OrderError::Ability(error) => error.severity(),
            OrderError::Map(error) => error.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            OrderError::Ability(error) => error.context(),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            OrderError::ActorNotFound(_) => "ORDER_ACTOR_NOT_FOUND",
            OrderError::NotAdjacent(_) => "ORDER_NOT_ADJACENT",
            OrderError::Blocked(_) => "ORDER_BLOCKED",
            OrderError::Locked(_) => "ORDER_LOCKED",
            OrderError::Ability(error) => error.error_code(),
            OrderError::Map(error) => error.error_code(),
        }
    }
}

/// What an attack-move resolves to, in fallback order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttackMoveStep {
    Walk,
    Strike,
    OpenDoor { locked: bool },
    PushBlock { beyond: Position },
    HitSpawner,
}

impl Order {
    /// Whether executing this order leaves the turn slot open.
    pub fn is_turn_exempt(&self) -> bool {
        matches!(self, Order::Ability { kind, .. } if kind.is_turn_exempt())
    }

    /// Legality check without side effects.
    pub fn check(&self, world: &World, config: &GameConfig, actor: UnitId) -> Result<(), OrderError> {
        let origin = world
            .unit(actor)
            .ok_or(OrderError::ActorNotFound(actor))?
            .position;
        match *self {
            Order::Stay => Ok(()),
            Order::Move(to) => check_step(world, origin, to),
            Order::Ability { kind, target } => {
                ability::check(world, config, actor, kind, target).map_err(OrderError::from)
            }
            Order::AttackMove { to, ability } => {
                attack_move_step(world, config, actor, origin, to, ability).map(|_| ())
            }
            Order::FastMove(direction) => check_step(world, origin, origin.step(direction)),
        }
    }

    /// Executes the order for `actor`.
    ///
    /// A failed order changes nothing; callers treat it like `Stay`.
    pub fn execute(
        self,
        ctx: &mut WorldContext<'_>,
        actor: UnitId,
    ) -> Result<OrderOutcome, OrderError> {
        tracing::debug!(actor = %actor, order = ?self, "executing order");
        match self {
            Order::Stay => Ok(OrderOutcome::TURN),
            Order::Move(to) => {
                walk(ctx, actor, to)?;
                Ok(OrderOutcome::TURN)
            }
            Order::Ability { kind, target } => {
                ability::use_ability(ctx, actor, kind, target)?;
                Ok(if kind.is_turn_exempt() {
                    OrderOutcome::FREE
                } else {
                    OrderOutcome::TURN
                })
            }
            Order::AttackMove { to, ability } => {
                attack_move(ctx, actor, to, ability)?;
                Ok(OrderOutcome::TURN)
            }
            Order::FastMove(direction) => {
                fast_move(ctx, actor, direction)?;
                Ok(OrderOutcome::TURN)
            }
        }
    }
}

fn check_step(world: &World, origin: Position, to: Position) -> Result<(), OrderError> {
    if !origin.is_adjacent(to) {
        return Err(OrderError::NotAdjacent(to));
    }
    if !world.map.is_open(to) {
        return Err(OrderError::Blocked(to));
    }
    Ok(())
}

/// Moves one tile, turning to face the step.
fn walk(ctx: &mut WorldContext<'_>, actor: UnitId, to: Position) -> Result<(), OrderError> {
    let origin = ctx
        .unit(actor)
        .ok_or(OrderError::ActorNotFound(actor))?
        .position;
    check_step(ctx.world, origin, to)?;
    ctx.world.map.move_unit(actor, to)?;
    if let (Some(unit), Some(facing)) = (ctx.world.unit_mut(actor), origin.direction_to(to)) {
        unit.facing = facing;
    }
    ctx.frame(Frame::new(actor, Activity::Walk, Pacing::Short));
    ctx.sound(SoundCue::Footstep);
    combat::collect_pickups(ctx, actor);
    Ok(())
}

/// The attack-move fallback chain: walk, strike a unit, open a door, push a
/// block, hit a spawner. The first rule that applies wins.
fn attack_move_step(
    world: &World,
    config: &GameConfig,
    actor: UnitId,
    origin: Position,
    to: Position,
    ability: AbilityKind,
) -> Result<AttackMoveStep, OrderError> {
    if !origin.is_adjacent(to) {
        return Err(OrderError::NotAdjacent(to));
    }
    let blockers = world.map.blockers(to);

    if blockers.is_empty() {
        return Ok(AttackMoveStep::Walk);
    }
    if blockers.contains(Blockers::UNIT) {
        ability::check(world, config, actor, ability, Some(to))?;
        return Ok(AttackMoveStep::Strike);
    }
    if blockers.intersects(Blockers::OUT_OF_BOUNDS | Blockers::WALL) {
        return Err(OrderError::Blocked(to));
    }
    if blockers.contains(Blockers::DOOR) {
        let locked = world
            .map
            .objects_at(to)
            .iter()
            .any(|object| matches!(object, MapObject::Door(door) if door.locked));
        let has_key = world
            .unit(actor)
            .is_some_and(|unit| unit.inventory.count(ItemCategory::Key) > 0);
        if locked && !has_key {
            return Err(OrderError::Locked(to));
        }
        return Ok(AttackMoveStep::OpenDoor { locked });
    }
    if blockers.contains(Blockers::BLOCK) {
        let direction = origin
            .direction_to(to)
            .ok_or(OrderError::NotAdjacent(to))?;
        let beyond = to.step(direction);
        if !world.map.is_open(beyond) {
            return Err(OrderError::Blocked(beyond));
        }
        return Ok(AttackMoveStep::PushBlock { beyond });
    }
    if blockers.contains(Blockers::SPAWNER) {
        return Ok(AttackMoveStep::HitSpawner);
    }
    Err(OrderError::Blocked(to))
}

fn attack_move(
    ctx: &mut WorldContext<'_>,
    actor: UnitId,
    to: Position,
    ability: AbilityKind,
) -> Result<(), OrderError> {
    let (origin, name) = ctx
        .unit(actor)
        .map(|unit| (unit.position, unit.name.clone()))
        .ok_or(OrderError::ActorNotFound(actor))?;

    match attack_move_step(ctx.world, ctx.config, actor, origin, to, ability)? {
        AttackMoveStep::Walk => walk(ctx, actor, to)?,
        AttackMoveStep::Strike => ability::use_ability(ctx, actor, ability, Some(to))?,
        AttackMoveStep::OpenDoor { locked } => {
            if locked {
                if let Some(unit) = ctx.unit_mut(actor) {
                    unit.inventory.remove(ItemCategory::Key);
                }
            }
            if let Some(door) = ctx.world.map.door_mut(to) {
                door.locked = false;
                door.open = true;
            }
            ctx.sound(SoundCue::OpenDoor);
            ctx.log(if locked {
                format!("{name} unlocks the door")
            } else {
                format!("{name} opens the door")
            });
        }
        AttackMoveStep::PushBlock { beyond } => {
            ctx.world.map.take_block(to);
            ctx.world
                .map
                .add_object(beyond, MapObject::Block);
            walk(ctx, actor, to)?;
        }
        AttackMoveStep::HitSpawner => {
            let damage = ctx.unit(actor).map_or(0, |unit| unit.melee_damage());
            ctx.frame(Frame::new(actor, Activity::Attack, Pacing::Short));
            combat::damage_object(ctx, to, damage, Some(actor));
        }
    }
    Ok(())
}

/// Repeats single steps until the way is blocked, something was picked up
/// or a hostile unit is adjacent.
fn fast_move(
    ctx: &mut WorldContext<'_>,
    actor: UnitId,
    direction: Direction,
) -> Result<(), OrderError> {
    let mut steps = 0;
    while steps < ctx.config.fast_move_limit {
        let Some(position) = ctx.unit(actor).map(|unit| unit.position) else {
            break;
        };
        let next = position.step(direction);
        if !ctx.world.map.is_open(next) {
            break;
        }
        let had_pickups = ctx.world.map.objects_at(next).iter().any(|o| o.is_pickup());
        walk(ctx, actor, next)?;
        steps += 1;
        if had_pickups || hostile_adjacent(ctx.world, actor) {
            break;
        }
    }
    if steps == 0 {
        let position = ctx.unit(actor).map_or(Position::ORIGIN, |unit| unit.position);
        return Err(OrderError::Blocked(position.step(direction)));
    }
    Ok(())
}

fn hostile_adjacent(world: &World, actor: UnitId) -> bool {
    let Some(unit) = world.unit(actor) else {
        return false;
    };
    unit.position
        .neighbors()
        .filter_map(|tile| world.map.unit_at(tile))
        .filter_map(|id| world.unit(id))
        .any(|other| unit.is_hostile_to(other))
}
