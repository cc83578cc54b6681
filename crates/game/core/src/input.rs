//! Player input.
//!
//! Commands arrive from the frontend as [`PlayerCommand`]s, are validated
//! against the current world and become [`Order`]s. A command that fails
//! validation plays the Blocked cue and is dropped; the player keeps the turn.
//! If nothing legal is left in the queue the scheduler waits for more input.

use std::collections::VecDeque;

use crate::ability::AbilityKind;
use crate::config::GameConfig;
use crate::context::WorldContext;
use crate::event::SoundCue;
use crate::geometry::{Direction, Position};
use crate::order::{Order, OrderError};
use crate::state::{UnitId, World};
use crate::turn::Controller;

/// A raw request from the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerCommand {
    Stay,
    /// Walk one tile, attacking or interacting with whatever is there.
    Step(Direction),
    FastMove(Direction),
    UseAbility {
        ability: AbilityKind,
        target: Option<Position>,
    },
}

/// Turns a command into an order, checking it is legal right now.
pub fn validate(
    world: &World,
    config: &GameConfig,
    actor: UnitId,
    command: PlayerCommand,
) -> Result<Order, OrderError> {
    let origin = world
        .unit(actor)
        .ok_or(OrderError::ActorNotFound(actor))?
        .position;
    let order = match command {
        PlayerCommand::Stay => Order::Stay,
        PlayerCommand::Step(direction) => Order::AttackMove {
            to: origin.step(direction),
            ability: AbilityKind::Attack,
        },
        PlayerCommand::FastMove(direction) => Order::FastMove(direction),
        PlayerCommand::UseAbility { ability, target } => Order::Ability {
            kind: ability,
            target,
        },
    };
    order.check(world, config, actor)?;
    Ok(order)
}

/// Queue of pending player commands.
///
/// An empty queue means the player stays. A queue emptied by rejections
/// means the turn waits.
#[derive(Clone, Debug, Default)]
pub struct PlayerInput {
    queue: VecDeque<PlayerCommand>,
    rejected: usize,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PlayerCommand) {
        self.queue.push_back(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.queue.extend(commands);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of commands dropped because they were illegal when their turn came.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    fn reject(
        &mut self,
        ctx: &mut WorldContext<'_>,
        unit: UnitId,
        command: PlayerCommand,
        error: OrderError,
    ) {
        tracing::debug!(unit = %unit, ?command, %error, "command rejected");
        self.rejected += 1;
        ctx.sound(SoundCue::Blocked);
    }
}

impl FromIterator<PlayerCommand> for PlayerInput {
    fn from_iter<I: IntoIterator<Item = PlayerCommand>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
            rejected: 0,
        }
    }
}

impl Controller for PlayerInput {
    /// Drops illegal commands from the front of the queue. Not ready when
    /// that left the queue empty.
    fn ready(&mut self, ctx: &mut WorldContext<'_>, unit: UnitId) -> bool {
        let rejected = self.rejected;
        while let Some(&command) = self.queue.front() {
            match validate(ctx.world, ctx.config, unit, command) {
                Ok(_) => return true,
                Err(error) => {
                    self.queue.pop_front();
                    self.reject(ctx, unit, command, error);
                }
            }
        }
        self.rejected == rejected
    }

    fn next_order(&mut self, ctx: &mut WorldContext<'_>, unit: UnitId) -> Order {
        while let Some(command) = self.queue.pop_front() {
            match validate(ctx.world, ctx.config, unit, command) {
                Ok(order) => return order,
                Err(error) => self.reject(ctx, unit, command, error),
            }
        }
        Order::Stay
    }

    fn skip(&mut self, _ctx: &mut WorldContext<'_>, unit: UnitId) {
        if let Some(command) = self.queue.pop_front() {
            tracing::debug!(unit = %unit, ?command, "command discarded, player cannot act");
        }
    }
}
