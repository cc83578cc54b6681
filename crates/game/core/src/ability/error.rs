//! Ability errors.
//!
//! Legality failures are [`ErrorSeverity::Recoverable`]: the game state simply
//! does not allow the ability right now. Contract violations by the caller
//! (no target for a targeted ability, teleporting beyond range, overspending
//! mana) are [`ErrorSeverity::Fatal`].

use crate::ability::AbilityKind;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::factory::SpawnError;
use crate::geometry::Position;
use crate::state::{ManaError, UnitId};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AbilityError {
    // ========================================================================
    // Precondition violations
    // ========================================================================
    /// A targeted ability was invoked without a target.
    #[error("{ability} requires a target")]
    MissingTarget {
        ability: AbilityKind,
        context: ErrorContext,
    },

    /// Teleport destination beyond the allowed Manhattan range.
    #[error("{ability} target {target} is {distance} tiles away (range {range})")]
    OutOfRange {
        ability: AbilityKind,
        target: Position,
        distance: u32,
        range: u32,
        context: ErrorContext,
    },

    #[error(transparent)]
    Mana(#[from] ManaError),

    // ========================================================================
    // Validation
    // ========================================================================
    #[error("actor {0} not found")]
    ActorNotFound(UnitId),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    // ========================================================================
    // Legality
    // ========================================================================
    #[error("{0} is not known")]
    NotKnown(AbilityKind),

    #[error("{ability} costs {cost} mana, only {available} available")]
    InsufficientMana {
        ability: AbilityKind,
        cost: u32,
        available: u32,
    },

    #[error("actor cannot act")]
    CannotAct,

    #[error("{0} is not adjacent")]
    NotAdjacent(Position),

    /// Nothing to affect at the target or along the line.
    #[error("no target for {0}")]
    NoTarget(AbilityKind),

    #[error("{0} is blocked")]
    Blocked(Position),

    #[error("{0} needs a ranged weapon")]
    MissingEquipment(AbilityKind),

    #[error("summon limit of {0} reached")]
    SummonLimit(usize),

    #[error("no summon class")]
    NoSummonClass,
}

impl AbilityError {
    pub fn missing_target(ability: AbilityKind, actor: UnitId, turn: u64) -> Self {
        Self::MissingTarget {
            ability,
            context: ErrorContext::new(turn)
                .with_actor(actor)
                .with_message("targeted ability invoked without target"),
        }
    }

    pub fn out_of_range(
        ability: AbilityKind,
        actor: UnitId,
        origin: Position,
        target: Position,
        range: u32,
        turn: u64,
    ) -> Self {
        Self::OutOfRange {
            ability,
            target,
            distance: origin.manhattan(target),
            range,
            context: ErrorContext::new(turn)
                .with_actor(actor)
                .with_position(target),
        }
    }
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        use AbilityError::*;
        match self {
            MissingTarget { .. } | OutOfRange { .. } => ErrorSeverity::Fatal,
            Mana(error) => error.severity(),
            ActorNotFound(_) => ErrorSeverity::Validation,
            Spawn(error) => error.severity(),
            NotKnown(_) | InsufficientMana { .. } | CannotAct | NotAdjacent(_) | NoTarget(_)
            | Blocked(_) | MissingEquipment(_) | SummonLimit(_) | NoSummonClass => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::MissingTarget { context, .. } | Self::OutOfRange { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use AbilityError::*;
        match self {
            MissingTarget { .. } => "ABILITY_MISSING_TARGET",
            OutOfRange { .. } => "ABILITY_OUT_OF_RANGE",
            Mana(error) => error.error_code(),
            ActorNotFound(_) => "ABILITY_ACTOR_NOT_FOUND",
            Spawn(error) => error.error_code(),
            NotKnown(_) => "ABILITY_NOT_KNOWN",
            InsufficientMana { .. } => "ABILITY_INSUFFICIENT_MANA",
            CannotAct => "ABILITY_CANNOT_ACT",
            NotAdjacent(_) => "ABILITY_NOT_ADJACENT",
            NoTarget(_) => "ABILITY_NO_TARGET",
            Blocked(_) => "ABILITY_BLOCKED",
            MissingEquipment(_) => "ABILITY_MISSING_EQUIPMENT",
            SummonLimit(_) => "ABILITY_SUMMON_LIMIT",
            NoSummonClass => "ABILITY_NO_SUMMON_CLASS",
        }
    }
}
