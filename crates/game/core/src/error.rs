//! Common error infrastructure for crawl-core.
//!
//! Domain-specific errors (`AbilityError`, `OrderError`, `MapError`,
//! `ManaError`) live next to the code that raises them and implement
//! [`GameError`] so callers can decide how loudly to fail.
//!
//! Three classes of outcome exist in the turn core:
//!
//! - **Precondition violations** ([`ErrorSeverity::Fatal`]): a caller broke a
//!   contract (targeted ability without a target, teleport beyond range,
//!   overspending mana). The current action is aborted and the turn goes on.
//! - **Legality failures** ([`ErrorSeverity::Recoverable`]): not enough mana,
//!   missing equipment, blocked tile. Player input turns these into a
//!   "blocked" cue; AI falls back to staying put.
//! - **Expected absence** (no path, nothing in line of sight) is not an error
//!   at all and is modelled with empty collections or `Option`.

use crate::geometry::Position;
use crate::state::UnitId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The action is illegal right now but may be legal later or elsewhere.
    ///
    /// Examples: insufficient mana, destination blocked, no target in line
    Recoverable,

    /// Invalid input referencing something that does not exist.
    ///
    /// Examples: unknown unit id, unknown summon model
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    ///
    /// Examples: occupancy desync between unit and map
    Internal,

    /// Caller-side contract violation that must never happen in correct code.
    ///
    /// Examples: missing target for a targeted ability, teleport beyond range
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// True for severities that point at a bug rather than at game state.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    pub actor: Option<UnitId>,
    pub position: Option<Position>,
    /// Global turn counter at the time of the error.
    pub turn: u64,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(turn: u64) -> Self {
        Self {
            actor: None,
            position: None,
            turn,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: UnitId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all crawl-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Static identifier for the error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
