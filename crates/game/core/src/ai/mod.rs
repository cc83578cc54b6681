//! AI controllers.
//!
//! Decision making is split in two stages:
//!
//! 1. [`BehaviorSelector`] maps the unit's situation to a [`Behavior`]
//! 2. [`tactics::order_for`] turns that behavior into a concrete [`Order`]
//!
//! Both stages read the world through the [`WorldContext`] and draw every
//! random choice from its injected RNG, so a seeded RNG replays decisions
//! exactly.
mod behavior;
pub mod tactics;

pub use behavior::{Behavior, BehaviorSelector, nearest_hostile};

use crate::context::WorldContext;
use crate::order::Order;
use crate::state::{AiParameters, UnitId};
use crate::turn::Controller;

/// Controller for every non-player unit.
///
/// Stateless: each unit's parameters are read from the unit itself. An
/// explicit parameter set overrides that, which lets the same controller
/// drive the player unit on autopilot.
#[derive(Clone, Copy, Debug, Default)]
pub struct AiController {
    overrides: Option<AiParameters>,
}

impl AiController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: AiParameters) -> Self {
        Self {
            overrides: Some(params),
        }
    }

    /// Runs the decision tree for `unit`.
    pub fn decide(&self, ctx: &mut WorldContext<'_>, unit: UnitId) -> Behavior {
        let params = self
            .overrides
            .or_else(|| ctx.unit(unit).and_then(|u| u.ai));
        match params {
            Some(params) => BehaviorSelector::select(ctx, unit, &params),
            None => Behavior::Stay,
        }
    }
}

impl Controller for AiController {
    fn next_order(&mut self, ctx: &mut WorldContext<'_>, unit: UnitId) -> Order {
        let behavior = self.decide(ctx, unit);
        tactics::order_for(ctx, unit, behavior)
    }
}
