//! Status effect ledger for units.
//!
//! Effects count down in whole turns of the unit that carries them: the turn
//! scheduler calls [`StatusEffects::decrement_all`] once at the end of each of
//! the unit's turn slots and entries reaching zero are pruned. Re-applying a
//! kind resets its remaining duration; effects of the same kind never stack.

use arrayvec::ArrayVec;
use strum::{EnumIter, IntoStaticStr};

use crate::config::GameConfig;

/// Active status effects on a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Turns left, counted in the carrier's own turns.
    pub remaining: u32,
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusEffectKind {
    /// Visual hit flash.
    Damaged,
    /// Takes fixed damage at each tick.
    Burning,
    /// Cannot act; shattered by any incoming damage.
    Frozen,
    /// Cannot act.
    Stunned,
    /// Visual marker left by chain lightning.
    Shocked,
}

impl StatusEffectKind {
    /// True for effects that take the carrier's turn away.
    pub const fn prevents_action(self) -> bool {
        matches!(self, Self::Frozen | Self::Stunned)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Remaining turns of `kind`, if active.
    pub fn remaining(&self, kind: StatusEffectKind) -> Option<u32> {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.remaining)
    }

    /// Adds an effect or resets the duration of an existing one.
    ///
    /// A zero duration removes the effect.
    pub fn add(&mut self, kind: StatusEffectKind, duration: u32) {
        if duration == 0 {
            self.remove(kind);
            return;
        }
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = duration;
            return;
        }
        // One slot per kind, so the ledger cannot overflow.
        self.effects.push(StatusEffect {
            kind,
            remaining: duration,
        });
    }

    /// Removes `kind`, returning whether it was active.
    pub fn remove(&mut self, kind: StatusEffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Counts every effect down by one turn and prunes expired entries.
    pub fn decrement_all(&mut self) {
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
        }
        self.effects.retain(|e| e.remaining > 0);
    }

    /// A unit can act unless it is Frozen or Stunned.
    pub fn can_act(&self) -> bool {
        !self.effects.iter().any(|e| e.kind.prevents_action())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn reapplying_resets_duration() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffectKind::Burning, 3);
        effects.decrement_all();
        assert_eq!(effects.remaining(StatusEffectKind::Burning), Some(2));

        effects.add(StatusEffectKind::Burning, 3);
        assert_eq!(effects.remaining(StatusEffectKind::Burning), Some(3));
        assert_eq!(effects.iter().count(), 1);
    }

    #[test]
    fn reapplying_shorter_duration_still_resets() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffectKind::Stunned, 4);
        effects.add(StatusEffectKind::Stunned, 1);
        assert_eq!(effects.remaining(StatusEffectKind::Stunned), Some(1));
    }

    #[test]
    fn decrement_prunes_expired() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffectKind::Damaged, 1);
        effects.add(StatusEffectKind::Frozen, 2);

        effects.decrement_all();
        assert!(!effects.has(StatusEffectKind::Damaged));
        assert!(effects.has(StatusEffectKind::Frozen));

        effects.decrement_all();
        assert!(effects.is_empty());
    }

    #[test]
    fn frozen_and_stunned_block_action() {
        let mut effects = StatusEffects::empty();
        assert!(effects.can_act());

        effects.add(StatusEffectKind::Burning, 2);
        effects.add(StatusEffectKind::Shocked, 1);
        assert!(effects.can_act());

        effects.add(StatusEffectKind::Frozen, 2);
        assert!(!effects.can_act());
        assert!(effects.remove(StatusEffectKind::Frozen));
        assert!(effects.can_act());

        effects.add(StatusEffectKind::Stunned, 1);
        assert!(!effects.can_act());
    }

    #[test]
    fn every_kind_fits_at_once() {
        let mut effects = StatusEffects::empty();
        for kind in StatusEffectKind::iter() {
            effects.add(kind, 2);
        }
        for kind in StatusEffectKind::iter() {
            assert!(effects.has(kind), "{} missing", kind.as_str());
        }
    }
}
