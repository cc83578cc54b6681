/// Game configuration constants and tunable balance parameters.
///
/// Capacity constants are compile-time; everything stored in the struct can
/// be overridden from a TOML file through `crawl-content::ConfigLoader`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Life regenerated per turn; fractions accumulate across turns.
    pub life_regen: f32,
    /// Mana regenerated per turn; fractions accumulate across turns.
    pub mana_regen: f32,

    /// Damage dealt by Burning at each tick.
    pub burn_damage: u32,
    /// When Burning ticks within a unit's turn slot.
    pub burn_timing: BurnTiming,

    /// A unit is "in combat" while its turns-since-combat counter is at most this.
    pub combat_recency_turns: u32,

    /// Probability that a slain non-player unit drops an item.
    pub item_drop_chance: f32,
    /// Probability (evaluated after a failed item roll) of dropping a globe.
    pub globe_drop_chance: f32,
    /// Life or mana restored by a globe.
    pub globe_restore: u32,

    pub progression: Progression,
    /// Experience needed for level `n + 1` is `experience_per_level * n * (n + 1) / 2`.
    pub experience_per_level: u32,
    /// Kills needed for level `n + 1` is `kills_per_level * n`.
    pub kills_per_level: u32,
    pub life_per_level: u32,
    pub mana_per_level: u32,

    pub dash_range: u32,
    pub blink_range: u32,
    pub teleport_range: u32,
    pub knockback_distance: u32,
    pub max_summons: usize,

    /// Upper bound of turn-exempt orders a controller may chain in one slot.
    pub max_free_actions: u32,
    /// Upper bound of steps for a single FastMove.
    pub fast_move_limit: u32,
    /// Radius of the player's revealed-tile computation.
    pub player_vision: u32,
}

/// When Burning damage is applied within a unit's turn slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BurnTiming {
    /// Regeneration at upkeep, burn after the unit acted.
    #[default]
    EndOfTurn,
    /// Burn during upkeep, before the unit acts.
    Upkeep,
}

/// What drives level-ups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Progression {
    /// Killers receive the victim's experience reward.
    #[default]
    Experience,
    /// Killers count lifetime kills.
    Kills,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// One ledger slot per status effect kind.
    pub const MAX_STATUS_EFFECTS: usize = 5;
    pub const MAX_ABILITIES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LIFE_REGEN: f32 = 0.05;
    pub const DEFAULT_MANA_REGEN: f32 = 0.2;
    pub const DEFAULT_BURN_DAMAGE: u32 = 1;
    pub const DEFAULT_COMBAT_RECENCY_TURNS: u32 = 10;

    pub fn new() -> Self {
        Self {
            life_regen: Self::DEFAULT_LIFE_REGEN,
            mana_regen: Self::DEFAULT_MANA_REGEN,
            burn_damage: Self::DEFAULT_BURN_DAMAGE,
            burn_timing: BurnTiming::EndOfTurn,
            combat_recency_turns: Self::DEFAULT_COMBAT_RECENCY_TURNS,
            item_drop_chance: 0.1,
            globe_drop_chance: 0.25,
            globe_restore: 5,
            progression: Progression::Experience,
            experience_per_level: 10,
            kills_per_level: 3,
            life_per_level: 4,
            mana_per_level: 2,
            dash_range: 3,
            blink_range: 3,
            teleport_range: 5,
            knockback_distance: 2,
            max_summons: 2,
            max_free_actions: 3,
            fast_move_limit: 20,
            player_vision: 6,
        }
    }

    /// Progress (experience or kills) required to leave `level`.
    ///
    /// `None` once the threshold no longer fits in a `u32`; that level is final.
    pub fn level_threshold(&self, level: u32) -> Option<u32> {
        match self.progression {
            Progression::Experience => {
                // n(n+1) is always even.
                let triangle = u64::from(level) * (u64::from(level) + 1) / 2;
                let threshold = u64::from(self.experience_per_level).checked_mul(triangle)?;
                u32::try_from(threshold).ok()
            }
            Progression::Kills => self.kills_per_level.checked_mul(level),
        }
    }

    /// A config with every random drop disabled; handy for exact assertions.
    pub fn without_drops(mut self) -> Self {
        self.item_drop_chance = 0.0;
        self.globe_drop_chance = 0.0;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_thresholds_are_cumulative() {
        let config = GameConfig::default();
        assert_eq!(config.level_threshold(1), Some(10));
        assert_eq!(config.level_threshold(2), Some(30));
        assert_eq!(config.level_threshold(3), Some(60));
    }

    #[test]
    fn kill_thresholds_are_linear() {
        let config = GameConfig {
            progression: Progression::Kills,
            ..GameConfig::default()
        };
        assert_eq!(config.level_threshold(1), Some(3));
        assert_eq!(config.level_threshold(4), Some(12));
    }

    #[test]
    fn oversized_thresholds_do_not_overflow() {
        let config = GameConfig {
            experience_per_level: u32::MAX,
            ..GameConfig::default()
        };
        assert_eq!(config.level_threshold(1), Some(u32::MAX));
        assert_eq!(config.level_threshold(2), None);
    }
}
