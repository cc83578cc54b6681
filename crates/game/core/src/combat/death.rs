//! Death pipeline, rewards and level-ups.

use crate::combat::loot;
use crate::config::{GameConfig, Progression};
use crate::context::WorldContext;
use crate::event::SoundCue;
use crate::state::{Unit, UnitId};

/// Takes a dead unit off the map and settles the consequences.
///
/// Runs at most once per unit: the unit is removed first, and a unit that is
/// no longer on the map is ignored. The player's death ends the game without
/// rewards. Anyone else may drop loot and rewards `killer`.
pub fn kill(ctx: &mut WorldContext<'_>, victim: UnitId, killer: Option<UnitId>) {
    let Some(dead) = ctx.world.map.remove_unit(victim) else {
        return;
    };

    if ctx.world.is_player(victim) {
        ctx.world.game_over = true;
        ctx.log(format!("{} has fallen", dead.name));
        tracing::info!(unit = %victim, turn = ctx.world.turn, "player died, game over");
        return;
    }

    ctx.sound(SoundCue::Death);
    ctx.log(format!("{} dies", dead.name));
    tracing::info!(unit = %victim, name = %dead.name, killer = ?killer, "unit died");

    loot::drop_loot(ctx, &dead);

    if let Some(killer) = killer {
        reward(ctx, killer, &dead);
    }
}

/// Credits `killer` with the kill and levels it up as often as earned.
fn reward(ctx: &mut WorldContext<'_>, killer: UnitId, victim: &Unit) {
    let config = ctx.config;
    let Some(unit) = ctx.world.unit_mut(killer) else {
        return;
    };
    unit.kills = unit.kills.saturating_add(1);
    unit.experience = unit.experience.saturating_add(victim.reward);

    let mut gained = Vec::new();
    loop {
        let Some(threshold) = config.level_threshold(unit.level) else {
            break;
        };
        if threshold == 0 || progress(unit, config) < threshold {
            break;
        }
        level_up(unit, config);
        gained.push((unit.name.clone(), unit.level));
    }

    for (name, level) in gained {
        ctx.sound(SoundCue::LevelUp);
        ctx.log(format!("{name} reaches level {level}"));
        tracing::info!(unit = %killer, level, "level up");
    }
}

fn progress(unit: &Unit, config: &GameConfig) -> u32 {
    match config.progression {
        Progression::Experience => unit.experience,
        Progression::Kills => unit.kills,
    }
}

/// One level: tougher, stronger, and fully healed.
pub fn level_up(unit: &mut Unit, config: &GameConfig) {
    unit.level = unit.level.saturating_add(1);
    unit.life.maximum = unit.life.maximum.saturating_add(config.life_per_level);
    unit.mana.maximum = unit.mana.maximum.saturating_add(config.mana_per_level);
    unit.strength = unit.strength.saturating_add(1);
    unit.life.current = unit.life.maximum;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::state::{Faction, ResourceMeter};

    #[test]
    fn level_up_refills_life() {
        let config = GameConfig::default();
        let mut unit = Unit::new(UnitId(1), "hero", Faction::Player, Position::ORIGIN);
        unit.life = ResourceMeter::new(2, 10);
        unit.mana = ResourceMeter::new(1, 4);

        level_up(&mut unit, &config);
        assert_eq!(unit.level, 2);
        assert_eq!(unit.life.current, 14);
        assert_eq!(unit.life.maximum, 14);
        assert_eq!(unit.mana.maximum, 6);
        assert_eq!(unit.mana.current, 1);
        assert_eq!(unit.strength, 2);
    }
}
