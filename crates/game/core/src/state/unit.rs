//! Units: the combatants that take turns.

use std::fmt;

use arrayvec::ArrayVec;

use crate::ability::AbilityKind;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::{Direction, Position};
use crate::state::item::{Equipment, Inventory, Item};
use crate::state::status::{StatusEffectKind, StatusEffects};

/// Unique identifier for a unit. Ids are never reused within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allegiance of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    Player,
    Enemy,
    Neutral,
}

impl Faction {
    /// Player and Enemy are mutually hostile; Neutral fights nobody.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Player, Faction::Enemy) | (Faction::Enemy, Faction::Player)
        )
    }
}

/// Integer resource meter (life, mana) with a fractional regeneration
/// remainder carried from turn to turn.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
    /// Regeneration accumulated but not yet converted into whole points.
    pub remainder: f32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
            remainder: 0.0,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Adds `amount`, clamped to the maximum. Returns the amount actually gained.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.maximum);
        self.current - before
    }

    /// Subtracts `amount`, clamped at zero. Returns the amount actually lost.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current);
        self.current -= lost;
        lost
    }

    /// Accumulates fractional regeneration and converts whole points.
    ///
    /// A full meter does not bank regeneration.
    pub fn regenerate(&mut self, rate: f32) {
        if self.current >= self.maximum {
            self.remainder = 0.0;
            return;
        }
        self.remainder += rate.max(0.0);
        let whole = self.remainder.floor();
        if whole >= 1.0 {
            self.remainder -= whole;
            self.restore(whole as u32);
        }
    }

    /// `current / maximum`, or 1.0 for an empty maximum.
    pub fn ratio(&self) -> f32 {
        if self.maximum == 0 {
            1.0
        } else {
            self.current as f32 / self.maximum as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// Tuning for AI-controlled units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiParameters {
    /// Probability of engaging when not already in combat.
    pub aggressiveness: f32,
    /// Fraction of turns on which the unit acts.
    pub speed: f32,
    /// Euclidean radius within which the target is noticed.
    pub vision_range: f32,
    /// Life ratio below which the unit flees.
    pub flee_threshold: f32,
    /// Ranged controllers prefer shooting over closing in.
    pub ranged: bool,
}

impl AiParameters {
    /// Whether a unit with this speed acts on `turn`.
    ///
    /// The cadence is a pure function of the global turn counter:
    /// `floor(speed * turn) > floor(speed * (turn - 1))`.
    pub fn acts_on_turn(&self, turn: u64) -> bool {
        let speed = self.speed.clamp(0.0, 1.0) as f64;
        let now = (speed * turn as f64).floor();
        let before = (speed * (turn as f64 - 1.0)).floor();
        now > before
    }
}

impl Default for AiParameters {
    fn default() -> Self {
        Self {
            aggressiveness: 0.5,
            speed: 1.0,
            vision_range: 8.0,
            flee_threshold: 0.0,
            ranged: false,
        }
    }
}

/// Raised when spending more mana than a unit has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot spend {requested} mana with only {available} available")]
pub struct ManaError {
    pub requested: u32,
    pub available: u32,
}

impl GameError for ManaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        "MANA_INSUFFICIENT"
    }
}

/// A combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    /// Name of the model the unit was built from.
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    pub facing: Direction,

    pub life: ResourceMeter,
    pub mana: ResourceMeter,

    pub level: u32,
    pub experience: u32,
    pub kills: u32,
    /// Experience granted to whoever kills this unit.
    pub reward: u32,

    pub strength: u32,
    pub dexterity: u32,

    pub abilities: ArrayVec<AbilityKind, { GameConfig::MAX_ABILITIES }>,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub effects: StatusEffects,

    /// `None` for the player.
    pub ai: Option<AiParameters>,
    /// Turns since this unit last dealt or took damage.
    pub turns_since_combat: u32,

    pub damage_dealt: u64,
    pub damage_taken: u64,

    /// Model spawned by this unit's Summon ability.
    pub summon_class: Option<String>,
    /// The unit that summoned this one.
    pub summoner: Option<UnitId>,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, faction: Faction, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            position,
            facing: Direction::South,
            life: ResourceMeter::full(1),
            mana: ResourceMeter::full(0),
            level: 1,
            experience: 0,
            kills: 0,
            reward: 0,
            strength: 1,
            dexterity: 1,
            abilities: ArrayVec::new(),
            equipment: Equipment::empty(),
            inventory: Inventory::empty(),
            effects: StatusEffects::empty(),
            ai: None,
            turns_since_combat: u32::MAX,
            damage_dealt: 0,
            damage_taken: 0,
            summon_class: None,
            summoner: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life.current > 0
    }

    pub fn is_hostile_to(&self, other: &Unit) -> bool {
        self.faction.is_hostile_to(other.faction)
    }

    /// Innate abilities are known by everyone.
    pub fn knows(&self, ability: AbilityKind) -> bool {
        ability.is_innate() || self.abilities.contains(&ability)
    }

    /// Learns an ability; returns false if already known or the list is full.
    pub fn learn(&mut self, ability: AbilityKind) -> bool {
        if self.knows(ability) || self.abilities.is_full() {
            return false;
        }
        self.abilities.push(ability);
        true
    }

    /// Checked mana spend; nothing changes on failure.
    pub fn spend_mana(&mut self, amount: u32) -> Result<(), ManaError> {
        if amount > self.mana.current {
            return Err(ManaError {
                requested: amount,
                available: self.mana.current,
            });
        }
        self.mana.current -= amount;
        Ok(())
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        self.mana.current >= amount
    }

    /// Whether the status ledger lets the unit act this turn.
    pub fn can_act(&self) -> bool {
        self.effects.can_act()
    }

    pub fn in_combat(&self, config: &GameConfig) -> bool {
        self.turns_since_combat <= config.combat_recency_turns
    }

    /// Base melee damage: strength plus main-hand weapon.
    pub fn melee_damage(&self) -> u32 {
        self.strength + self.equipment.melee_damage()
    }

    /// Base ranged weapon damage, if a ranged weapon is equipped.
    pub fn ranged_damage(&self) -> Option<u32> {
        self.equipment
            .ranged_damage()
            .map(|damage| self.dexterity + damage)
    }

    /// Equips an item from outside the inventory, stashing whatever it displaces.
    pub fn equip(&mut self, item: Item) -> Result<(), Item> {
        if let Some(previous) = self.equipment.equip(item)? {
            self.inventory.add(previous);
        }
        Ok(())
    }

    /// Per-turn upkeep: regeneration and the combat-recency counter.
    pub fn upkeep(&mut self, config: &GameConfig) {
        self.life.regenerate(config.life_regen);
        self.mana.regenerate(config.mana_regen);
        self.turns_since_combat = self.turns_since_combat.saturating_add(1);
    }

    /// Marks the unit as having just taken part in combat.
    pub fn enter_combat(&mut self) {
        self.turns_since_combat = 0;
    }

    pub fn apply_effect(&mut self, kind: StatusEffectKind, duration: u32) {
        self.effects.add(kind, duration);
    }
}
