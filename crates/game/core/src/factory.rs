//! Unit models and the factory that turns them into units.
//!
//! A [`UnitModel`] is static content (usually loaded from RON by
//! `crawl-content`). Building a unit copies the model's numbers, learns its
//! abilities and equips its starting gear.

use std::collections::BTreeMap;

use crate::ability::AbilityKind;
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::Position;
use crate::state::{AiParameters, Faction, Item, MapError, ResourceMeter, Unit, UnitId};

/// Static description of a kind of unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitModel {
    pub name: String,
    pub faction: Faction,
    pub life: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: u32,
    #[cfg_attr(feature = "serde", serde(default = "UnitModel::default_stat"))]
    pub strength: u32,
    #[cfg_attr(feature = "serde", serde(default = "UnitModel::default_stat"))]
    pub dexterity: u32,
    /// Experience granted to the killer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reward: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityKind>,
    /// `None` builds a player-controlled unit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai: Option<AiParameters>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summon_class: Option<String>,
    /// Starting gear, equipped in order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<Item>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<Item>,
}

impl UnitModel {
    #[cfg(feature = "serde")]
    fn default_stat() -> u32 {
        1
    }

    pub fn new(name: impl Into<String>, faction: Faction, life: u32) -> Self {
        Self {
            name: name.into(),
            faction,
            life,
            mana: 0,
            strength: 1,
            dexterity: 1,
            reward: 0,
            abilities: Vec::new(),
            ai: None,
            summon_class: None,
            equipment: Vec::new(),
            inventory: Vec::new(),
        }
    }

    /// Builds a fresh unit of this model.
    ///
    /// Abilities beyond the ledger capacity are dropped, and items without an
    /// equip slot go to the inventory.
    pub fn build(&self, id: UnitId, position: Position) -> Unit {
        let mut unit = Unit::new(id, self.name.clone(), self.faction, position);
        unit.life = ResourceMeter::full(self.life.max(1));
        unit.mana = ResourceMeter::full(self.mana);
        unit.strength = self.strength;
        unit.dexterity = self.dexterity;
        unit.reward = self.reward;
        unit.ai = self.ai;
        unit.summon_class = self.summon_class.clone();

        for &ability in &self.abilities {
            if !unit.learn(ability) && !unit.knows(ability) {
                tracing::warn!(model = %self.name, ability = ability.as_str(), "ability list full");
            }
        }
        for item in &self.equipment {
            if let Err(item) = unit.equip(item.clone()) {
                unit.inventory.add(item);
            }
        }
        for item in &self.inventory {
            unit.inventory.add(item.clone());
        }
        unit
    }
}

/// All unit models known to a world, keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitCatalog {
    models: BTreeMap<String, UnitModel>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a model, returning the previous one.
    pub fn insert(&mut self, model: UnitModel) -> Option<UnitModel> {
        self.models.insert(model.name.clone(), model)
    }

    pub fn get(&self, name: &str) -> Option<&UnitModel> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn build(&self, name: &str, id: UnitId, position: Position) -> Result<Unit, SpawnError> {
        self.get(name)
            .map(|model| model.build(id, position))
            .ok_or_else(|| SpawnError::UnknownModel(name.to_string()))
    }
}

impl FromIterator<UnitModel> for UnitCatalog {
    fn from_iter<I: IntoIterator<Item = UnitModel>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for model in iter {
            catalog.insert(model);
        }
        catalog
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("unknown unit model '{0}'")]
    UnknownModel(String),

    #[error(transparent)]
    Map(#[from] MapError),
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SpawnError::UnknownModel(_) => ErrorSeverity::Validation,
            SpawnError::Map(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SpawnError::UnknownModel(_) => "SPAWN_UNKNOWN_MODEL",
            SpawnError::Map(error) => error.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EquipSlot, ItemCategory};

    #[test]
    fn build_applies_model() {
        let mut model = UnitModel::new("knight", Faction::Player, 20);
        model.mana = 10;
        model.strength = 4;
        model.abilities = vec![AbilityKind::HeavyAttack, AbilityKind::Attack];
        model.equipment = vec![
            Item::weapon("sword", 3),
            Item::shield("buckler", 0.5),
            Item::key(),
        ];

        let unit = model.build(UnitId(3), Position::new(2, 2));
        assert_eq!(unit.id, UnitId(3));
        assert_eq!(unit.life.current, 20);
        assert_eq!(unit.mana.maximum, 10);
        assert_eq!(unit.melee_damage(), 7);
        assert!(unit.knows(AbilityKind::HeavyAttack));
        assert_eq!(unit.abilities.len(), 1);
        assert!(unit.equipment.get(EquipSlot::OffHand).is_some());
        assert_eq!(unit.inventory.count(ItemCategory::Key), 1);
    }

    #[test]
    fn unknown_model_is_validation_error() {
        let catalog = UnitCatalog::new();
        let err = catalog
            .build("ghost", UnitId(1), Position::ORIGIN)
            .unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "SPAWN_UNKNOWN_MODEL");
    }
}
