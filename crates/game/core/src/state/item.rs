//! Items, equipment slots and inventories.
//!
//! A unit owns its [`Equipment`] and [`Inventory`] outright. Items never point
//! back at their wearer; mitigation and weapon damage are computed by asking
//! the unit's own equipment table.

use std::collections::BTreeMap;

use strum::{EnumIter, IntoStaticStr};

/// Broad item grouping used by inventories and loot tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ItemCategory {
    Weapon,
    Shield,
    Armor,
    Ranged,
    Key,
    Potion,
    Misc,
}

/// Equipment slot; one item per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Body,
    Head,
    Ranged,
}

/// An item definition as carried, worn or lying on the floor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub category: ItemCategory,
    /// Slot the item occupies when equipped; `None` for non-wearables.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<EquipSlot>,
    /// Flat damage added to attacks made with this item.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: u32,
    /// Fraction of incoming damage absorbed, from any direction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub absorb: f32,
    /// Fraction of incoming damage blocked; shields only, in-line attacks only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub block: f32,
}

impl Item {
    pub fn new(name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            name: name.into(),
            category,
            slot: None,
            damage: 0,
            absorb: 0.0,
            block: 0.0,
        }
    }

    pub fn weapon(name: impl Into<String>, damage: u32) -> Self {
        Self {
            slot: Some(EquipSlot::MainHand),
            damage,
            ..Self::new(name, ItemCategory::Weapon)
        }
    }

    pub fn bow(name: impl Into<String>, damage: u32) -> Self {
        Self {
            slot: Some(EquipSlot::Ranged),
            damage,
            ..Self::new(name, ItemCategory::Ranged)
        }
    }

    pub fn shield(name: impl Into<String>, block: f32) -> Self {
        Self {
            slot: Some(EquipSlot::OffHand),
            block,
            ..Self::new(name, ItemCategory::Shield)
        }
    }

    pub fn armor(name: impl Into<String>, slot: EquipSlot, absorb: f32) -> Self {
        Self {
            slot: Some(slot),
            absorb,
            ..Self::new(name, ItemCategory::Armor)
        }
    }

    pub fn key() -> Self {
        Self::new("key", ItemCategory::Key)
    }

    pub fn is_shield(&self) -> bool {
        self.category == ItemCategory::Shield
    }
}

/// Items currently worn, keyed by slot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Item>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Equips `item` in its slot, returning whatever was there before.
    ///
    /// Items without a slot are handed back unchanged.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        match item.slot {
            Some(slot) => Ok(self.slots.insert(slot, item)),
            None => Err(item),
        }
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EquipSlot, &Item)> {
        self.slots.iter()
    }

    /// Damage bonus of the main-hand weapon.
    pub fn melee_damage(&self) -> u32 {
        self.get(EquipSlot::MainHand).map_or(0, |item| item.damage)
    }

    /// Damage bonus of the ranged weapon, if one is equipped.
    pub fn ranged_damage(&self) -> Option<u32> {
        self.get(EquipSlot::Ranged)
            .filter(|item| item.category == ItemCategory::Ranged)
            .map(|item| item.damage)
    }

    /// Sum of absorb ratios of all worn items (unclamped).
    pub fn absorb_ratio(&self) -> f32 {
        self.slots.values().map(|item| item.absorb).sum()
    }

    /// Sum of block ratios contributed by worn shields (unclamped).
    pub fn block_ratio(&self) -> f32 {
        self.slots
            .values()
            .filter(|item| item.is_shield())
            .map(|item| item.block)
            .sum()
    }
}

/// Carried items grouped by category.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: BTreeMap<ItemCategory, Vec<Item>>,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        self.items.entry(item.category).or_default().push(item);
    }

    /// Removes and returns the first item of `category`.
    pub fn remove(&mut self, category: ItemCategory) -> Option<Item> {
        let bucket = self.items.get_mut(&category)?;
        if bucket.is_empty() {
            return None;
        }
        let item = bucket.remove(0);
        if bucket.is_empty() {
            self.items.remove(&category);
        }
        Some(item)
    }

    /// Removes and returns the first item called `name`.
    pub fn take_named(&mut self, name: &str) -> Option<Item> {
        let (category, index) = self.items.iter().find_map(|(category, bucket)| {
            bucket
                .iter()
                .position(|item| item.name == name)
                .map(|index| (*category, index))
        })?;
        let bucket = self.items.get_mut(&category)?;
        let item = bucket.remove(index);
        if bucket.is_empty() {
            self.items.remove(&category);
        }
        Some(item)
    }

    pub fn count(&self, category: ItemCategory) -> usize {
        self.items.get(&category).map_or(0, Vec::len)
    }

    pub fn items(&self, category: ItemCategory) -> &[Item] {
        self.items.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_replaces_slot() {
        let mut equipment = Equipment::empty();
        assert_eq!(equipment.equip(Item::weapon("dagger", 1)), Ok(None));

        let previous = equipment.equip(Item::weapon("sword", 3)).ok().flatten();
        assert_eq!(previous.map(|i| i.name), Some("dagger".to_string()));
        assert_eq!(equipment.melee_damage(), 3);
    }

    #[test]
    fn slotless_items_cannot_be_equipped() {
        let mut equipment = Equipment::empty();
        assert!(equipment.equip(Item::key()).is_err());
    }

    #[test]
    fn only_shields_contribute_block() {
        let mut equipment = Equipment::empty();
        equipment.equip(Item::shield("buckler", 0.5)).ok();
        let mut odd_helmet = Item::armor("helm", EquipSlot::Head, 0.1);
        odd_helmet.block = 0.9;
        equipment.equip(odd_helmet).ok();

        assert!((equipment.block_ratio() - 0.5).abs() < f32::EPSILON);
        assert!((equipment.absorb_ratio() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn inventory_groups_by_category() {
        let mut inventory = Inventory::empty();
        inventory.add(Item::key());
        inventory.add(Item::key());
        inventory.add(Item::weapon("axe", 2));

        assert_eq!(inventory.count(ItemCategory::Key), 2);
        assert!(inventory.remove(ItemCategory::Key).is_some());
        assert_eq!(inventory.count(ItemCategory::Key), 1);
        assert_eq!(inventory.take_named("axe").map(|i| i.damage), Some(2));
        assert_eq!(inventory.count(ItemCategory::Weapon), 0);
        assert!(inventory.remove(ItemCategory::Potion).is_none());
    }
}
