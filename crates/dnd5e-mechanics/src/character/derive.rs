//! The derived-attribute engine.
//!
//! Pure functions from a character's primitive fields to its level,
//! proficiency bonus, ability modifiers, and armor class. Inputs are
//! assumed to have passed boundary validation.

use serde::{Deserialize, Serialize};

use super::{Ability, Character, InventoryItem};

/// Minimum experience points for levels 1 through 20.
pub const XP_THRESHOLDS: [u32; 20] = [
    0, 300, 900, 2700, 6500, 14000, 23000, 34000, 48000, 64000, 85000, 100000, 120000, 140000,
    165000, 195000, 225000, 265000, 305000, 355000,
];

/// Highest attainable level.
pub const MAX_LEVEL: u32 = XP_THRESHOLDS.len() as u32;

/// Armor class before any dexterity modifier when nothing equipped counts.
pub const BASE_ARMOR_CLASS: i32 = 10;

/// Every field the engine computes for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAttributes {
    /// Character level, `1..=20`.
    pub level: u32,
    /// Proficiency bonus for the level.
    pub proficiency_bonus: u32,
    /// Modifiers indexed in [`Ability::ALL`] order.
    pub modifiers: [i32; 6],
    /// Armor class, never negative.
    pub armor_class: u32,
}

impl DerivedAttributes {
    /// The modifier for one ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.modifiers[ability as usize]
    }
}

/// Level for an experience total: the number of thresholds at or below it.
///
/// The first threshold is 0, so the result is always at least 1; past the
/// last threshold the level stays at [`MAX_LEVEL`].
pub fn level_for_experience(experience_points: u32) -> u32 {
    XP_THRESHOLDS
        .iter()
        .take_while(|&&threshold| threshold <= experience_points)
        .count() as u32
}

/// `ceil(level * 1.25)`.
pub fn proficiency_bonus(level: u32) -> u32 {
    (level * 5).div_ceil(4)
}

/// `floor((score - 10) / 2)`, rounding toward negative infinity.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Armor class from equipped items, falling back to `10 + dexterity_modifier`.
///
/// Only equipped items contribute; an item without an armor class value
/// contributes 0. The fallback fires whenever the equipped sum is exactly
/// zero, including when an equipped item explicitly declares 0.
pub fn armor_class(inventory: &[InventoryItem], dexterity_modifier: i32) -> u32 {
    let equipped: i64 = inventory
        .iter()
        .filter(|item| item.equipped)
        .map(|item| i64::from(item.armor_class.unwrap_or(0)))
        .sum();

    let armor_class = if equipped == 0 {
        i64::from(BASE_ARMOR_CLASS) + i64::from(dexterity_modifier)
    } else {
        equipped
    };

    armor_class.clamp(0, i64::from(u32::MAX)) as u32
}

/// Compute every derived field for a character.
pub fn derive_attributes(character: &Character) -> DerivedAttributes {
    let level = level_for_experience(character.experience_points);
    let modifiers = Ability::ALL.map(|ability| ability_modifier(character.abilities.get(ability)));
    let armor_class = armor_class(&character.inventory, modifiers[Ability::Dexterity as usize]);

    let derived = DerivedAttributes {
        level,
        proficiency_bonus: proficiency_bonus(level),
        modifiers,
        armor_class,
    };
    tracing::debug!(
        character = %character.name,
        level = derived.level,
        proficiency_bonus = derived.proficiency_bonus,
        armor_class = derived.armor_class,
        "derived character attributes"
    );
    derived
}
