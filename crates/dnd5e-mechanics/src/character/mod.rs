//! Character sheets: primitive fields, their record schema, and the
//! derived attributes computed from them.
//!
//! A [`Character`] is parsed once from the host's flat [`Record`], which
//! validates enum membership and numeric ranges and fills in defaults.
//! Everything downstream works on the typed value.

pub mod ability;
pub mod class;
pub mod derive;
pub mod inventory;

pub use ability::{Ability, AbilityScores};
pub use class::{Alignment, CharacterClass};
pub use derive::{DerivedAttributes, derive_attributes};
pub use inventory::InventoryItem;

use std::ops::RangeInclusive;

use dnd5e_core::{DndError, DndResult, Record, Value};
use serde::{Deserialize, Serialize};

/// Record key for the character name.
pub const NAME: &str = "name";
/// Record key for the class.
pub const CLASS: &str = "class";
/// Record key for the alignment.
pub const ALIGNMENT: &str = "alignment";
/// Record key for experience points.
pub const EXPERIENCE_POINTS: &str = "experience_points";
/// Record key for walking speed.
pub const SPEED: &str = "speed";
/// Record key for the inventory list.
pub const INVENTORY: &str = "inventory_item";
/// Record key for the derived level.
pub const LEVEL: &str = "level";
/// Record key for the derived proficiency bonus.
pub const PROFICIENCY_BONUS: &str = "proficiency_bonus";
/// Record key for the derived armor class.
pub const ARMOR_CLASS: &str = "armor_class";

/// Valid range for each ability score.
pub const ABILITY_SCORE_RANGE: RangeInclusive<i64> = 1..=30;
/// Speed when none is given.
pub const DEFAULT_SPEED: u32 = 30;

/// A character's user-supplied fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character name. Also the identifier assigned at creation.
    pub name: String,
    /// Class.
    pub class: CharacterClass,
    /// Alignment.
    pub alignment: Alignment,
    /// Experience points. May never decrease across updates.
    pub experience_points: u32,
    /// The six ability scores.
    pub abilities: AbilityScores,
    /// Walking speed in feet.
    pub speed: u32,
    /// Carried items in insertion order.
    pub inventory: Vec<InventoryItem>,
}

impl Character {
    /// A new level-1 character with average scores and an empty inventory.
    pub fn new(name: impl Into<String>, class: CharacterClass, alignment: Alignment) -> Self {
        Self {
            name: name.into(),
            class,
            alignment,
            experience_points: 0,
            abilities: AbilityScores::default(),
            speed: DEFAULT_SPEED,
            inventory: Vec::new(),
        }
    }

    /// Parse and validate a character from a record.
    ///
    /// Derived keys present in the record are ignored.
    pub fn from_record(record: &Record) -> DndResult<Self> {
        let name = required_str(record, NAME)?.to_string();
        let class = required_str(record, CLASS)?
            .parse::<CharacterClass>()
            .map_err(|reason| DndError::validation(CLASS, reason))?;
        let alignment = required_str(record, ALIGNMENT)?
            .parse::<Alignment>()
            .map_err(|reason| DndError::validation(ALIGNMENT, reason))?;

        let experience_points = record
            .get_i64_in(EXPERIENCE_POINTS, 0..=i64::from(u32::MAX))?
            .unwrap_or(0) as u32;
        let speed = record
            .get_i64_in(SPEED, 0..=i64::from(u32::MAX))?
            .map_or(DEFAULT_SPEED, |s| s as u32);

        let mut abilities = AbilityScores::default();
        for ability in Ability::ALL {
            let score = record
                .get_i64_in(ability.key(), ABILITY_SCORE_RANGE)?
                .ok_or_else(|| DndError::validation(ability.key(), "required"))?;
            *abilities.get_mut(ability) = score as i32;
        }

        let inventory = record
            .get_list(INVENTORY)?
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, value)| InventoryItem::from_value(value, &format!("{INVENTORY}.{i}")))
            .collect::<DndResult<Vec<_>>>()?;

        Ok(Self {
            name,
            class,
            alignment,
            experience_points,
            abilities,
            speed,
            inventory,
        })
    }

    /// The primitive fields as a record, with defaults written out.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new()
            .with(NAME, self.name.as_str())
            .with(CLASS, self.class.name())
            .with(ALIGNMENT, self.alignment.name())
            .with(EXPERIENCE_POINTS, self.experience_points)
            .with(SPEED, self.speed);
        for ability in Ability::ALL {
            record.set(ability.key(), self.abilities.get(ability));
        }
        if !self.inventory.is_empty() {
            let items: Vec<Value> = self.inventory.iter().map(InventoryItem::to_value).collect();
            record.set(INVENTORY, Value::List(items));
        }
        record
    }

    /// Compute the derived attributes.
    pub fn derive(&self) -> DerivedAttributes {
        derive_attributes(self)
    }
}

impl DerivedAttributes {
    /// Overwrite every derived key in `record`.
    pub fn write_to(&self, record: &mut Record) {
        record.set(LEVEL, self.level);
        record.set(PROFICIENCY_BONUS, self.proficiency_bonus);
        for ability in Ability::ALL {
            record.set(ability.modifier_key(), self.modifier(ability));
        }
        record.set(ARMOR_CLASS, self.armor_class);
    }
}

fn required_str<'a>(record: &'a Record, key: &str) -> DndResult<&'a str> {
    record
        .get_str(key)?
        .ok_or_else(|| DndError::validation(key, "required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> Record {
        let mut record = Record::new()
            .with(NAME, "Aria")
            .with(CLASS, "Rogue")
            .with(ALIGNMENT, "Chaotic Good");
        for ability in Ability::ALL {
            record.set(ability.key(), 12);
        }
        record
    }

    #[test]
    fn from_record_applies_defaults() {
        let character = Character::from_record(&base_record()).unwrap();
        assert_eq!(character.class, CharacterClass::Rogue);
        assert_eq!(character.alignment, Alignment::ChaoticGood);
        assert_eq!(character.experience_points, 0);
        assert_eq!(character.speed, DEFAULT_SPEED);
        assert!(character.inventory.is_empty());
        assert_eq!(character.abilities, AbilityScores::uniform(12));
    }

    #[test]
    fn missing_required_fields() {
        for key in [NAME, CLASS, ALIGNMENT, "wisdom"] {
            let mut record = base_record();
            record.remove(key);
            let err = Character::from_record(&record).unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains(key), "{err}");
        }
    }

    #[test]
    fn ability_scores_out_of_range() {
        for bad in [0, 31, -3] {
            let record = base_record().with("strength", bad);
            let err = Character::from_record(&record).unwrap_err();
            assert!(err.to_string().contains("strength"));
        }
        assert!(Character::from_record(&base_record().with("strength", 1)).is_ok());
        assert!(Character::from_record(&base_record().with("strength", 30)).is_ok());
    }

    #[test]
    fn negative_experience_and_speed_rejected() {
        assert!(Character::from_record(&base_record().with(EXPERIENCE_POINTS, -1)).is_err());
        assert!(Character::from_record(&base_record().with(SPEED, -5)).is_err());
    }

    #[test]
    fn unknown_enum_values_rejected() {
        let err = Character::from_record(&base_record().with(CLASS, "artificer")).unwrap_err();
        assert!(err.to_string().starts_with("validation error: class:"));
        assert!(Character::from_record(&base_record().with(ALIGNMENT, "lawful")).is_err());
    }

    #[test]
    fn derived_keys_in_input_are_ignored() {
        let record = base_record().with(LEVEL, 17).with(ARMOR_CLASS, 99);
        let character = Character::from_record(&record).unwrap();
        let derived = character.derive();
        assert_eq!(derived.level, 1);
        assert_eq!(derived.armor_class, 11);
    }

    #[test]
    fn to_record_normalizes_enums_and_defaults() {
        let character = Character::from_record(&base_record()).unwrap();
        let record = character.to_record();
        assert_eq!(record.get_str(CLASS).unwrap(), Some("rogue"));
        assert_eq!(record.get_str(ALIGNMENT).unwrap(), Some("chaotic good"));
        assert_eq!(record.get_i64(SPEED).unwrap(), Some(30));
        assert_eq!(Character::from_record(&record).unwrap(), character);
    }

    #[test]
    fn write_to_sets_every_derived_key() {
        let mut character = Character::new("Bram", CharacterClass::Fighter, Alignment::LawfulGood);
        character.abilities.dexterity = 14;
        let mut record = character.to_record();
        character.derive().write_to(&mut record);

        assert_eq!(record.get_i64(LEVEL).unwrap(), Some(1));
        assert_eq!(record.get_i64(PROFICIENCY_BONUS).unwrap(), Some(2));
        assert_eq!(record.get_i64("dexterity_modifier").unwrap(), Some(2));
        assert_eq!(record.get_i64("strength_modifier").unwrap(), Some(0));
        assert_eq!(record.get_i64(ARMOR_CLASS).unwrap(), Some(12));
    }
}
