//! Character classes and alignments.
//!
//! Both parse case-insensitively from their display names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    /// Barbarian.
    Barbarian,
    /// Bard.
    Bard,
    /// Cleric.
    Cleric,
    /// Druid.
    Druid,
    /// Fighter.
    Fighter,
    /// Monk.
    Monk,
    /// Paladin.
    Paladin,
    /// Ranger.
    Ranger,
    /// Rogue.
    Rogue,
    /// Sorcerer.
    Sorcerer,
    /// Warlock.
    Warlock,
    /// Wizard.
    Wizard,
}

impl CharacterClass {
    /// Every class.
    pub const ALL: [CharacterClass; 12] = [
        Self::Barbarian,
        Self::Bard,
        Self::Cleric,
        Self::Druid,
        Self::Fighter,
        Self::Monk,
        Self::Paladin,
        Self::Ranger,
        Self::Rogue,
        Self::Sorcerer,
        Self::Warlock,
        Self::Wizard,
    ];

    /// Lowercase class name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Barbarian => "barbarian",
            Self::Bard => "bard",
            Self::Cleric => "cleric",
            Self::Druid => "druid",
            Self::Fighter => "fighter",
            Self::Monk => "monk",
            Self::Paladin => "paladin",
            Self::Ranger => "ranger",
            Self::Rogue => "rogue",
            Self::Sorcerer => "sorcerer",
            Self::Warlock => "warlock",
            Self::Wizard => "wizard",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("expected one of {}, got \"{s}\"", list(&Self::ALL)))
    }
}

/// A character's moral and ethical outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Lawful good.
    LawfulGood,
    /// Neutral good.
    NeutralGood,
    /// Chaotic good.
    ChaoticGood,
    /// Lawful neutral.
    LawfulNeutral,
    /// True neutral.
    Neutral,
    /// Chaotic neutral.
    ChaoticNeutral,
    /// Lawful evil.
    LawfulEvil,
    /// Neutral evil.
    NeutralEvil,
    /// Chaotic evil.
    ChaoticEvil,
}

impl Alignment {
    /// Every alignment.
    pub const ALL: [Alignment; 9] = [
        Self::LawfulGood,
        Self::NeutralGood,
        Self::ChaoticGood,
        Self::LawfulNeutral,
        Self::Neutral,
        Self::ChaoticNeutral,
        Self::LawfulEvil,
        Self::NeutralEvil,
        Self::ChaoticEvil,
    ];

    /// Lowercase alignment name, e.g. `lawful good`.
    pub fn name(self) -> &'static str {
        match self {
            Self::LawfulGood => "lawful good",
            Self::NeutralGood => "neutral good",
            Self::ChaoticGood => "chaotic good",
            Self::LawfulNeutral => "lawful neutral",
            Self::Neutral => "neutral",
            Self::ChaoticNeutral => "chaotic neutral",
            Self::LawfulEvil => "lawful evil",
            Self::NeutralEvil => "neutral evil",
            Self::ChaoticEvil => "chaotic evil",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("expected one of {}, got \"{s}\"", list(&Self::ALL)))
    }
}

fn list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_parses_case_insensitively() {
        assert_eq!("Wizard".parse::<CharacterClass>(), Ok(CharacterClass::Wizard));
        assert_eq!("ROGUE".parse::<CharacterClass>(), Ok(CharacterClass::Rogue));
        assert_eq!("bard".parse::<CharacterClass>(), Ok(CharacterClass::Bard));
    }

    #[test]
    fn unknown_class_lists_choices() {
        let err = "artificer".parse::<CharacterClass>().unwrap_err();
        assert!(err.contains("barbarian"));
        assert!(err.contains("\"artificer\""));
    }

    #[test]
    fn alignment_parses_case_insensitively() {
        assert_eq!("Chaotic Good".parse::<Alignment>(), Ok(Alignment::ChaoticGood));
        assert_eq!("NEUTRAL".parse::<Alignment>(), Ok(Alignment::Neutral));
        assert!("true neutral".parse::<Alignment>().is_err());
    }

    #[test]
    fn display_round_trips_through_name() {
        for class in CharacterClass::ALL {
            assert_eq!(class.to_string().parse::<CharacterClass>(), Ok(class));
        }
        for alignment in Alignment::ALL {
            assert_eq!(alignment.to_string().parse::<Alignment>(), Ok(alignment));
        }
    }
}
