//! The six ability scores and their modifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six abilities every character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Physical power.
    Strength,
    /// Agility and reflexes. Also feeds unarmored armor class.
    Dexterity,
    /// Endurance.
    Constitution,
    /// Reasoning and memory.
    Intelligence,
    /// Perception and insight.
    Wisdom,
    /// Force of personality.
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    /// The record key holding the score, e.g. `strength`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    /// The record key holding the derived modifier, e.g. `strength_modifier`.
    pub fn modifier_key(self) -> &'static str {
        match self {
            Self::Strength => "strength_modifier",
            Self::Dexterity => "dexterity_modifier",
            Self::Constitution => "constitution_modifier",
            Self::Intelligence => "intelligence_modifier",
            Self::Wisdom => "wisdom_modifier",
            Self::Charisma => "charisma_modifier",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A full set of ability scores, each in `1..=30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Strength score.
    pub strength: i32,
    /// Dexterity score.
    pub dexterity: i32,
    /// Constitution score.
    pub constitution: i32,
    /// Intelligence score.
    pub intelligence: i32,
    /// Wisdom score.
    pub wisdom: i32,
    /// Charisma score.
    pub charisma: i32,
}

impl AbilityScores {
    /// Every score set to `score`.
    pub fn uniform(score: i32) -> Self {
        Self {
            strength: score,
            dexterity: score,
            constitution: score,
            intelligence: score,
            wisdom: score,
            charisma: score,
        }
    }

    /// The score for one ability.
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Mutable access to the score for one ability.
    pub fn get_mut(&mut self, ability: Ability) -> &mut i32 {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert_eq!(Ability::Dexterity.key(), "dexterity");
        assert_eq!(Ability::Charisma.modifier_key(), "charisma_modifier");
        assert_eq!(Ability::Wisdom.to_string(), "wisdom");
    }

    #[test]
    fn get_and_get_mut() {
        let mut scores = AbilityScores::default();
        *scores.get_mut(Ability::Intelligence) = 18;
        assert_eq!(scores.get(Ability::Intelligence), 18);
        assert_eq!(scores.get(Ability::Strength), 10);
    }

    #[test]
    fn all_is_in_sheet_order() {
        let keys: Vec<_> = Ability::ALL.iter().map(|a| a.key()).collect();
        assert_eq!(
            keys,
            vec![
                "strength",
                "dexterity",
                "constitution",
                "intelligence",
                "wisdom",
                "charisma"
            ]
        );
    }
}
