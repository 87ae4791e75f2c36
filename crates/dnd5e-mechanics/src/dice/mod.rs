//! Dice rolls: parameters, the random source, and outcomes.
//!
//! A roll is a one-shot event. Its parameters are validated at the record
//! boundary, the dice are drawn once, and the outcome is frozen.

pub mod roll;

pub use roll::{RollOutcome, roll_dice};

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use dnd5e_core::{DndResult, Record, Value};
use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};
use serde::{Deserialize, Serialize};

/// Record key for the number of dice.
pub const NUMBER: &str = "number";
/// Record key for sides per die.
pub const SIDES: &str = "sides";
/// Record key for the flat modifier.
pub const MODIFIER: &str = "modifier";
/// Record key for the reroll directive.
pub const REROLL: &str = "reroll";
/// Record key for the individual results.
pub const VALUES: &str = "values";
/// Record key for the total.
pub const TOTAL: &str = "total";

/// Valid number of sides per die.
pub const SIDES_RANGE: RangeInclusive<i64> = 2..=20;

/// A source of die values. Injectable so tests can script results.
pub trait RandomSource {
    /// Draw one value uniformly from `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl RandomSource for StdRng {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.random_range(1..=sides)
    }
}

impl RandomSource for ThreadRng {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.random_range(1..=sides)
    }
}

/// What to roll: `count` dice of `sides` sides, plus `modifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollParams {
    /// Number of dice, at least 1.
    pub count: u32,
    /// Sides per die, `2..=20`.
    pub sides: u32,
    /// Flat modifier added once to the total.
    pub modifier: i32,
    /// Reserved for naming dice to redraw. Accepted and stored, but it
    /// does not affect the outcome.
    pub reroll: BTreeMap<String, Value>,
}

impl Default for RollParams {
    fn default() -> Self {
        Self {
            count: 1,
            sides: 20,
            modifier: 0,
            reroll: BTreeMap::new(),
        }
    }
}

impl RollParams {
    /// `count` d`sides` + `modifier`, with no reroll directive.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
            reroll: BTreeMap::new(),
        }
    }

    /// Parse and validate roll parameters from a record, applying defaults.
    pub fn from_record(record: &Record) -> DndResult<Self> {
        let defaults = Self::default();
        let count = record
            .get_i64_in(NUMBER, 1..=i64::from(u32::MAX))?
            .map_or(defaults.count, |n| n as u32);
        let sides = record
            .get_i64_in(SIDES, SIDES_RANGE)?
            .map_or(defaults.sides, |n| n as u32);
        let modifier = record
            .get_i64_in(MODIFIER, i64::from(i32::MIN)..=i64::from(i32::MAX))?
            .map_or(defaults.modifier, |n| n as i32);
        let reroll = record.get_map(REROLL)?.cloned().unwrap_or_default();

        Ok(Self {
            count,
            sides,
            modifier,
            reroll,
        })
    }

    /// The parameters as a record, with defaults written out.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new()
            .with(NUMBER, self.count)
            .with(SIDES, self.sides)
            .with(MODIFIER, self.modifier);
        if !self.reroll.is_empty() {
            record.set(REROLL, Value::Map(self.reroll.clone()));
        }
        record
    }
}

impl std::fmt::Display for RollParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn defaults() {
        let params = RollParams::from_record(&Record::new()).unwrap();
        assert_eq!(params, RollParams::new(1, 20, 0));
        assert_eq!(params.to_string(), "1d20");
    }

    #[test]
    fn display_modifier_sign() {
        assert_eq!(RollParams::new(3, 6, 2).to_string(), "3d6+2");
        assert_eq!(RollParams::new(2, 8, -1).to_string(), "2d8-1");
    }

    #[test]
    fn sides_out_of_range() {
        for bad in [0, 1, 21, 100] {
            let err = RollParams::from_record(&Record::new().with(SIDES, bad)).unwrap_err();
            assert!(err.to_string().contains("sides"));
        }
        assert!(RollParams::from_record(&Record::new().with(SIDES, 2)).is_ok());
        assert!(RollParams::from_record(&Record::new().with(SIDES, 20)).is_ok());
    }

    #[test]
    fn count_must_be_positive() {
        assert!(RollParams::from_record(&Record::new().with(NUMBER, 0)).is_err());
        assert!(RollParams::from_record(&Record::new().with(NUMBER, -2)).is_err());
    }

    #[test]
    fn reroll_is_kept_opaque() {
        let mut reroll = BTreeMap::new();
        reroll.insert("ones".to_string(), Value::from(true));
        let record = Record::new().with(REROLL, Value::Map(reroll.clone()));
        let params = RollParams::from_record(&record).unwrap();
        assert_eq!(params.reroll, reroll);
        assert_eq!(params.to_record().get(REROLL), Some(&Value::Map(reroll)));
    }

    #[test]
    fn std_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for sides in 2..=20 {
            for _ in 0..50 {
                let v = rng.roll_die(sides);
                assert!((1..=sides).contains(&v));
            }
        }
    }
}
