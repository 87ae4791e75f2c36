//! The dice roll engine and its outcome.

use dnd5e_core::Record;
use serde::{Deserialize, Serialize};

use super::{RandomSource, RollParams, TOTAL, VALUES};

/// The frozen result of a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Individual die results in draw order.
    pub values: Vec<u32>,
    /// Sum of `values` plus the modifier.
    pub total: i64,
}

impl RollOutcome {
    /// Write `values` and `total` into a record.
    pub fn write_to(&self, record: &mut Record) {
        record.set(VALUES, self.values.clone());
        record.set(TOTAL, self.total);
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total)
    }
}

/// Roll `params.count` dice, in order, and add the modifier once.
///
/// The reroll directive is ignored.
pub fn roll_dice<R: RandomSource + ?Sized>(params: &RollParams, rng: &mut R) -> RollOutcome {
    let values: Vec<u32> = (0..params.count)
        .map(|_| rng.roll_die(params.sides))
        .collect();
    let total = values.iter().map(|&v| i64::from(v)).sum::<i64>() + i64::from(params.modifier);

    tracing::debug!(roll = %params, ?values, total, "rolled dice");
    RollOutcome { values, total }
}
