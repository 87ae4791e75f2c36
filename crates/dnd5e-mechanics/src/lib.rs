//! Game mechanics for dnd5e resources.
//!
//! Provides the derived-attribute engine for character sheets (level,
//! proficiency bonus, ability modifiers, armor class), the staleness
//! policy that decides which derived fields an update invalidates, the
//! dice roller, and the `dnd5e_character` / `dnd5e_roll` resource
//! lifecycles driven by a small reconciliation loop.

pub mod character;
pub mod dice;
pub mod provider;
pub mod reconcile;
pub mod resource;
pub mod staleness;

pub use character::{
    Ability, AbilityScores, Alignment, Character, CharacterClass, DerivedAttributes, InventoryItem,
    derive_attributes,
};
pub use dice::{RandomSource, RollOutcome, RollParams, roll_dice};
pub use provider::Provider;
pub use reconcile::{Action, ApplySummary, Config, Plan, PlannedChange};
pub use resource::Resource;
pub use staleness::{DerivedField, PrimitiveField};
