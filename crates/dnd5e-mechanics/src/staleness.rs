//! Which derived character fields an update invalidates.
//!
//! [`STALENESS_TABLE`] maps every derived field to the primitive fields
//! whose change makes it stale. The reconciliation loop consults it before
//! an update to decide which derived values are unknown until apply; the
//! rest keep their persisted value in the plan.

use std::collections::BTreeSet;
use std::fmt;

use dnd5e_core::{DndError, DndResult, Record};

use crate::character::{
    ARMOR_CLASS, Ability, EXPERIENCE_POINTS, INVENTORY, LEVEL, PROFICIENCY_BONUS,
};

/// A user-supplied character field that some derived field depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveField {
    /// `experience_points`.
    ExperiencePoints,
    /// One ability score.
    Score(Ability),
    /// Anything in `inventory_item`.
    Inventory,
}

impl PrimitiveField {
    /// The record key.
    pub fn key(self) -> &'static str {
        match self {
            Self::ExperiencePoints => EXPERIENCE_POINTS,
            Self::Score(ability) => ability.key(),
            Self::Inventory => INVENTORY,
        }
    }

    /// The field stored under `key`, if any derived field depends on it.
    pub fn from_key(key: &str) -> Option<Self> {
        if key == EXPERIENCE_POINTS {
            return Some(Self::ExperiencePoints);
        }
        if key == INVENTORY {
            return Some(Self::Inventory);
        }
        Ability::ALL
            .into_iter()
            .find(|a| a.key() == key)
            .map(Self::Score)
    }
}

impl fmt::Display for PrimitiveField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A character field computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedField {
    /// `level`.
    Level,
    /// `proficiency_bonus`.
    ProficiencyBonus,
    /// One ability's modifier.
    Modifier(Ability),
    /// `armor_class`.
    ArmorClass,
}

impl DerivedField {
    /// The record key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Level => LEVEL,
            Self::ProficiencyBonus => PROFICIENCY_BONUS,
            Self::Modifier(ability) => ability.modifier_key(),
            Self::ArmorClass => ARMOR_CLASS,
        }
    }

    /// The primitive fields whose change makes this field stale.
    pub fn triggers(self) -> &'static [PrimitiveField] {
        STALENESS_TABLE
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, triggers)| *triggers)
            .unwrap_or_default()
    }

    /// Every derived field.
    pub fn all() -> impl Iterator<Item = DerivedField> {
        STALENESS_TABLE.iter().map(|(field, _)| *field)
    }
}

impl fmt::Display for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Derived field → triggering primitive fields. One row per derived field.
pub const STALENESS_TABLE: &[(DerivedField, &[PrimitiveField])] = &[
    (DerivedField::Level, &[PrimitiveField::ExperiencePoints]),
    (
        DerivedField::ProficiencyBonus,
        &[PrimitiveField::ExperiencePoints],
    ),
    (
        DerivedField::Modifier(Ability::Strength),
        &[PrimitiveField::Score(Ability::Strength)],
    ),
    (
        DerivedField::Modifier(Ability::Dexterity),
        &[PrimitiveField::Score(Ability::Dexterity)],
    ),
    (
        DerivedField::Modifier(Ability::Constitution),
        &[PrimitiveField::Score(Ability::Constitution)],
    ),
    (
        DerivedField::Modifier(Ability::Intelligence),
        &[PrimitiveField::Score(Ability::Intelligence)],
    ),
    (
        DerivedField::Modifier(Ability::Wisdom),
        &[PrimitiveField::Score(Ability::Wisdom)],
    ),
    (
        DerivedField::Modifier(Ability::Charisma),
        &[PrimitiveField::Score(Ability::Charisma)],
    ),
    (
        DerivedField::ArmorClass,
        &[
            PrimitiveField::Score(Ability::Dexterity),
            PrimitiveField::Inventory,
        ],
    ),
];

/// Primitive fields that differ between two character records.
pub fn changed_primitives(old: &Record, new: &Record) -> BTreeSet<PrimitiveField> {
    old.changed_keys(new)
        .iter()
        .filter_map(|key| PrimitiveField::from_key(key))
        .collect()
}

/// Derived fields made stale by a set of changed primitive fields.
pub fn stale_fields(changed: &BTreeSet<PrimitiveField>) -> BTreeSet<DerivedField> {
    let stale: BTreeSet<DerivedField> = STALENESS_TABLE
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| changed.contains(t)))
        .map(|(field, _)| *field)
        .collect();
    tracing::debug!(
        changed = ?changed,
        stale = ?stale,
        "evaluated staleness policy"
    );
    stale
}

/// Reject an update that would lower experience points.
pub fn check_experience_points(old: u32, new: u32) -> DndResult<()> {
    if new < old {
        return Err(DndError::validation(
            EXPERIENCE_POINTS,
            format!("experience points cannot decrease (from {old} to {new})"),
        ));
    }
    Ok(())
}
