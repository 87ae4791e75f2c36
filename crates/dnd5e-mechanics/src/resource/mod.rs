//! Resource lifecycles: how each resource kind is created, read,
//! updated, and deleted, and how a change to it is planned.

pub mod character;
pub mod roll;

pub use character::CharacterResource;
pub use roll::RollResource;

use std::collections::BTreeSet;
use std::fmt;

use dnd5e_core::{DndResult, Record, ResourceAddress, ResourceId, ResourceState};
use serde::Serialize;

use crate::dice::RandomSource;

/// What applying a plan will do to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Nothing tracked yet; create it.
    Create,
    /// Change the tracked resource in place.
    Update,
    /// Delete the tracked resource and create a new one.
    Replace,
    /// Stop tracking the resource.
    Delete,
    /// Already converged.
    NoOp,
}

impl Action {
    /// Plan-style marker: `+`, `~`, `-/+`, `-`, or blank.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update => "~",
            Self::Replace => "-/+",
            Self::Delete => "-",
            Self::NoOp => " ",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update in-place"),
            Self::Replace => write!(f, "replace"),
            Self::Delete => write!(f, "destroy"),
            Self::NoOp => write!(f, "no changes"),
        }
    }
}

/// A resource's answer to "what would converging to this config do?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePlan {
    /// The action to take.
    pub action: Action,
    /// User-supplied keys whose values change.
    pub changed: BTreeSet<String>,
    /// Computed keys whose values are unknown until apply.
    pub unknown: BTreeSet<String>,
    /// The expected record after apply, minus the unknown keys.
    pub planned: Record,
}

/// One resource kind's lifecycle.
///
/// Every method receives records already owned by the host. `desired`
/// records must have passed through [`Resource::normalize`].
pub trait Resource {
    /// The kind string used in addresses, e.g. `dnd5e_character`.
    fn kind(&self) -> &'static str;

    /// Validate a desired configuration and write out its defaults.
    fn normalize(&self, config: &Record) -> DndResult<Record>;

    /// Decide how to converge `prior` (if tracked) to `desired`.
    fn plan(&self, prior: Option<&ResourceState>, desired: &Record) -> DndResult<ResourcePlan>;

    /// Create the resource, returning its identifier and full record.
    fn create(
        &self,
        address: &ResourceAddress,
        desired: &Record,
        rng: &mut dyn RandomSource,
    ) -> DndResult<(ResourceId, Record)>;

    /// Refresh the tracked record.
    fn read(&self, current: &ResourceState) -> DndResult<Record>;

    /// Update the resource in place, returning its new record.
    fn update(
        &self,
        address: &ResourceAddress,
        prior: &ResourceState,
        desired: &Record,
    ) -> DndResult<Record>;

    /// Release anything the resource holds outside state. Neither built-in
    /// kind exists outside state, so the default does nothing.
    fn delete(&self, _current: &ResourceState) -> DndResult<()> {
        Ok(())
    }
}
