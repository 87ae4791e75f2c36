//! Registry of resource kinds.

use std::collections::BTreeMap;

use dnd5e_core::{DndError, DndResult};

use crate::resource::{CharacterResource, Resource, RollResource};

/// Maps resource kind strings to their lifecycle implementations.
pub struct Provider {
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    /// A provider with `dnd5e_character` and `dnd5e_roll` registered.
    pub fn new() -> Self {
        let mut provider = Self::empty();
        provider.register(Box::new(CharacterResource));
        provider.register(Box::new(RollResource));
        provider
    }

    /// A provider with nothing registered.
    pub fn empty() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    /// Register a resource kind, replacing any previous one with the same kind.
    pub fn register(&mut self, resource: Box<dyn Resource>) {
        self.resources.insert(resource.kind(), resource);
    }

    /// Look up the implementation for a kind.
    pub fn resource(&self, kind: &str) -> DndResult<&dyn Resource> {
        self.resources
            .get(kind)
            .map(|r| r.as_ref())
            .ok_or_else(|| DndError::UnknownResourceKind(kind.to_string()))
    }

    /// Registered kinds in order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}
