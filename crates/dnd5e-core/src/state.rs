use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::{ResourceAddress, ResourceId};
use crate::error::{DndError, DndResult};
use crate::record::Record;

/// The persisted record of one tracked resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Identifier assigned at creation.
    pub id: ResourceId,
    /// Flat attribute record: user-supplied and derived fields.
    pub attributes: Record,
    /// Timestamp when the resource was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the resource was last written.
    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    /// Create a freshly created resource record.
    pub fn new(id: ResourceId, attributes: Record) -> Self {
        let now = Utc::now();
        Self {
            id,
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the attributes, bumping `updated_at` only if they changed.
    pub fn write(&mut self, attributes: Record) {
        if self.attributes != attributes {
            self.attributes = attributes;
            self.updated_at = Utc::now();
        }
    }
}

/// All resources tracked by the host, keyed by address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// Identifies this state's history across saves.
    pub lineage: Uuid,
    /// Incremented on every save that changed something.
    pub serial: u64,
    resources: BTreeMap<ResourceAddress, ResourceState>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// An empty state with a fresh lineage.
    pub fn new() -> Self {
        Self {
            lineage: Uuid::new_v4(),
            serial: 0,
            resources: BTreeMap::new(),
        }
    }

    /// Load state from a JSON file. A missing file yields an empty state.
    pub fn load(path: &Path) -> DndResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(|source| DndError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DndError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write state to a JSON file.
    pub fn save(&self, path: &Path) -> DndResult<()> {
        let content = serde_json::to_string_pretty(self).map_err(|source| DndError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content + "\n").map_err(|source| DndError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Look up a tracked resource.
    pub fn get(&self, address: &ResourceAddress) -> Option<&ResourceState> {
        self.resources.get(address)
    }

    /// Look up a tracked resource for mutation.
    pub fn get_mut(&mut self, address: &ResourceAddress) -> Option<&mut ResourceState> {
        self.resources.get_mut(address)
    }

    /// Start tracking a resource, replacing any previous entry.
    pub fn insert(&mut self, address: ResourceAddress, resource: ResourceState) {
        self.resources.insert(address, resource);
    }

    /// Stop tracking a resource.
    pub fn remove(&mut self, address: &ResourceAddress) -> DndResult<ResourceState> {
        self.resources
            .remove(address)
            .ok_or_else(|| DndError::ResourceNotFound(address.clone()))
    }

    /// Iterate over tracked resources in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceAddress, &ResourceState)> {
        self.resources.iter()
    }

    /// Iterate over tracked addresses in order.
    pub fn addresses(&self) -> impl Iterator<Item = &ResourceAddress> {
        self.resources.keys()
    }

    /// Number of tracked resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> State {
        let mut state = State::new();
        state.insert(
            ResourceAddress::new("dnd5e_roll", "init"),
            ResourceState::new(ResourceId::new("13"), Record::new().with("total", 13)),
        );
        state
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = State::load(&dir.path().join("nope.json")).unwrap();
        assert!(state.is_empty());
        assert_eq!(state.serial, 0);
    }

    #[test]
    fn save_then_load_preserves_resources() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let state = sample();
        state.save(&path).unwrap();

        let loaded = State::load(&path).unwrap();
        assert_eq!(loaded.lineage, state.lineage);
        let addr = ResourceAddress::new("dnd5e_roll", "init");
        assert_eq!(loaded.get(&addr), state.get(&addr));
    }

    #[test]
    fn load_malformed_file_is_json_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(State::load(&path), Err(DndError::Json { .. })));
    }

    #[test]
    fn remove_untracked_is_not_found() {
        let mut state = sample();
        let missing = ResourceAddress::new("dnd5e_roll", "other");
        assert!(matches!(
            state.remove(&missing),
            Err(DndError::ResourceNotFound(_))
        ));
        assert!(state.remove(&ResourceAddress::new("dnd5e_roll", "init")).is_ok());
        assert!(state.is_empty());
    }

    #[test]
    fn write_keeps_timestamp_when_unchanged() {
        let mut rs = ResourceState::new(ResourceId::new("x"), Record::new().with("a", 1));
        let before = rs.updated_at;
        rs.write(Record::new().with("a", 1));
        assert_eq!(rs.updated_at, before);
    }
}
