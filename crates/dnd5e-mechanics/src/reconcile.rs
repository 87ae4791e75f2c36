//! The reconciliation loop: compare desired configuration with tracked
//! state, plan the difference, and apply it.
//!
//! Planning runs every validation (including the experience-points
//! monotonicity rule) before anything is derived or rolled, so a plan that
//! fails leaves state untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use dnd5e_core::{DndError, DndResult, Record, ResourceAddress, ResourceState, State};
use serde::{Deserialize, Serialize};

use crate::dice::RandomSource;
use crate::provider::Provider;
pub use crate::resource::Action;

/// Desired resources, as written by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Desired record per address.
    #[serde(default)]
    pub resources: BTreeMap<ResourceAddress, Record>,
}

impl Config {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> DndResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DndError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DndError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}

/// The planned change for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    /// The resource affected.
    pub address: ResourceAddress,
    /// What will happen to it.
    pub action: Action,
    /// User-supplied keys that change.
    pub changed: BTreeSet<String>,
    /// Computed keys that are unknown until apply.
    pub unknown: BTreeSet<String>,
    /// The expected record after apply, minus the unknown keys.
    pub planned: Record,
    /// The normalized desired record. Empty for deletes.
    pub desired: Record,
}

/// Every planned change, in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Planned changes, including no-ops.
    pub changes: Vec<PlannedChange>,
}

impl Plan {
    /// Changes that will actually do something.
    pub fn actionable(&self) -> impl Iterator<Item = &PlannedChange> {
        self.changes.iter().filter(|c| c.action != Action::NoOp)
    }

    /// Returns true if applying would change nothing.
    pub fn is_empty(&self) -> bool {
        self.actionable().next().is_none()
    }

    /// How many resources applying will add, change, and destroy.
    pub fn summary(&self) -> ApplySummary {
        let mut summary = ApplySummary::default();
        for change in &self.changes {
            summary.record(change.action);
        }
        summary
    }
}

/// Counts of what a plan did or will do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    /// Resources created (including the create half of a replace).
    pub added: usize,
    /// Resources updated in place.
    pub changed: usize,
    /// Resources deleted (including the delete half of a replace).
    pub destroyed: usize,
}

impl ApplySummary {
    fn record(&mut self, action: Action) {
        match action {
            Action::Create => self.added += 1,
            Action::Update => self.changed += 1,
            Action::Replace => {
                self.added += 1;
                self.destroyed += 1;
            }
            Action::Delete => self.destroyed += 1,
            Action::NoOp => {}
        }
    }

    /// Total number of resources touched.
    pub fn total(&self) -> usize {
        self.added + self.changed + self.destroyed
    }
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} changed, {} destroyed",
            self.added, self.changed, self.destroyed
        )
    }
}

/// Re-read every tracked resource. Returns how many records changed.
pub fn refresh(provider: &Provider, state: &mut State) -> DndResult<usize> {
    let addresses: Vec<ResourceAddress> = state.addresses().cloned().collect();
    let mut refreshed = 0;
    for address in addresses {
        let resource = provider.resource(&address.kind).map_err(|e| e.at(&address))?;
        let Some(current) = state.get_mut(&address) else {
            continue;
        };
        let record = resource.read(current).map_err(|e| e.at(&address))?;
        if record != current.attributes {
            tracing::debug!(%address, "refresh changed stored attributes");
            refreshed += 1;
        }
        current.write(record);
    }
    Ok(refreshed)
}

/// Plan the changes needed to converge `state` to `config`.
pub fn plan(provider: &Provider, config: &Config, state: &State) -> DndResult<Plan> {
    let addresses: BTreeSet<&ResourceAddress> =
        config.resources.keys().chain(state.addresses()).collect();

    let mut changes = Vec::with_capacity(addresses.len());
    for address in addresses {
        let resource = provider.resource(&address.kind).map_err(|e| e.at(address))?;
        let prior = state.get(address);

        let change = match config.resources.get(address) {
            Some(config_record) => {
                let desired = resource
                    .normalize(config_record)
                    .map_err(|e| e.at(address))?;
                let planned = resource.plan(prior, &desired).map_err(|e| e.at(address))?;
                PlannedChange {
                    address: address.clone(),
                    action: planned.action,
                    changed: planned.changed,
                    unknown: planned.unknown,
                    planned: planned.planned,
                    desired,
                }
            }
            None => delete_change(address, prior),
        };
        tracing::debug!(address = %change.address, action = %change.action, "planned");
        changes.push(change);
    }

    Ok(Plan { changes })
}

/// Plan the deletion of every tracked resource.
pub fn plan_destroy(state: &State) -> Plan {
    Plan {
        changes: state
            .iter()
            .map(|(address, current)| delete_change(address, Some(current)))
            .collect(),
    }
}

fn delete_change(address: &ResourceAddress, prior: Option<&ResourceState>) -> PlannedChange {
    PlannedChange {
        address: address.clone(),
        action: Action::Delete,
        changed: prior
            .map(|p| p.attributes.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default(),
        unknown: BTreeSet::new(),
        planned: Record::new(),
        desired: Record::new(),
    }
}

/// Execute a plan against `state`.
///
/// Changes are applied in plan order. On error, the changes applied so far
/// remain in `state`.
pub fn apply(
    provider: &Provider,
    plan: &Plan,
    state: &mut State,
    rng: &mut dyn RandomSource,
) -> DndResult<ApplySummary> {
    let mut summary = ApplySummary::default();
    let mut failure = None;
    for change in plan.actionable() {
        if let Err(e) = apply_change(provider, change, state, rng) {
            failure = Some(e.at(&change.address));
            break;
        }
        summary.record(change.action);
    }

    if summary.total() > 0 {
        state.serial += 1;
    }
    if let Some(e) = failure {
        return Err(e);
    }

    tracing::info!(
        added = summary.added,
        changed = summary.changed,
        destroyed = summary.destroyed,
        "apply complete"
    );
    Ok(summary)
}

fn apply_change(
    provider: &Provider,
    change: &PlannedChange,
    state: &mut State,
    rng: &mut dyn RandomSource,
) -> DndResult<()> {
    let address = &change.address;
    let resource = provider.resource(&address.kind)?;

    match change.action {
        Action::NoOp => {}
        Action::Create => {
            let (id, record) = resource.create(address, &change.desired, rng)?;
            state.insert(address.clone(), ResourceState::new(id, record));
        }
        Action::Update => {
            let prior = state
                .get(address)
                .ok_or_else(|| DndError::ResourceNotFound(address.clone()))?;
            let record = resource.update(address, prior, &change.desired)?;
            if let Some(current) = state.get_mut(address) {
                current.write(record);
            }
        }
        Action::Replace => {
            let prior = state.remove(address)?;
            resource.delete(&prior)?;
            tracing::info!(%address, id = %prior.id, "replacing");
            let (id, record) = resource.create(address, &change.desired, rng)?;
            state.insert(address.clone(), ResourceState::new(id, record));
        }
        Action::Delete => {
            let prior = state.remove(address)?;
            resource.delete(&prior)?;
            tracing::info!(%address, id = %prior.id, "destroyed");
        }
    }
    Ok(())
}
