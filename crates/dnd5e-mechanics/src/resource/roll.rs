//! The `dnd5e_roll` resource.
//!
//! A roll happens once, at creation. Reads never reroll, and any change to
//! its parameters replaces it with a fresh roll.

use std::collections::BTreeSet;

use dnd5e_core::{DndError, DndResult, Record, ResourceAddress, ResourceId, ResourceState};

use super::{Action, Resource, ResourcePlan};
use crate::dice::{RandomSource, RollParams, TOTAL, VALUES, roll_dice};

/// Kind string for rolls.
pub const KIND: &str = "dnd5e_roll";

/// Immutable dice-roll events.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollResource;

impl Resource for RollResource {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn normalize(&self, config: &Record) -> DndResult<Record> {
        Ok(RollParams::from_record(config)?.to_record())
    }

    fn plan(&self, prior: Option<&ResourceState>, desired: &Record) -> DndResult<ResourcePlan> {
        let outputs = || -> BTreeSet<String> { [VALUES, TOTAL].map(str::to_string).into() };

        let Some(prior) = prior else {
            return Ok(ResourcePlan {
                action: Action::Create,
                changed: desired.iter().map(|(k, _)| k.clone()).collect(),
                unknown: outputs(),
                planned: desired.clone(),
            });
        };

        let changed = RollParams::from_record(&prior.attributes)?
            .to_record()
            .changed_keys(desired);
        if changed.is_empty() {
            return Ok(ResourcePlan {
                action: Action::NoOp,
                changed,
                unknown: Default::default(),
                planned: prior.attributes.clone(),
            });
        }

        Ok(ResourcePlan {
            action: Action::Replace,
            changed,
            unknown: outputs(),
            planned: desired.clone(),
        })
    }

    fn create(
        &self,
        address: &ResourceAddress,
        desired: &Record,
        rng: &mut dyn RandomSource,
    ) -> DndResult<(ResourceId, Record)> {
        let params = RollParams::from_record(desired)?;
        let outcome = roll_dice(&params, rng);
        let id = ResourceId::new(outcome.total.to_string());
        tracing::info!(%address, roll = %params, %outcome, "rolled");

        let mut record = params.to_record();
        outcome.write_to(&mut record);
        Ok((id, record))
    }

    fn read(&self, current: &ResourceState) -> DndResult<Record> {
        Ok(current.attributes.clone())
    }

    fn update(
        &self,
        address: &ResourceAddress,
        _prior: &ResourceState,
        _desired: &Record,
    ) -> DndResult<Record> {
        Err(DndError::RequiresReplacement(address.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use dnd5e_core::Value;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::dice::{MODIFIER, NUMBER, REROLL, SIDES};

    fn address() -> ResourceAddress {
        ResourceAddress::new(KIND, "attack")
    }

    fn created(config: &Record, seed: u64) -> ResourceState {
        let desired = RollResource.normalize(config).unwrap();
        let (id, record) = RollResource
            .create(&address(), &desired, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        ResourceState::new(id, record)
    }

    #[test]
    fn create_rolls_and_uses_total_as_id() {
        let config = Record::new().with(NUMBER, 3).with(SIDES, 6).with(MODIFIER, 2);
        let state = created(&config, 11);

        let values = state.attributes.get_list(VALUES).unwrap().unwrap();
        assert_eq!(values.len(), 3);
        let sum: i64 = values.iter().map(|v| v.as_i64().unwrap()).sum();
        for v in values {
            assert!((1..=6).contains(&v.as_i64().unwrap()));
        }
        let total = state.attributes.get_i64(TOTAL).unwrap().unwrap();
        assert_eq!(total, sum + 2);
        assert_eq!(state.id.as_str(), total.to_string());
    }

    #[test]
    fn read_never_rerolls() {
        let state = created(&Record::new(), 3);
        assert_eq!(RollResource.read(&state).unwrap(), state.attributes);
    }

    #[test]
    fn unchanged_params_plan_noop() {
        let state = created(&Record::new().with(SIDES, 8), 3);
        let desired = RollResource.normalize(&Record::new().with(SIDES, 8)).unwrap();
        let plan = RollResource.plan(Some(&state), &desired).unwrap();
        assert_eq!(plan.action, Action::NoOp);
        assert_eq!(plan.planned, state.attributes);
    }

    #[test]
    fn explicit_defaults_are_not_a_change() {
        let state = created(&Record::new(), 3);
        let desired = RollResource
            .normalize(&Record::new().with(NUMBER, 1).with(SIDES, 20).with(MODIFIER, 0))
            .unwrap();
        let plan = RollResource.plan(Some(&state), &desired).unwrap();
        assert_eq!(plan.action, Action::NoOp);
    }

    #[test]
    fn any_param_change_replaces() {
        let state = created(&Record::new(), 3);
        let mut reroll = BTreeMap::new();
        reroll.insert("1".to_string(), Value::from(true));

        for config in [
            Record::new().with(NUMBER, 2),
            Record::new().with(SIDES, 12),
            Record::new().with(MODIFIER, -1),
            Record::new().with(REROLL, Value::Map(reroll)),
        ] {
            let desired = RollResource.normalize(&config).unwrap();
            let plan = RollResource.plan(Some(&state), &desired).unwrap();
            assert_eq!(plan.action, Action::Replace);
            assert!(plan.unknown.contains(TOTAL));
        }
    }

    #[test]
    fn update_in_place_is_refused() {
        let state = created(&Record::new(), 3);
        let err = RollResource
            .update(&address(), &state, &Record::new())
            .unwrap_err();
        assert!(matches!(err, DndError::RequiresReplacement(_)));
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(RollResource.normalize(&Record::new().with(SIDES, 1)).is_err());
        assert!(RollResource.normalize(&Record::new().with(NUMBER, 0)).is_err());
    }
}
