//! The `dnd5e_character` resource.

use dnd5e_core::{DndResult, Record, ResourceAddress, ResourceId, ResourceState};

use super::{Action, Resource, ResourcePlan};
use crate::character::Character;
use crate::dice::RandomSource;
use crate::staleness::{self, DerivedField};

/// Kind string for characters.
pub const KIND: &str = "dnd5e_character";

/// Character sheets whose derived fields are recomputed on every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterResource;

impl CharacterResource {
    fn materialize(character: &Character) -> Record {
        let mut record = character.to_record();
        character.derive().write_to(&mut record);
        record
    }
}

impl Resource for CharacterResource {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn normalize(&self, config: &Record) -> DndResult<Record> {
        Ok(Character::from_record(config)?.to_record())
    }

    fn plan(&self, prior: Option<&ResourceState>, desired: &Record) -> DndResult<ResourcePlan> {
        let Some(prior) = prior else {
            return Ok(ResourcePlan {
                action: Action::Create,
                changed: desired.iter().map(|(k, _)| k.clone()).collect(),
                unknown: DerivedField::all().map(|f| f.key().to_string()).collect(),
                planned: desired.clone(),
            });
        };

        let old = Character::from_record(&prior.attributes)?;
        let new = Character::from_record(desired)?;
        staleness::check_experience_points(old.experience_points, new.experience_points)?;

        let old_record = old.to_record();
        let changed = old_record.changed_keys(desired);
        let stale = staleness::stale_fields(&staleness::changed_primitives(&old_record, desired));

        let mut planned = desired.clone();
        for field in DerivedField::all().filter(|f| !stale.contains(f)) {
            if let Some(value) = prior.attributes.get(field.key()) {
                planned.set(field.key(), value.clone());
            }
        }

        Ok(ResourcePlan {
            action: if changed.is_empty() {
                Action::NoOp
            } else {
                Action::Update
            },
            changed,
            unknown: stale.iter().map(|f| f.key().to_string()).collect(),
            planned,
        })
    }

    fn create(
        &self,
        address: &ResourceAddress,
        desired: &Record,
        _rng: &mut dyn RandomSource,
    ) -> DndResult<(ResourceId, Record)> {
        let character = Character::from_record(desired)?;
        let id = ResourceId::new(character.name.as_str());
        tracing::info!(%address, %id, "creating character");
        Ok((id, Self::materialize(&character)))
    }

    fn read(&self, current: &ResourceState) -> DndResult<Record> {
        let character = Character::from_record(&current.attributes)?;
        Ok(Self::materialize(&character))
    }

    fn update(
        &self,
        address: &ResourceAddress,
        prior: &ResourceState,
        desired: &Record,
    ) -> DndResult<Record> {
        let old = Character::from_record(&prior.attributes)?;
        let new = Character::from_record(desired)?;
        staleness::check_experience_points(old.experience_points, new.experience_points)?;

        tracing::info!(%address, id = %prior.id, "updating character");
        Ok(Self::materialize(&new))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::character::{ARMOR_CLASS, Ability, EXPERIENCE_POINTS, LEVEL};

    fn address() -> ResourceAddress {
        ResourceAddress::new(KIND, "aria")
    }

    fn config() -> Record {
        let mut record = Record::new()
            .with("name", "Aria")
            .with("class", "rogue")
            .with("alignment", "chaotic good")
            .with(EXPERIENCE_POINTS, 500);
        for ability in Ability::ALL {
            record.set(ability.key(), 10);
        }
        record.set("dexterity", 14);
        record
    }

    fn created() -> ResourceState {
        let desired = CharacterResource.normalize(&config()).unwrap();
        let (id, record) = CharacterResource
            .create(&address(), &desired, &mut StdRng::seed_from_u64(0))
            .unwrap();
        ResourceState::new(id, record)
    }

    #[test]
    fn create_assigns_name_as_id_and_derives() {
        let state = created();
        assert_eq!(state.id.as_str(), "Aria");
        assert_eq!(state.attributes.get_i64(LEVEL).unwrap(), Some(2));
        assert_eq!(state.attributes.get_i64("proficiency_bonus").unwrap(), Some(3));
        assert_eq!(state.attributes.get_i64("dexterity_modifier").unwrap(), Some(2));
        assert_eq!(state.attributes.get_i64(ARMOR_CLASS).unwrap(), Some(12));
    }

    #[test]
    fn plan_create_marks_every_derived_field_unknown() {
        let desired = CharacterResource.normalize(&config()).unwrap();
        let plan = CharacterResource.plan(None, &desired).unwrap();
        assert_eq!(plan.action, Action::Create);
        assert_eq!(plan.unknown.len(), 9);
    }

    #[test]
    fn plan_unchanged_is_noop() {
        let state = created();
        let desired = CharacterResource.normalize(&config()).unwrap();
        let plan = CharacterResource.plan(Some(&state), &desired).unwrap();
        assert_eq!(plan.action, Action::NoOp);
        assert!(plan.unknown.is_empty());
        assert_eq!(plan.planned, state.attributes);
    }

    #[test]
    fn plan_experience_change_marks_level_and_proficiency() {
        let state = created();
        let desired = CharacterResource
            .normalize(&config().with(EXPERIENCE_POINTS, 900))
            .unwrap();
        let plan = CharacterResource.plan(Some(&state), &desired).unwrap();
        assert_eq!(plan.action, Action::Update);
        assert_eq!(
            plan.unknown.into_iter().collect::<Vec<_>>(),
            vec!["level", "proficiency_bonus"]
        );
        assert!(!plan.planned.contains(LEVEL));
        assert_eq!(plan.planned.get_i64(ARMOR_CLASS).unwrap(), Some(12));
    }

    #[test]
    fn plan_rename_keeps_derived_values() {
        let state = created();
        let desired = CharacterResource
            .normalize(&config().with("name", "Aria Vale"))
            .unwrap();
        let plan = CharacterResource.plan(Some(&state), &desired).unwrap();
        assert_eq!(plan.action, Action::Update);
        assert!(plan.unknown.is_empty());
        assert!(plan.changed.contains("name"));
    }

    #[test]
    fn plan_rejects_experience_decrease() {
        let state = created();
        let desired = CharacterResource
            .normalize(&config().with(EXPERIENCE_POINTS, 400))
            .unwrap();
        let err = CharacterResource.plan(Some(&state), &desired).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn update_rejects_experience_decrease() {
        let state = created();
        let desired = CharacterResource
            .normalize(&config().with(EXPERIENCE_POINTS, 499))
            .unwrap();
        assert!(
            CharacterResource
                .update(&address(), &state, &desired)
                .is_err()
        );
    }

    #[test]
    fn update_rederives_and_keeps_id() {
        let state = created();
        let desired = CharacterResource
            .normalize(&config().with(EXPERIENCE_POINTS, 2700).with("dexterity", 8))
            .unwrap();
        let record = CharacterResource
            .update(&address(), &state, &desired)
            .unwrap();
        assert_eq!(record.get_i64(LEVEL).unwrap(), Some(4));
        assert_eq!(record.get_i64(ARMOR_CLASS).unwrap(), Some(9));
    }

    #[test]
    fn read_is_idempotent() {
        let state = created();
        let first = CharacterResource.read(&state).unwrap();
        let second = CharacterResource
            .read(&ResourceState::new(state.id.clone(), first.clone()))
            .unwrap();
        assert_eq!(first, state.attributes);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn read_repairs_tampered_derived_fields() {
        let mut state = created();
        state.attributes.set(LEVEL, 19);
        let record = CharacterResource.read(&state).unwrap();
        assert_eq!(record.get_i64(LEVEL).unwrap(), Some(2));
    }
}
