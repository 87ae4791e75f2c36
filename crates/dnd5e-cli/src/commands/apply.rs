use std::path::Path;

use dnd5e_mechanics::Provider;
use dnd5e_mechanics::reconcile::{self, Config};

pub fn run(state_path: &Path, config_path: &Path, seed: Option<u64>) -> Result<(), String> {
    let provider = Provider::new();
    let config = Config::load(config_path).map_err(|e| e.to_string())?;
    let mut state = super::load_state(state_path)?;

    let refreshed = reconcile::refresh(&provider, &mut state).map_err(|e| e.to_string())?;
    let plan = reconcile::plan(&provider, &config, &state).map_err(|e| e.to_string())?;

    if refreshed > 0 {
        state.serial += 1;
    }

    if plan.is_empty() {
        if refreshed > 0 {
            super::save_state(&state, state_path)?;
        }
        println!("  No changes. Resources are up to date.");
        return Ok(());
    }

    super::print_plan(&plan, &state);
    println!();

    let mut rng = super::rng(seed);
    let result = reconcile::apply(&provider, &plan, &mut state, &mut rng);
    // Whatever was applied before a failure is still tracked.
    super::save_state(&state, state_path)?;
    let summary = result.map_err(|e| e.to_string())?;

    println!("  Apply complete! Resources: {summary}.");
    Ok(())
}
