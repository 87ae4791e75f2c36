use std::path::Path;

use dnd5e_mechanics::Provider;
use dnd5e_mechanics::reconcile::{self, Config};

pub fn run(state_path: &Path, config_path: &Path) -> Result<(), String> {
    let provider = Provider::new();
    let config = Config::load(config_path).map_err(|e| e.to_string())?;
    let mut state = super::load_state(state_path)?;

    reconcile::refresh(&provider, &mut state).map_err(|e| e.to_string())?;
    let plan = reconcile::plan(&provider, &config, &state).map_err(|e| e.to_string())?;

    if plan.is_empty() {
        println!("  No changes. Resources are up to date.");
        return Ok(());
    }

    super::print_plan(&plan, &state);
    Ok(())
}
