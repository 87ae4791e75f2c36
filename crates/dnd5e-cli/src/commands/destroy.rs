use std::path::Path;

use dnd5e_mechanics::Provider;
use dnd5e_mechanics::reconcile;

pub fn run(state_path: &Path) -> Result<(), String> {
    let provider = Provider::new();
    let mut state = super::load_state(state_path)?;

    let plan = reconcile::plan_destroy(&state);
    if plan.is_empty() {
        println!("  Nothing to destroy.");
        return Ok(());
    }

    super::print_plan(&plan, &state);
    println!();

    let result = reconcile::apply(&provider, &plan, &mut state, &mut super::rng(None));
    super::save_state(&state, state_path)?;
    let summary = result.map_err(|e| e.to_string())?;

    println!("  Destroy complete! Resources: {} destroyed.", summary.destroyed);
    Ok(())
}
