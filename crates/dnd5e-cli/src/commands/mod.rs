pub mod apply;
pub mod destroy;
pub mod plan;
pub mod roll;
pub mod show;

use std::path::Path;

use colored::Colorize;
use dnd5e_core::State;
use dnd5e_mechanics::{Action, Plan};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Load the state file, or an empty state if it does not exist yet.
fn load_state(path: &Path) -> Result<State, String> {
    let state = State::load(path).map_err(|e| e.to_string())?;
    tracing::debug!(
        path = %path.display(),
        serial = state.serial,
        resources = state.len(),
        "loaded state"
    );
    Ok(state)
}

fn save_state(state: &State, path: &Path) -> Result<(), String> {
    state.save(path).map_err(|e| e.to_string())?;
    tracing::debug!(path = %path.display(), serial = state.serial, "saved state");
    Ok(())
}

/// Seeded RNG if a seed was given, otherwise one seeded from the OS.
fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Print every actionable change in a plan, with old and new values.
fn print_plan(plan: &Plan, state: &State) {
    for change in plan.actionable() {
        let symbol = match change.action {
            Action::Create => change.action.symbol().green(),
            Action::Update => change.action.symbol().yellow(),
            Action::Replace | Action::Delete => change.action.symbol().red(),
            Action::NoOp => change.action.symbol().normal(),
        };
        println!(
            "  {symbol} {} ({})",
            change.address.to_string().bold(),
            change.action
        );

        let prior = state.get(&change.address).map(|p| &p.attributes);
        if change.action == Action::Delete {
            continue;
        }

        for key in &change.changed {
            let old = prior
                .and_then(|p| p.get(key))
                .map_or_else(|| "(none)".to_string(), |v| v.to_string());
            let new = change
                .desired
                .get(key)
                .map_or_else(|| "(none)".to_string(), |v| v.to_string());
            if prior.is_some() {
                println!("      {key}: {old} -> {new}");
            } else {
                println!("      {key}: {new}");
            }
        }
        for key in &change.unknown {
            println!("      {key}: {}", "(known after apply)".dimmed());
        }
    }

    let summary = plan.summary();
    println!();
    println!(
        "  Plan: {} to add, {} to change, {} to destroy.",
        summary.added, summary.changed, summary.destroyed
    );
}
