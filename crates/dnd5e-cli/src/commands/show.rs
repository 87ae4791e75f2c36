use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dnd5e_core::{Record, ResourceAddress};
use dnd5e_mechanics::character::{ARMOR_CLASS, CLASS, LEVEL};
use dnd5e_mechanics::dice::{TOTAL, VALUES};
use dnd5e_mechanics::resource::{character, roll};

pub fn run(state_path: &Path, address: Option<&str>) -> Result<(), String> {
    let state = super::load_state(state_path)?;

    if let Some(address) = address {
        let address = address
            .parse::<ResourceAddress>()
            .map_err(|e| e.to_string())?;
        let resource = state
            .get(&address)
            .ok_or_else(|| format!("resource not found in state: {address}"))?;

        println!("  {} [id {}]", address.to_string().bold(), resource.id);
        println!();
        for (key, value) in resource.attributes.iter() {
            println!("  {key} = {value}");
        }
        return Ok(());
    }

    if state.is_empty() {
        println!("  No resources tracked.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Address", "ID", "Summary"]);

    for (address, resource) in state.iter() {
        table.add_row(vec![
            address.to_string(),
            resource.id.to_string(),
            summarize(&address.kind, &resource.attributes),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} resources", state.len());
    Ok(())
}

fn summarize(kind: &str, attributes: &Record) -> String {
    let int = |key: &str| attributes.get_i64(key).ok().flatten().unwrap_or_default();
    match kind {
        character::KIND => {
            let class = attributes.get_str(CLASS).ok().flatten().unwrap_or("?");
            format!("level {} {class}, AC {}", int(LEVEL), int(ARMOR_CLASS))
        }
        roll::KIND => {
            let values = attributes
                .get(VALUES)
                .map_or_else(|| "[]".to_string(), |v| v.to_string());
            format!("{values} = {}", int(TOTAL))
        }
        _ => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_known_kinds() {
        let aria = Record::new()
            .with(CLASS, "rogue")
            .with(LEVEL, 3)
            .with(ARMOR_CLASS, 14);
        assert_eq!(summarize(character::KIND, &aria), "level 3 rogue, AC 14");

        let roll = Record::new().with(VALUES, vec![2, 5]).with(TOTAL, 7);
        assert_eq!(summarize(roll::KIND, &roll), "[2, 5] = 7");
    }

    #[test]
    fn unknown_kind_summary_is_placeholder() {
        assert_eq!(summarize("dnd5e_spell", &Record::new()), "?");
    }
}
