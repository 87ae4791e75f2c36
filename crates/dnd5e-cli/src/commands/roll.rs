use dnd5e_core::Record;
use dnd5e_mechanics::dice::{MODIFIER, NUMBER, SIDES};
use dnd5e_mechanics::{RollParams, roll_dice};

pub fn run(number: i64, sides: i64, modifier: i64, seed: Option<u64>) -> Result<(), String> {
    let record = Record::new()
        .with(NUMBER, number)
        .with(SIDES, sides)
        .with(MODIFIER, modifier);
    let params = RollParams::from_record(&record).map_err(|e| e.to_string())?;

    let outcome = roll_dice(&params, &mut super::rng(seed));
    println!("  {params}: {outcome}");
    Ok(())
}
