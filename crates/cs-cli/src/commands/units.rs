use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(file: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog(file)?;

    if catalog.is_empty() {
        println!("  No unit types defined.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Name", "Radius", "Speed", "Vision", "Range", "Health", "Attack", "Cooldown", "Stops",
    ]);

    for t in catalog.iter() {
        let stops = if t.only_attack_when_stopped { "yes" } else { "no" };
        table.add_row(vec![
            t.name.clone(),
            t.radius.to_string(),
            t.max_speed.to_string(),
            t.vision_range.to_string(),
            t.attack_range.to_string(),
            t.max_health.to_string(),
            t.attack.to_string(),
            t.cooldown.to_string(),
            stops.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} unit types", catalog.len());

    Ok(())
}
