//! Persona catalog listing

use crate::error::Result;
use crate::personas;
use colored::Colorize;
use prettytable::{format, Table};

/// Prints the persona catalog
pub fn list_personas() -> Result<()> {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "Name".bold(),
        "Id".bold(),
        "Style".bold(),
        "Traits".bold()
    ]);

    for persona in personas::all() {
        table.add_row(prettytable::row![
            persona.display_name.magenta(),
            persona.id.as_str(),
            persona.archetype,
            persona.traits.join(", ")
        ]);
    }

    println!("\nPersonas:");
    table.printstd();
    println!();
    println!(
        "Start a session with {}.",
        "lovechat chat --persona <id>".cyan()
    );
    println!();

    Ok(())
}
