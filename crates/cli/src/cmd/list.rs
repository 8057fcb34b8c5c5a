//! List all attributes

use crate::util::Paths;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(paths: &Paths) -> Result<()> {
    let state = paths.open_state()?;

    println!("{}", "Application State".bold());
    println!("{}: {}\n", "Location".dimmed(), state.path().display().dimmed());

    for attr in state.schema().attributes() {
        let value = state.get_json(attr);
        let default = attr.default_json();

        if value == default {
            println!("  {} = {}", attr.name().cyan(), value);
        } else {
            println!(
                "  {} = {} {}",
                attr.name().cyan(),
                value.to_string().yellow(),
                format!("(default: {})", default).dimmed()
            );
        }
    }

    Ok(())
}
