//! Set or reset an attribute
//!
//! The owed write is flushed before reporting success, so the value is on
//! disk by the time the command returns even though writes are debounced.

use crate::util::{self, Paths};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use state::AppState;

/// Set an attribute from a JSON (or bare string) value
pub fn run(paths: &Paths, name: &str, raw: &str) -> Result<()> {
    let attr = util::find_attribute(name)?;
    let value = util::parse_value(raw);

    let state = paths.open_state()?;
    state
        .set_json(attr, value.clone())
        .with_context(|| format!("Invalid value for {}", attr.name()))?;
    save(&state)?;

    println!("{} {} = {}", "✓".green(), attr.name().cyan(), value);
    Ok(())
}

/// Restore an attribute's default value
pub fn run_reset(paths: &Paths, name: &str) -> Result<()> {
    let attr = util::find_attribute(name)?;
    let default = attr.default_json();

    let state = paths.open_state()?;
    state.set_json(attr, default.clone())?;
    save(&state)?;

    println!("{} {} reset to {}", "✓".green(), attr.name().cyan(), default);
    Ok(())
}

fn save(state: &AppState) -> Result<()> {
    state
        .try_flush()
        .with_context(|| format!("Failed to save {}", state.path().display()))?;
    Ok(())
}
