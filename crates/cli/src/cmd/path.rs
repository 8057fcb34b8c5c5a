//! Show where state is stored

use crate::util::Paths;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(paths: &Paths) -> Result<()> {
    let state_file = paths.state_file()?;
    println!("{}", state_file.display());

    if !state_file.exists() {
        eprintln!("{}", "File does not exist yet; it is created on the first change.".yellow());
    }
    Ok(())
}
