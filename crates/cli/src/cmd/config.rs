//! Configuration management command
//!
//! Provides CLI interface to view and create the store configuration.

use crate::util::Paths;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use state::config::{self, Config};

/// Show the effective configuration
pub fn run_show(paths: &Paths) -> Result<()> {
    let config = paths.load_config()?;

    println!("{}", "Store Configuration".bold());
    println!("{}: {}", "Location".dimmed(), paths.config_file.display().dimmed());
    if !paths.config_file.exists() {
        println!("{}", "(file missing, showing defaults)".dimmed());
    }

    println!("\n{}", "[store]".yellow());
    println!(
        "  {} = {} {}",
        "flush_interval_ms".cyan(),
        config.store.flush_interval_ms,
        format!("({:?})", config.store.flush_interval()).dimmed()
    );
    println!("  {} = {:?}", "file_name".cyan(), config.store.file_name);

    println!("\n{}", "Valid Ranges:".bold());
    println!(
        "  flush_interval_ms: {}-{}",
        config::FLUSH_INTERVAL_RANGE_MS.start(),
        config::FLUSH_INTERVAL_RANGE_MS.end()
    );

    Ok(())
}

/// Print example configuration
pub fn run_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Create the config file with defaults if it does not exist
pub fn run_init(paths: &Paths) -> Result<()> {
    if paths.config_file.exists() {
        println!("{}", paths.config_file.display());
        println!("{}", "Config file already exists; left unchanged.".yellow());
        return Ok(());
    }

    Config::default()
        .save(&paths.config_file)
        .with_context(|| format!("Failed to write {}", paths.config_file.display()))?;
    println!("{} Created config file at: {}", "✓".green(), paths.config_file.display());

    Ok(())
}
