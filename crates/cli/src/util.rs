//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde_json::Value;
use state::{AppState, AttributeDef, Config, APPLICATION_STATE};
use std::path::PathBuf;
use tracing::debug;

/// Resolved locations of the state directory and config file
pub struct Paths {
    pub state_dir: PathBuf,
    pub config_file: PathBuf,
}

impl Paths {
    /// Apply defaults to the command-line overrides
    pub fn resolve(state_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Result<Self> {
        let state_dir = match state_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .context("Could not determine the user config directory; pass --state-dir")?
                .join("appstate"),
        };
        let config_file = config_file.unwrap_or_else(|| state_dir.join("config.toml"));

        Ok(Self {
            state_dir,
            config_file,
        })
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_file)
            .with_context(|| format!("Failed to load {}", self.config_file.display()))
    }

    pub fn state_file(&self) -> Result<PathBuf> {
        Ok(self.load_config()?.store.state_path(&self.state_dir))
    }

    /// Open the store as configured
    pub fn open_state(&self) -> Result<AppState> {
        let config = self.load_config()?;
        debug!(
            "opening {} (flush interval {:?})",
            config.store.state_path(&self.state_dir).display(),
            config.store.flush_interval()
        );
        Ok(AppState::from_config(&self.state_dir, &config))
    }
}

/// Look up an attribute by name or storage key
pub fn find_attribute(name: &str) -> Result<&'static dyn AttributeDef> {
    APPLICATION_STATE.find(name).with_context(|| {
        let known: Vec<_> = APPLICATION_STATE.attributes().map(|a| a.name()).collect();
        format!(
            "Unknown attribute: {}. Known attributes: {}",
            name,
            known.join(", ")
        )
    })
}

/// Parse a command-line value as JSON, falling back to a plain string
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
