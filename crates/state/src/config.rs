//! Store configuration (TOML)
//!
//! ```toml
//! [store]
//! flush_interval_ms = 1000
//! file_name = "state.json"
//! ```
//!
//! Unlike the state document, configuration is operator input: a malformed
//! or out-of-range file is reported instead of silently replaced.

use crate::error::{Result, StateError};
use crate::persist;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Default debounce interval between state writes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(DEFAULT_FLUSH_INTERVAL_MS);

/// Default state document file name
pub const DEFAULT_FILE_NAME: &str = "state.json";

/// Accepted values of `flush_interval_ms`
pub const FLUSH_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 10..=60_000;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
}

/// `[store]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Minimum spacing between writes of the state document
    pub flush_interval_ms: u64,
    /// File name of the state document inside the state directory
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Path of the state document inside `state_dir`
    pub fn state_path(&self, state_dir: &Path) -> PathBuf {
        state_dir.join(&self.file_name)
    }
}

impl Config {
    /// Load configuration from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let config = match persist::read_if_exists(path)? {
            Some(text) => toml::from_str::<Config>(&text)
                .map_err(|e| StateError::Config(format!("{}: {}", path.display(), e)))?,
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate and atomically write configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let text = toml::to_string_pretty(self)
            .map_err(|e| StateError::Config(e.to_string()))?;
        persist::atomic_write(path, text.as_bytes())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let interval = self.store.flush_interval_ms;
        if !FLUSH_INTERVAL_RANGE_MS.contains(&interval) {
            return Err(StateError::Config(format!(
                "store.flush_interval_ms must be between {} and {}, got {}",
                FLUSH_INTERVAL_RANGE_MS.start(),
                FLUSH_INTERVAL_RANGE_MS.end(),
                interval
            )));
        }

        let name = &self.store.file_name;
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(StateError::Config(format!(
                "store.file_name must be a plain file name, got {:?}",
                name
            )));
        }

        Ok(())
    }
}

/// Commented example configuration
pub fn example_config() -> &'static str {
    r#"# appstate configuration

[store]
# Minimum spacing between writes of the state document, in milliseconds.
# Valid range: 10-60000
flush_interval_ms = 1000

# State document file name inside the state directory
file_name = "state.json"
"#
}
