//! Application state store with debounced persistence

use crate::attribute::{Attribute, AttributeDef, AttributeValue, Schema, APPLICATION_STATE};
use crate::config::{Config, DEFAULT_FLUSH_INTERVAL};
use crate::error::{Result, StateError};
use crate::persist;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use throttle::ThrottledSignal;
use tracing::{debug, error, warn};

/// In-memory mirror of a persisted attribute document
///
/// Reads and writes are served from memory. Every mutation requests a
/// trailing-edge debounced write of the whole document, so a burst of
/// changes costs one file replacement per interval. Dropping the store
/// cancels the timer and writes any change that is still owed.
///
/// ```no_run
/// use state::{AppState, LARGE_PASTE_WARNING_DISMISSED};
///
/// let state = AppState::open("/tmp/app/state.json");
/// state.set(&LARGE_PASTE_WARNING_DISMISSED, true);
/// assert!(state.get(&LARGE_PASTE_WARNING_DISMISSED));
/// ```
pub struct AppState {
    shared: Arc<Shared>,
    writer: ThrottledSignal,
}

/// State reachable from the writer's timer thread
struct Shared {
    path: PathBuf,
    schema: &'static Schema,
    /// storage key -> value, always holding every schema attribute
    values: RwLock<Map<String, Value>>,
    /// The last background write failed; the document is still owed
    write_failed: AtomicBool,
}

impl AppState {
    /// Open the application state document at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with(path, &APPLICATION_STATE, DEFAULT_FLUSH_INTERVAL)
    }

    /// Open the application state document inside `state_dir` as configured
    pub fn from_config(state_dir: &Path, config: &Config) -> Self {
        Self::open_with(
            config.store.state_path(state_dir),
            &APPLICATION_STATE,
            config.store.flush_interval(),
        )
    }

    /// Open a document at `path` described by `schema`.
    ///
    /// A missing, empty or malformed file yields defaults.
    pub fn open_with(path: impl Into<PathBuf>, schema: &'static Schema, interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            path: path.into(),
            schema,
            values: RwLock::new(schema.defaults()),
            write_failed: AtomicBool::new(false),
        });
        shared.read();

        let writer = {
            let shared = Arc::clone(&shared);
            ThrottledSignal::trailing(interval, move |()| shared.write())
        };

        Self { shared, writer }
    }

    /// Current value of `attr`, or its default if absent or unreadable
    pub fn get<T: AttributeValue>(&self, attr: &Attribute<T>) -> T {
        let value = self.shared.values.read().get(attr.key()).cloned();

        match value.map(serde_json::from_value::<T>) {
            Some(Ok(v)) => v,
            Some(Err(e)) => {
                warn!("attribute {} holds an unexpected value: {}", attr.key(), e);
                attr.default_value()
            }
            None => attr.default_value(),
        }
    }

    /// Update `attr` in memory and schedule a write
    pub fn set<T: AttributeValue>(&self, attr: &Attribute<T>, value: T) {
        match serde_json::to_value(value) {
            Ok(json) => self.store(attr.key(), json),
            Err(e) => error!("cannot represent value for {}: {}", attr.key(), e),
        }
    }

    /// Restore `attr` to its default
    pub fn reset<T: AttributeValue>(&self, attr: &Attribute<T>) {
        self.set(attr, attr.default_value());
    }

    /// Current value of an attribute in JSON form
    pub fn get_json(&self, attr: &dyn AttributeDef) -> Value {
        self.shared
            .values
            .read()
            .get(attr.key())
            .cloned()
            .unwrap_or_else(|| attr.default_json())
    }

    /// Set an attribute from JSON, rejecting values of the wrong type
    pub fn set_json(&self, attr: &dyn AttributeDef, value: Value) -> Result<()> {
        attr.check(&value).map_err(|source| StateError::AttributeType {
            key: attr.key(),
            source,
        })?;
        self.store(attr.key(), value);
        Ok(())
    }

    fn store(&self, key: &str, value: Value) {
        {
            let mut values = self.shared.values.write();
            values.insert(key.to_string(), value);
        }

        // Outside the lock: the timer callback takes it to snapshot
        self.writer.call();
    }

    /// Re-read the document from disk, replacing in-memory values
    pub fn reload(&self) {
        self.shared.read();
    }

    /// Write any owed change now instead of waiting for the timer.
    ///
    /// Returns `true` if a write was owed.
    pub fn flush(&self) -> bool {
        self.writer.flush()
    }

    /// Like [`flush`](Self::flush), but reports a failed write.
    ///
    /// Also retries a background write that failed earlier. Returns
    /// `Ok(true)` if a write was owed and has now reached disk.
    pub fn try_flush(&self) -> Result<bool> {
        let pending = self.writer.take_pending().is_some();
        if !pending && !self.shared.write_failed.load(Ordering::Acquire) {
            return Ok(false);
        }

        self.shared.try_write()?;
        Ok(true)
    }

    /// Whether a change is waiting to be written
    pub fn has_pending_write(&self) -> bool {
        self.writer.is_pending()
    }

    /// Copy of the document as it would be persisted now
    pub fn snapshot(&self) -> Map<String, Value> {
        self.shared.values.read().clone()
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    pub fn schema(&self) -> &'static Schema {
        self.shared.schema
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        // Cancels an armed write (or waits out one in progress), then
        // performs the cancelled or previously failed write synchronously.
        match self.try_flush() {
            Ok(true) => debug!("flushed pending state to {}", self.shared.path.display()),
            Ok(false) => {}
            Err(e) => error!("failed to write state to {}: {}", self.shared.path.display(), e),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("path", &self.shared.path)
            .field("schema", self.shared.schema)
            .field("writer", &self.writer)
            .finish()
    }
}

impl Shared {
    /// Replace in-memory values with the document on disk.
    ///
    /// Any failure starts over from defaults.
    fn read(&self) {
        let values = match self.load() {
            Ok(values) => values,
            Err(e) => {
                warn!("discarding state at {}: {}", self.path.display(), e);
                self.schema.defaults()
            }
        };

        *self.values.write() = values;
    }

    fn load(&self) -> Result<Map<String, Value>> {
        match persist::read_if_exists(&self.path)? {
            Some(data) if !data.trim().is_empty() => {
                debug!("loading state from {}", self.path.display());
                parse_document(self.schema, &data)
            }
            _ => {
                debug!("no state at {}, using defaults", self.path.display());
                Ok(self.schema.defaults())
            }
        }
    }

    /// Snapshot, serialize and atomically replace the document.
    ///
    /// Errors are logged; memory stays authoritative and the next mutation
    /// retries.
    fn write(&self) {
        if let Err(e) = self.try_write() {
            error!("failed to write state to {}: {}", self.path.display(), e);
        }
    }

    fn try_write(&self) -> Result<()> {
        let snapshot = self.values.read().clone();

        let outcome = write_document(&self.path, &snapshot);
        self.write_failed.store(outcome.is_err(), Ordering::Release);
        outcome
    }
}

/// Parse a state document against `schema`.
///
/// Unknown keys are ignored and missing or `null` keys keep their defaults.
/// A known key of the wrong type rejects the whole document.
pub fn parse_document(schema: &Schema, data: &str) -> Result<Map<String, Value>> {
    let root: Value = serde_json::from_str(data)?;
    let object = match root {
        Value::Object(object) => object,
        other => return Err(StateError::NotAnObject(json_kind(&other))),
    };

    let mut values = schema.defaults();
    for attr in schema.attributes() {
        match object.get(attr.key()) {
            None | Some(Value::Null) => {}
            Some(value) => {
                attr.check(value).map_err(|source| StateError::AttributeType {
                    key: attr.key(),
                    source,
                })?;
                values.insert(attr.key().to_string(), value.clone());
            }
        }
    }

    Ok(values)
}

fn write_document(path: &Path, document: &Map<String, Value>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    persist::atomic_write(path, text.as_bytes())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
