//! Declarative attribute table
//!
//! Each persisted attribute is an ordinary [`Attribute<T>`] value: a display
//! name, the JSON key it is stored under, and a default. A [`Schema`] lists
//! the attributes of one document; loading, persisting and lookup by name all
//! walk that list instead of carrying per-field code.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Types that can be stored as attribute values
pub trait AttributeValue: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> AttributeValue for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// A typed, named attribute with a default
pub struct Attribute<T> {
    name: &'static str,
    key: &'static str,
    default: fn() -> T,
}

impl<T> Attribute<T> {
    pub const fn new(name: &'static str, key: &'static str, default: fn() -> T) -> Self {
        Self { name, key, default }
    }

    /// Human-readable name, e.g. `LargePasteWarningDismissed`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// JSON key in the state document
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }
}

impl<T> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

/// Type-erased view of an [`Attribute`], used by schema-wide operations
pub trait AttributeDef: Sync {
    fn name(&self) -> &'static str;

    fn key(&self) -> &'static str;

    /// Default value in its JSON form
    fn default_json(&self) -> Value;

    /// Check that `value` decodes as this attribute's type
    fn check(&self, value: &Value) -> Result<(), serde_json::Error>;
}

impl<T: AttributeValue> AttributeDef for Attribute<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn key(&self) -> &'static str {
        self.key
    }

    fn default_json(&self) -> Value {
        serde_json::to_value(self.default_value()).unwrap_or(Value::Null)
    }

    fn check(&self, value: &Value) -> Result<(), serde_json::Error> {
        T::deserialize(value).map(drop)
    }
}

/// Ordered table of the attributes stored in one document
pub struct Schema {
    attributes: &'static [&'static dyn AttributeDef],
}

impl Schema {
    pub const fn new(attributes: &'static [&'static dyn AttributeDef]) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> impl Iterator<Item = &'static dyn AttributeDef> + '_ {
        self.attributes.iter().copied()
    }

    /// Find an attribute by name (case-insensitive) or exact storage key
    pub fn find(&self, name_or_key: &str) -> Option<&'static dyn AttributeDef> {
        self.attributes()
            .find(|a| a.key() == name_or_key || a.name().eq_ignore_ascii_case(name_or_key))
    }

    /// A document holding every attribute at its default
    pub fn defaults(&self) -> Map<String, Value> {
        self.attributes()
            .map(|a| (a.key().to_string(), a.default_json()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.attributes().map(|a| a.key()))
            .finish()
    }
}

/// "Close all tabs?" confirmation was dismissed permanently
pub static CLOSE_ALL_TABS_WARNING_DISMISSED: Attribute<bool> = Attribute::new(
    "CloseAllTabsWarningDismissed",
    "closeAllTabsWarningDismissed",
    || false,
);

/// Large paste confirmation was dismissed permanently
pub static LARGE_PASTE_WARNING_DISMISSED: Attribute<bool> = Attribute::new(
    "LargePasteWarningDismissed",
    "largePasteWarningDismissed",
    || false,
);

/// Multi-line paste confirmation was dismissed permanently
pub static MULTI_LINE_PASTE_WARNING_DISMISSED: Attribute<bool> = Attribute::new(
    "MultiLinePasteWarningDismissed",
    "multiLinePasteWarningDismissed",
    || false,
);

/// Attributes of the application state document
pub static APPLICATION_STATE: Schema = Schema::new(&[
    &CLOSE_ALL_TABS_WARNING_DISMISSED,
    &LARGE_PASTE_WARNING_DISMISSED,
    &MULTI_LINE_PASTE_WARNING_DISMISSED,
]);
