//! Persistent application state
//!
//! This crate provides:
//! - A declarative table of typed attributes with defaults
//! - An in-memory store whose writes are debounced to a JSON file
//! - Atomic file replacement for the state document
//! - TOML configuration of the store

pub mod attribute;
pub mod config;
pub mod error;
pub mod persist;
pub mod store;

// Re-exports
pub use attribute::{
    Attribute, AttributeDef, AttributeValue, Schema, APPLICATION_STATE,
    CLOSE_ALL_TABS_WARNING_DISMISSED, LARGE_PASTE_WARNING_DISMISSED,
    MULTI_LINE_PASTE_WARNING_DISMISSED,
};
pub use config::{Config, StoreConfig};
pub use error::{Result, StateError};
pub use store::AppState;
