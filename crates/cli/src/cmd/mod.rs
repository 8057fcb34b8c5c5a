//! CLI command implementations

pub mod config;
pub mod get;
pub mod list;
pub mod path;
pub mod set;
