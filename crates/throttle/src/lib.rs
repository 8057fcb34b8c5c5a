//! Coalesced, rate-limited deferred execution
//!
//! This crate provides:
//! - Pending-argument slots (last write wins, lock-free flag for no payload)
//! - A one-shot background timer with cancel-and-wait
//! - Leading- and trailing-edge throttled functions built on the two

pub mod func;
pub mod slot;
pub mod timer;

// Re-exports
pub use func::{Edge, Throttled, ThrottledFunc, ThrottledSignal};
pub use slot::{ArgSlot, FlagSlot, PendingSlot};
pub use timer::Timer;
