//! Clock sync engine
//!
//! Keeps every follower sink within a tolerance band of the master
//! clock using the least disruptive correction that converges.

pub mod engine;

pub use engine::{DriftState, SyncSession};
