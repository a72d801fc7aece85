//! # Syncwall Sync Controller (syncwall-sc)
//!
//! Drives several independently buffered media streams so they play in
//! lockstep: one sink's clock is authoritative and every other sink is
//! continuously corrected toward it.
//!
//! **Architecture:** discovery -> registry bootstrap -> sync session
//! (interval-driven correction loop) + transport controller, with an
//! HTTP/SSE control interface.

pub mod api;
pub mod config;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod sink;
pub mod state;
pub mod sync;
pub mod transport;

pub use error::{Error, Result};
pub use state::SharedState;
