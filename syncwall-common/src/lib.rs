//! # Syncwall Common Library
//!
//! Shared code for the syncwall services including:
//! - Event types (SyncEvent enum)
//! - API request/response types

pub mod api;
pub mod events;
