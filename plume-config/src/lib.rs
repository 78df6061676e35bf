//! Shared configuration library for the Plume client core.
//!
//! Centralizes config defaults, loading order and validation so the client
//! crate and its binary agree on a single source of truth.

pub mod loader;
pub mod models;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::ClientConfig;
