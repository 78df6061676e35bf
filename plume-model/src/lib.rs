//! Core data model definitions shared across Plume crates.
#![allow(missing_docs)]

#[cfg(feature = "serde")]
pub mod api;
pub mod appearance;
pub mod error;
pub mod labels;
pub mod preferences;
pub mod routes;

pub use appearance::{AppearanceMode, ColorScheme};
pub use error::{ModelError, Result as ModelResult};
pub use labels::{LabelGroup, LabelGroupInfo, LabelPreference};
pub use preferences::PreferencesState;
