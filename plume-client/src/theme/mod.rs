//! Theme resolution
//!
//! The user picks an [`AppearanceMode`](plume_model::AppearanceMode); the
//! effective [`ColorScheme`](plume_model::ColorScheme) follows the OS only
//! while that mode is `Auto`.

pub mod controller;
pub mod resolver;

pub use controller::{ThemeController, ThemeState};
pub use resolver::resolve;
