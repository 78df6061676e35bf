//! Client core for Plume moderation preferences and theming.
//!
//! - [`preferences::PreferenceSyncController`] keeps the local preference
//!   cache in step with the server.
//! - [`theme::ThemeController`] resolves the effective color scheme from
//!   the user's appearance mode and the OS.
//! - [`app::AppContext`] wires both together from a
//!   [`plume_config::ClientConfig`].

pub mod app;
pub mod appearance;
pub mod errors;
pub mod infrastructure;
pub mod preferences;
pub mod theme;

pub use app::AppContext;
pub use errors::{RemoteError, SyncError, SyncResult};
pub use preferences::PreferenceSyncController;
pub use theme::{ThemeController, ThemeState, resolve};
