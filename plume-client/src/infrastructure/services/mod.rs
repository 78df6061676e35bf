pub mod preferences;

pub use preferences::{PreferencesApiAdapter, PreferencesService};
