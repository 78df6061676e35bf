pub mod bootstrap;

pub use bootstrap::{AppContext, BootstrapError, default_appearance_source};
