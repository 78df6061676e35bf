//! Test doubles for the preferences service and feedback sinks.
//!
//! Compiled for unit tests and behind the `testing` feature so the
//! integration tests in `tests/` can drive the controllers without a
//! server.

pub mod stubs;

pub use stubs::feedback::{RecordingErrorLog, RecordingNotifier};
pub use stubs::preferences::{PreferencesCall, TestPreferencesService};
