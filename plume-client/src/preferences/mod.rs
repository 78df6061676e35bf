//! Moderation preference synchronization
//!
//! The server is the authority of record. Every mutation is sent first and
//! applied locally only once the server confirms it.

pub mod controller;
pub mod store;
pub mod tickets;

pub use controller::{
    ControllerOptions, PreferenceSyncController, SYNC_FAILURE_TOAST, SyncMarker,
};
pub use store::PreferencesStore;
pub use tickets::{PreferenceField, Ticket, TicketBook};
