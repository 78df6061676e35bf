use std::sync::Arc;

use parking_lot::Mutex;
use plume_config::ClientConfig;
use plume_model::{LabelGroup, LabelPreference, PreferencesState};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::{RemoteError, SyncError, SyncResult};
use crate::infrastructure::logging::{ErrorLog, LogContext};
use crate::infrastructure::notifications::NotificationSink;
use crate::infrastructure::services::PreferencesService;

use super::store::PreferencesStore;
use super::tickets::{PreferenceField, TicketBook};

/// Toast shown for every remote failure.
pub const SYNC_FAILURE_TOAST: &str =
    "There was an issue syncing your preferences with the server";

const UPDATE_FAILED_LOG: &str = "Failed to update preferences with server";
const SYNC_FAILED_LOG: &str = "Failed to sync preferences with server";

/// Capabilities fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Some platforms must not toggle adult content from the client.
    pub platform_allows_adult_content_toggle: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            platform_allows_adult_content_toggle: true,
        }
    }
}

impl From<&ClientConfig> for ControllerOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            platform_allows_adult_content_toggle: config
                .platform_allows_adult_content_toggle,
        }
    }
}

/// Bookkeeping for `sync()` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncMarker {
    /// Syncs started so far; also the sequence of the latest one.
    pub started: u64,
    /// Snapshots applied to the local state.
    pub applied: u64,
    /// Syncs that ended in a remote failure.
    pub failed: u64,
    /// Sequence of the most recently applied snapshot.
    pub last_applied: Option<u64>,
}

impl SyncMarker {
    pub fn in_flight(&self) -> u64 {
        self.started - self.applied - self.failed
    }
}

/// Keeps the local preference cache consistent with the server.
///
/// Mutations are confirm-then-apply: the request goes out first and the
/// local state changes only once the server accepts it.
pub struct PreferenceSyncController {
    service: Arc<dyn PreferencesService>,
    notifier: Arc<dyn NotificationSink>,
    error_log: Arc<dyn ErrorLog>,
    options: ControllerOptions,
    store: PreferencesStore,
    tickets: TicketBook,
    marker: Mutex<SyncMarker>,
}

impl std::fmt::Debug for PreferenceSyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceSyncController")
            .field("options", &self.options)
            .field("state", &self.store.current())
            .field("marker", &*self.marker.lock())
            .finish_non_exhaustive()
    }
}

impl PreferenceSyncController {
    pub fn new(
        service: Arc<dyn PreferencesService>,
        notifier: Arc<dyn NotificationSink>,
        error_log: Arc<dyn ErrorLog>,
        options: ControllerOptions,
    ) -> Self {
        Self::with_initial_state(
            service,
            notifier,
            error_log,
            options,
            PreferencesState::default(),
        )
    }

    pub fn with_initial_state(
        service: Arc<dyn PreferencesService>,
        notifier: Arc<dyn NotificationSink>,
        error_log: Arc<dyn ErrorLog>,
        options: ControllerOptions,
        initial: PreferencesState,
    ) -> Self {
        Self {
            service,
            notifier,
            error_log,
            options,
            store: PreferencesStore::new(initial),
            tickets: TicketBook::new(),
            marker: Mutex::new(SyncMarker::default()),
        }
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    /// Fetch the full snapshot and replace the local state.
    ///
    /// Concurrent calls each apply their own result as they complete, so
    /// the state ends up as the last snapshot to arrive.
    pub async fn sync(&self) -> SyncResult<()> {
        let seq = {
            let mut marker = self.marker.lock();
            marker.started += 1;
            marker.started
        };
        debug!(seq, "syncing preferences");

        match self.service.fetch_preferences().await {
            Ok(snapshot) => {
                if !snapshot.unrecognized_labels.is_empty() {
                    warn!(
                        seq,
                        labels = ?snapshot.unrecognized_labels,
                        "ignored unrecognized content labels in snapshot"
                    );
                }
                let state = PreferencesState::from(snapshot);
                let mut marker = self.marker.lock();
                marker.applied += 1;
                marker.last_applied = Some(seq);
                self.store.replace(state);
                debug!(seq, "applied preferences snapshot");
                Ok(())
            }
            Err(err) => {
                self.marker.lock().failed += 1;
                Err(self.report_failure("sync", SYNC_FAILED_LOG, err))
            }
        }
    }

    pub async fn set_adult_content_enabled(&self, enabled: bool) -> SyncResult<()> {
        if !self.options.platform_allows_adult_content_toggle {
            warn!("adult content toggle requested on a platform that disallows it");
            return Err(SyncError::CallerMisuse("adult content toggle"));
        }

        let field = PreferenceField::AdultContent;
        let ticket = self.tickets.issue(field);

        match self.service.put_adult_content_enabled(enabled).await {
            Ok(()) => {
                let applied = self.tickets.try_apply(field, ticket, || {
                    self.store.set_adult_content_enabled(enabled)
                });
                if applied {
                    info!(enabled, "adult content preference updated");
                } else {
                    warn!(
                        ticket = ticket.value(),
                        "discarded stale adult content confirmation"
                    );
                }
                Ok(())
            }
            Err(err) => {
                self.tickets.settle(field);
                Err(self.report_failure(
                    "set_adult_content_enabled",
                    UPDATE_FAILED_LOG,
                    err,
                ))
            }
        }
    }

    pub async fn set_content_label_pref(
        &self,
        group: LabelGroup,
        pref: LabelPreference,
    ) -> SyncResult<()> {
        let field = PreferenceField::ContentLabel(group);
        let ticket = self.tickets.issue(field);

        match self.service.put_content_label_pref(group, pref).await {
            Ok(()) => {
                let applied = self.tickets.try_apply(field, ticket, || {
                    self.store.set_label_pref(group, pref)
                });
                if applied {
                    info!(group = %group, pref = %pref, "content label preference updated");
                } else {
                    warn!(
                        group = %group,
                        ticket = ticket.value(),
                        "discarded stale content label confirmation"
                    );
                }
                Ok(())
            }
            Err(err) => {
                self.tickets.settle(field);
                Err(self.report_failure(
                    "set_content_label_pref",
                    UPDATE_FAILED_LOG,
                    err,
                ))
            }
        }
    }

    /// Like [`Self::set_content_label_pref`] for a raw group identifier.
    /// Unknown identifiers are rejected before any request is made.
    pub async fn set_content_label_pref_by_id(
        &self,
        group_id: &str,
        pref: LabelPreference,
    ) -> SyncResult<()> {
        let group: LabelGroup = group_id
            .parse()
            .map_err(|_| SyncError::InvalidGroup(group_id.to_string()))?;
        self.set_content_label_pref(group, pref).await
    }

    pub fn snapshot(&self) -> PreferencesState {
        self.store.current()
    }

    pub fn adult_content_enabled(&self) -> bool {
        self.store.with_state(|state| state.adult_content_enabled)
    }

    pub fn label_pref(&self, group: LabelGroup) -> LabelPreference {
        self.store.with_state(|state| state.label_pref(group))
    }

    /// Whether the UI should offer `group` for editing. Adult-gated groups
    /// are locked while adult content is off; the setter itself does not
    /// enforce this.
    pub fn is_group_editable(&self, group: LabelGroup) -> bool {
        self.store.with_state(|state| state.is_group_editable(group))
    }

    pub fn subscribe(&self) -> watch::Receiver<PreferencesState> {
        self.store.subscribe()
    }

    pub fn last_sync(&self) -> SyncMarker {
        *self.marker.lock()
    }

    /// Whether an update to `field` is still awaiting the server.
    pub fn is_pending(&self, field: PreferenceField) -> bool {
        self.tickets.is_in_flight(field)
    }

    fn report_failure(
        &self,
        operation: &'static str,
        message: &str,
        err: RemoteError,
    ) -> SyncError {
        let err = SyncError::from(err);
        self.notifier.show(SYNC_FAILURE_TOAST);
        let context = LogContext::new()
            .with("operation", operation)
            .with("kind", err.kind())
            .with("error", &err);
        self.error_log.error(message, &context);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_the_platform_flag() {
        let config = ClientConfig {
            platform_allows_adult_content_toggle: false,
            ..ClientConfig::default()
        };
        assert!(!ControllerOptions::from(&config).platform_allows_adult_content_toggle);
        assert!(ControllerOptions::default().platform_allows_adult_content_toggle);
    }

    #[test]
    fn marker_counts_in_flight_syncs() {
        let marker = SyncMarker {
            started: 3,
            applied: 1,
            failed: 1,
            last_applied: Some(2),
        };
        assert_eq!(marker.in_flight(), 1);
    }
}
