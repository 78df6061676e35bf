use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use plume_model::ColorScheme;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::{
    AppearanceListener, AppearanceSubscription, ListenerRegistry,
    OsAppearanceSource, SystemSchemeDetector,
};

#[derive(Debug, Default)]
struct PollingShared {
    latest: Mutex<Option<ColorScheme>>,
    registry: ListenerRegistry,
}

impl PollingShared {
    fn record(&self, scheme: Option<ColorScheme>) {
        let changed = {
            let mut latest = self.latest.lock();
            let changed = *latest != scheme;
            *latest = scheme;
            changed
        };

        if changed {
            debug!(?scheme, "os color scheme changed");
            if let Some(scheme) = scheme {
                self.registry.notify(scheme);
            }
        }
    }
}

/// Appearance source that polls a [`SystemSchemeDetector`] on an interval.
///
/// The polling task stops when the source is dropped.
pub struct PollingAppearanceSource {
    shared: Arc<PollingShared>,
    detector: Arc<dyn SystemSchemeDetector>,
    task: JoinHandle<()>,
}

impl PollingAppearanceSource {
    /// Start polling. Must be called inside a tokio runtime; the first
    /// detection runs immediately.
    pub fn spawn(detector: Arc<dyn SystemSchemeDetector>, interval: Duration) -> Self {
        let shared = Arc::new(PollingShared::default());
        let task = tokio::spawn(poll_loop(
            Arc::downgrade(&shared),
            Arc::clone(&detector),
            interval,
        ));

        Self {
            shared,
            detector,
            task,
        }
    }

    /// Detect once now, outside the polling schedule.
    pub async fn refresh(&self) -> Option<ColorScheme> {
        let scheme = self.detector.detect().await;
        self.shared.record(scheme);
        scheme
    }

    pub fn active_listeners(&self) -> usize {
        self.shared.registry.active_listeners()
    }
}

async fn poll_loop(
    shared: Weak<PollingShared>,
    detector: Arc<dyn SystemSchemeDetector>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let scheme = detector.detect().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        shared.record(scheme);
    }
}

impl OsAppearanceSource for PollingAppearanceSource {
    fn current(&self) -> Option<ColorScheme> {
        *self.shared.latest.lock()
    }

    fn add_change_listener(
        &self,
        listener: AppearanceListener,
    ) -> AppearanceSubscription {
        self.shared.registry.register(listener)
    }
}

impl Drop for PollingAppearanceSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for PollingAppearanceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingAppearanceSource")
            .field("latest", &*self.shared.latest.lock())
            .field("registry", &self.shared.registry)
            .finish_non_exhaustive()
    }
}
