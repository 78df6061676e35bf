use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use plume_model::{AppearanceMode, ColorScheme};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::appearance::{AppearanceSubscription, OsAppearanceSource};

use super::resolver::resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub mode: AppearanceMode,
    /// Last scheme the OS reported.
    pub os_scheme: Option<ColorScheme>,
    pub effective: ColorScheme,
}

impl ThemeState {
    pub fn new(mode: AppearanceMode, os_scheme: Option<ColorScheme>) -> Self {
        Self {
            mode,
            os_scheme,
            effective: resolve(mode, os_scheme),
        }
    }
}

/// Watch channel plus a count of OS notifications applied to it.
///
/// The counter is only touched while the channel's value is locked, so a
/// reconcile can tell whether a notification landed after it read the
/// source.
#[derive(Debug)]
struct ThemeShared {
    state: watch::Sender<ThemeState>,
    os_updates: AtomicU64,
}

impl ThemeShared {
    fn apply_os_scheme(&self, scheme: ColorScheme) {
        self.state.send_if_modified(|current| {
            self.os_updates.fetch_add(1, Ordering::Relaxed);
            let next = ThemeState::new(current.mode, Some(scheme));
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    /// Read `source` and record its scheme unless a notification was
    /// applied in the meantime; that notification is newer.
    fn reconcile(&self, source: &dyn OsAppearanceSource) {
        let seen = self.os_updates.load(Ordering::Relaxed);
        let scheme = source.current();
        self.state.send_if_modified(|current| {
            if self.os_updates.load(Ordering::Relaxed) != seen {
                return false;
            }
            let next = ThemeState::new(current.mode, scheme);
            let changed = *current != next;
            *current = next;
            changed
        });
    }
}

/// Tracks the user's appearance mode and the effective color scheme.
///
/// While the mode is `Auto` the controller holds exactly one OS
/// subscription; in any other mode it holds none. The subscription is
/// released when the controller is dropped.
pub struct ThemeController {
    source: Arc<dyn OsAppearanceSource>,
    shared: Arc<ThemeShared>,
    subscription: Mutex<Option<AppearanceSubscription>>,
}

impl ThemeController {
    pub fn new(source: Arc<dyn OsAppearanceSource>, mode: AppearanceMode) -> Self {
        let (state, _) = watch::channel(ThemeState::new(mode, None));
        let controller = Self {
            source,
            shared: Arc::new(ThemeShared {
                state,
                os_updates: AtomicU64::new(0),
            }),
            subscription: Mutex::new(None),
        };
        if mode.follows_system() {
            controller.ensure_subscribed();
        }
        controller.shared.reconcile(controller.source.as_ref());
        controller
    }

    pub fn set_appearance_mode(&self, mode: AppearanceMode) {
        if self.mode() == mode {
            return;
        }

        // Mode goes out first so a notification racing the switch is
        // resolved against the new mode.
        self.shared.state.send_modify(|current| {
            *current = ThemeState::new(mode, current.os_scheme);
        });

        if mode.follows_system() {
            self.ensure_subscribed();
            self.shared.reconcile(self.source.as_ref());
        } else {
            self.release_subscription();
        }

        debug!(state = ?self.current(), "appearance mode changed");
    }

    pub fn current(&self) -> ThemeState {
        *self.shared.state.borrow()
    }

    pub fn mode(&self) -> AppearanceMode {
        self.shared.state.borrow().mode
    }

    pub fn effective(&self) -> ColorScheme {
        self.shared.state.borrow().effective
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.shared.state.subscribe()
    }

    pub fn is_following_os(&self) -> bool {
        self.subscription.lock().is_some()
    }

    fn ensure_subscribed(&self) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            return;
        }

        let shared: Weak<ThemeShared> = Arc::downgrade(&self.shared);
        *subscription = Some(self.source.add_change_listener(Arc::new(
            move |scheme| {
                if let Some(shared) = shared.upgrade() {
                    shared.apply_os_scheme(scheme);
                }
            },
        )));
    }

    fn release_subscription(&self) {
        // Take first so the guard is dropped outside the lock.
        let released = self.subscription.lock().take();
        if let Some(subscription) = released {
            subscription.remove();
        }
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("state", &self.current())
            .field("following_os", &self.is_following_os())
            .finish_non_exhaustive()
    }
}
