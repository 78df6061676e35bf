//! OS appearance sources
//!
//! A source reports the operating system's current color scheme and
//! notifies listeners when it changes. Registration hands back an
//! [`AppearanceSubscription`]; dropping it unregisters the listener.

pub mod detect;
pub mod manual;
pub mod polling;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use plume_model::ColorScheme;

pub use detect::{
    GnomeColorSchemeDetector, MacosDefaultsDetector, NoopDetector,
    SystemSchemeDetector, detector_for_current_platform,
};
pub use manual::ManualAppearanceSource;
pub use polling::PollingAppearanceSource;

pub type AppearanceListener = Arc<dyn Fn(ColorScheme) + Send + Sync>;

pub trait OsAppearanceSource: Send + Sync {
    /// Current OS scheme, if the platform reports one.
    fn current(&self) -> Option<ColorScheme>;

    /// Register `listener` for scheme changes until the returned guard is
    /// dropped or removed.
    fn add_change_listener(
        &self,
        listener: AppearanceListener,
    ) -> AppearanceSubscription;
}

/// Scoped registration of an appearance listener.
///
/// The listener is unregistered exactly once, on `remove()` or on drop,
/// whichever comes first.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct AppearanceSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl AppearanceSubscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn remove(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for AppearanceSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for AppearanceSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppearanceSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, AppearanceListener)>,
    subscribed: usize,
    unsubscribed: usize,
}

/// Listener bookkeeping shared by the appearance sources.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: AppearanceListener) -> AppearanceSubscription {
        let id = {
            let mut registry = self.inner.lock();
            registry.next_id += 1;
            registry.subscribed += 1;
            let id = registry.next_id;
            registry.listeners.push((id, listener));
            id
        };

        let weak: Weak<Mutex<Registry>> = Arc::downgrade(&self.inner);
        AppearanceSubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut registry = inner.lock();
                registry.listeners.retain(|(existing, _)| *existing != id);
                registry.unsubscribed += 1;
            }
        })
    }

    /// Call every listener with `scheme`. Listeners run outside the lock.
    pub fn notify(&self, scheme: ColorScheme) {
        let listeners: Vec<AppearanceListener> = self
            .inner
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(scheme);
        }
    }

    pub fn subscribe_count(&self) -> usize {
        self.inner.lock().subscribed
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.inner.lock().unsubscribed
    }

    pub fn active_listeners(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.lock();
        f.debug_struct("ListenerRegistry")
            .field("active", &registry.listeners.len())
            .field("subscribed", &registry.subscribed)
            .field("unsubscribed", &registry.unsubscribed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscription_releases_once() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let subscription = registry.register(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify(ColorScheme::Dark);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        subscription.remove();
        registry.notify(ColorScheme::Light);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.subscribe_count(), 1);
        assert_eq!(registry.unsubscribe_count(), 1);
        assert_eq!(registry.active_listeners(), 0);
    }

    #[test]
    fn dropping_the_guard_unregisters() {
        let registry = ListenerRegistry::new();
        {
            let _subscription = registry.register(Arc::new(|_| {}));
            assert_eq!(registry.active_listeners(), 1);
        }
        assert_eq!(registry.active_listeners(), 0);
        assert_eq!(registry.unsubscribe_count(), 1);
    }
}
