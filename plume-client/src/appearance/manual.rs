use parking_lot::Mutex;
use plume_model::ColorScheme;

use super::{
    AppearanceListener, AppearanceSubscription, ListenerRegistry,
    OsAppearanceSource,
};

/// Appearance source driven from inside the process.
///
/// Host shells that receive OS theme events push them in with
/// [`ManualAppearanceSource::set_scheme`]; tests use it to simulate the OS.
#[derive(Debug, Default)]
pub struct ManualAppearanceSource {
    scheme: Mutex<Option<ColorScheme>>,
    registry: ListenerRegistry,
}

impl ManualAppearanceSource {
    pub fn new(initial: Option<ColorScheme>) -> Self {
        Self {
            scheme: Mutex::new(initial),
            registry: ListenerRegistry::new(),
        }
    }

    /// Record the OS scheme, notifying listeners when it changed.
    pub fn set_scheme(&self, scheme: Option<ColorScheme>) {
        let changed = {
            let mut current = self.scheme.lock();
            let changed = *current != scheme;
            *current = scheme;
            changed
        };

        if changed && let Some(scheme) = scheme {
            self.registry.notify(scheme);
        }
    }

    pub fn subscribe_count(&self) -> usize {
        self.registry.subscribe_count()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.registry.unsubscribe_count()
    }

    pub fn active_listeners(&self) -> usize {
        self.registry.active_listeners()
    }
}

impl OsAppearanceSource for ManualAppearanceSource {
    fn current(&self) -> Option<ColorScheme> {
        *self.scheme.lock()
    }

    fn add_change_listener(
        &self,
        listener: AppearanceListener,
    ) -> AppearanceSubscription {
        self.registry.register(listener)
    }
}
