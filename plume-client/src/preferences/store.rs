use std::sync::Arc;

use plume_model::{LabelGroup, LabelPreference, PreferencesState};
use tokio::sync::watch;

/// Preference state published through a watch channel.
///
/// Readers always see a whole `PreferencesState`; writers replace or
/// modify it in a single step.
#[derive(Clone, Debug)]
pub struct PreferencesStore {
    sender: Arc<watch::Sender<PreferencesState>>,
    receiver: watch::Receiver<PreferencesState>,
}

impl PreferencesStore {
    pub fn new(initial: PreferencesState) -> Self {
        let (sender, receiver) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn current(&self) -> PreferencesState {
        self.receiver.borrow().clone()
    }

    /// Access state without cloning
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PreferencesState) -> R,
    {
        f(&self.receiver.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<PreferencesState> {
        self.receiver.clone()
    }

    /// Replace the whole state
    pub fn replace(&self, state: PreferencesState) {
        self.sender.send_replace(state);
    }

    /// Set the adult content flag, notifying only on change.
    pub fn set_adult_content_enabled(&self, enabled: bool) {
        self.sender.send_if_modified(|state| {
            let changed = state.adult_content_enabled != enabled;
            state.adult_content_enabled = enabled;
            changed
        });
    }

    /// Set one label policy, notifying only on change.
    pub fn set_label_pref(&self, group: LabelGroup, pref: LabelPreference) {
        self.sender.send_if_modified(|state| {
            let changed = state.label_pref(group) != pref;
            state.set_label_pref(group, pref);
            changed
        });
    }
}

impl Default for PreferencesStore {
    fn default() -> Self {
        Self::new(PreferencesState::default())
    }
}
