use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use plume_model::api::PreferencesSnapshot;
use plume_model::{LabelGroup, LabelPreference};
use tokio::sync::oneshot;

use crate::errors::{RemoteError, RemoteResult};
use crate::infrastructure::services::PreferencesService;

/// A request the stub received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesCall {
    Fetch,
    PutAdultContent(bool),
    PutContentLabel(LabelGroup, LabelPreference),
}

#[derive(Debug)]
struct Scripted<T> {
    result: RemoteResult<T>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Debug, Default)]
struct Script {
    fetches: VecDeque<Scripted<PreferencesSnapshot>>,
    updates: VecDeque<Scripted<()>>,
    calls: Vec<PreferencesCall>,
}

/// In-memory `PreferencesService` with scripted outcomes.
///
/// Each request pops the next scripted result for its kind; with nothing
/// scripted, fetches return `fallback` and updates succeed. Gated results
/// wait until their sender fires (or is dropped) before answering, which
/// lets tests choose the order responses arrive in.
#[derive(Debug, Clone, Default)]
pub struct TestPreferencesService {
    script: Arc<Mutex<Script>>,
    fallback: Arc<Mutex<PreferencesSnapshot>>,
}

impl TestPreferencesService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: PreferencesSnapshot) -> Self {
        let service = Self::default();
        *service.fallback.lock() = snapshot;
        service
    }

    pub fn push_fetch(&self, result: RemoteResult<PreferencesSnapshot>) {
        self.script.lock().fetches.push_back(Scripted { result, gate: None });
    }

    /// Script a fetch that answers only once the returned sender fires.
    pub fn push_fetch_gated(
        &self,
        result: RemoteResult<PreferencesSnapshot>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().fetches.push_back(Scripted {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn push_update(&self, result: RemoteResult<()>) {
        self.script.lock().updates.push_back(Scripted { result, gate: None });
    }

    pub fn push_update_gated(&self, result: RemoteResult<()>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().updates.push_back(Scripted {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn fail_next_update(&self, error: RemoteError) {
        self.push_update(Err(error));
    }

    pub fn calls(&self) -> Vec<PreferencesCall> {
        self.script.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().calls.len()
    }

    pub fn fetch_count(&self) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, PreferencesCall::Fetch))
            .count()
    }

    fn next_fetch(&self) -> Scripted<PreferencesSnapshot> {
        let mut script = self.script.lock();
        script.calls.push(PreferencesCall::Fetch);
        script.fetches.pop_front().unwrap_or_else(|| Scripted {
            result: Ok(self.fallback.lock().clone()),
            gate: None,
        })
    }

    fn next_update(&self, call: PreferencesCall) -> Scripted<()> {
        let mut script = self.script.lock();
        script.calls.push(call);
        script.updates.pop_front().unwrap_or(Scripted {
            result: Ok(()),
            gate: None,
        })
    }
}

async fn answer<T>(scripted: Scripted<T>) -> RemoteResult<T> {
    if let Some(gate) = scripted.gate {
        let _ = gate.await;
    }
    scripted.result
}

#[async_trait]
impl PreferencesService for TestPreferencesService {
    async fn fetch_preferences(&self) -> RemoteResult<PreferencesSnapshot> {
        let scripted = self.next_fetch();
        answer(scripted).await
    }

    async fn put_adult_content_enabled(&self, enabled: bool) -> RemoteResult<()> {
        let scripted = self.next_update(PreferencesCall::PutAdultContent(enabled));
        answer(scripted).await
    }

    async fn put_content_label_pref(
        &self,
        group: LabelGroup,
        pref: LabelPreference,
    ) -> RemoteResult<()> {
        let scripted =
            self.next_update(PreferencesCall::PutContentLabel(group, pref));
        answer(scripted).await
    }
}
