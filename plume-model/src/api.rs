//! Request and response bodies exchanged with the preferences service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::labels::{LabelGroup, LabelPreference};
use crate::preferences::PreferencesState;

/// Standard API envelope used by the preferences service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(error),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Full preferences snapshot returned by `GET preferences`.
///
/// Label entries this client does not recognize (a group added server-side
/// or a policy value it cannot apply) are set aside in
/// `unrecognized_labels` instead of failing the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SnapshotWire")]
pub struct PreferencesSnapshot {
    pub adult_content_enabled: bool,
    pub content_labels: BTreeMap<LabelGroup, LabelPreference>,
    /// `group=value` pairs that were skipped while decoding.
    #[serde(skip)]
    pub unrecognized_labels: Vec<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SnapshotWire {
    adult_content_enabled: bool,
    content_labels: BTreeMap<String, String>,
}

impl From<SnapshotWire> for PreferencesSnapshot {
    fn from(wire: SnapshotWire) -> Self {
        let mut content_labels = BTreeMap::new();
        let mut unrecognized_labels = Vec::new();
        for (group, value) in wire.content_labels {
            match (group.parse::<LabelGroup>(), value.parse::<LabelPreference>()) {
                (Ok(group), Ok(pref)) => {
                    content_labels.insert(group, pref);
                }
                _ => unrecognized_labels.push(format!("{group}={value}")),
            }
        }
        Self {
            adult_content_enabled: wire.adult_content_enabled,
            content_labels,
            unrecognized_labels,
        }
    }
}

impl From<PreferencesSnapshot> for PreferencesState {
    fn from(snapshot: PreferencesSnapshot) -> Self {
        PreferencesState::from_parts(
            snapshot.adult_content_enabled,
            snapshot.content_labels,
        )
    }
}

impl From<&PreferencesState> for PreferencesSnapshot {
    fn from(state: &PreferencesState) -> Self {
        Self {
            adult_content_enabled: state.adult_content_enabled,
            content_labels: state.content_labels.clone(),
            unrecognized_labels: Vec::new(),
        }
    }
}

/// Body of `PUT adultContentEnabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdultContentUpdate {
    pub enabled: bool,
}

/// Body of `PUT contentLabelPref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLabelUpdate {
    pub group: LabelGroup,
    pub value: LabelPreference,
}
