use std::collections::BTreeMap;

use crate::labels::{LabelGroup, LabelPreference};

/// Moderation preferences cached on the client.
///
/// Every configurable group always has an entry; groups missing from a
/// server snapshot fall back to their default policy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PreferencesState {
    pub adult_content_enabled: bool,
    pub content_labels: BTreeMap<LabelGroup, LabelPreference>,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            adult_content_enabled: false,
            content_labels: LabelGroup::ALL
                .into_iter()
                .map(|group| (group, group.default_pref()))
                .collect(),
        }
    }
}

impl PreferencesState {
    /// Build a complete state from a possibly partial label mapping.
    pub fn from_parts(
        adult_content_enabled: bool,
        labels: impl IntoIterator<Item = (LabelGroup, LabelPreference)>,
    ) -> Self {
        let mut state = Self {
            adult_content_enabled,
            ..Self::default()
        };
        state.content_labels.extend(labels);
        state
    }

    /// Stored policy for `group`.
    pub fn label_pref(&self, group: LabelGroup) -> LabelPreference {
        self.content_labels
            .get(&group)
            .copied()
            .unwrap_or_else(|| group.default_pref())
    }

    /// Policy that applies when rendering: adult-gated groups are hidden
    /// while adult content is disabled, whatever is stored.
    pub fn effective_label_pref(&self, group: LabelGroup) -> LabelPreference {
        if group.requires_adult_content() && !self.adult_content_enabled {
            return LabelPreference::Hide;
        }
        self.label_pref(group)
    }

    /// Whether the user may change `group` in the current state.
    pub fn is_group_editable(&self, group: LabelGroup) -> bool {
        self.adult_content_enabled || !group.requires_adult_content()
    }

    pub fn set_label_pref(&mut self, group: LabelGroup, pref: LabelPreference) {
        self.content_labels.insert(group, pref);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_covers_every_group() {
        let state = PreferencesState::default();
        assert!(!state.adult_content_enabled);
        assert_eq!(state.content_labels.len(), LabelGroup::ALL.len());
        assert_eq!(state.label_pref(LabelGroup::Nsfw), LabelPreference::Hide);
        assert_eq!(
            state.label_pref(LabelGroup::Impersonation),
            LabelPreference::Warn
        );
    }

    #[test]
    fn partial_labels_keep_defaults_for_the_rest() {
        let state = PreferencesState::from_parts(
            true,
            [(LabelGroup::Gore, LabelPreference::Show)],
        );
        assert_eq!(state.label_pref(LabelGroup::Gore), LabelPreference::Show);
        assert_eq!(state.label_pref(LabelGroup::Spam), LabelPreference::Hide);
    }

    #[test]
    fn gated_groups_are_hidden_while_adult_content_is_off() {
        let mut state = PreferencesState::default();
        state.set_label_pref(LabelGroup::Nudity, LabelPreference::Show);

        assert_eq!(
            state.effective_label_pref(LabelGroup::Nudity),
            LabelPreference::Hide
        );
        assert!(!state.is_group_editable(LabelGroup::Nudity));
        assert!(state.is_group_editable(LabelGroup::Hate));

        state.adult_content_enabled = true;
        assert_eq!(
            state.effective_label_pref(LabelGroup::Nudity),
            LabelPreference::Show
        );
    }
}
