use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Policy applied to content carrying labels of a given group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LabelPreference {
    Hide,
    Warn,
    Show,
}

impl LabelPreference {
    pub const ALL: [LabelPreference; 3] =
        [LabelPreference::Hide, LabelPreference::Warn, LabelPreference::Show];

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelPreference::Hide => "hide",
            LabelPreference::Warn => "warn",
            LabelPreference::Show => "show",
        }
    }
}

impl fmt::Display for LabelPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelPreference {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hide" => Ok(LabelPreference::Hide),
            "warn" => Ok(LabelPreference::Warn),
            "show" => Ok(LabelPreference::Show),
            _ => Err(ModelError::UnknownLabelPreference(s.to_string())),
        }
    }
}

/// A configurable category of moderation labels.
///
/// The set is fixed; identifiers outside of it are rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LabelGroup {
    Nsfw,
    Nudity,
    Suggestive,
    Gore,
    Hate,
    Spam,
    Impersonation,
}

/// Display metadata for a label group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelGroupInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    /// Group is only editable while adult content is enabled.
    pub requires_adult_content: bool,
    pub default_pref: LabelPreference,
}

impl LabelGroup {
    /// Every configurable group, in the order the settings modal lists them.
    pub const ALL: [LabelGroup; 7] = [
        LabelGroup::Nsfw,
        LabelGroup::Nudity,
        LabelGroup::Suggestive,
        LabelGroup::Gore,
        LabelGroup::Hate,
        LabelGroup::Spam,
        LabelGroup::Impersonation,
    ];

    pub fn as_str(&self) -> &'static str {
        self.info().id
    }

    pub fn info(&self) -> LabelGroupInfo {
        match self {
            LabelGroup::Nsfw => LabelGroupInfo {
                id: "nsfw",
                title: "Explicit Sexual Images",
                subtitle: None,
                requires_adult_content: true,
                default_pref: LabelPreference::Hide,
            },
            LabelGroup::Nudity => LabelGroupInfo {
                id: "nudity",
                title: "Other Nudity",
                subtitle: Some("Including non-sexual and artistic"),
                requires_adult_content: true,
                default_pref: LabelPreference::Warn,
            },
            LabelGroup::Suggestive => LabelGroupInfo {
                id: "suggestive",
                title: "Sexually Suggestive",
                subtitle: Some("Does not include nudity"),
                requires_adult_content: true,
                default_pref: LabelPreference::Warn,
            },
            LabelGroup::Gore => LabelGroupInfo {
                id: "gore",
                title: "Violent / Bloody",
                subtitle: Some("Gore, self-harm, torture"),
                requires_adult_content: true,
                default_pref: LabelPreference::Warn,
            },
            LabelGroup::Hate => LabelGroupInfo {
                id: "hate",
                title: "Political Hate-Groups",
                subtitle: None,
                requires_adult_content: false,
                default_pref: LabelPreference::Hide,
            },
            LabelGroup::Spam => LabelGroupInfo {
                id: "spam",
                title: "Spam",
                subtitle: Some("Excessive low-quality posts"),
                requires_adult_content: false,
                default_pref: LabelPreference::Hide,
            },
            LabelGroup::Impersonation => LabelGroupInfo {
                id: "impersonation",
                title: "Impersonation",
                subtitle: Some(
                    "Accounts falsely claiming to be people or orgs",
                ),
                requires_adult_content: false,
                default_pref: LabelPreference::Warn,
            },
        }
    }

    pub fn requires_adult_content(&self) -> bool {
        self.info().requires_adult_content
    }

    pub fn default_pref(&self) -> LabelPreference {
        self.info().default_pref
    }
}

impl fmt::Display for LabelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelGroup {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| ModelError::UnknownLabelGroup(s.to_string()))
    }
}
