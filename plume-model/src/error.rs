use std::fmt::{self, Display};

/// Errors produced when parsing model values from their wire identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownLabelGroup(String),
    UnknownLabelPreference(String),
    UnknownAppearanceMode(String),
    UnknownColorScheme(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownLabelGroup(id) => {
                write!(f, "unknown label group: {id}")
            }
            ModelError::UnknownLabelPreference(value) => {
                write!(f, "unknown label preference: {value}")
            }
            ModelError::UnknownAppearanceMode(value) => {
                write!(f, "unknown appearance mode: {value}")
            }
            ModelError::UnknownColorScheme(value) => {
                write!(f, "unknown color scheme: {value}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
