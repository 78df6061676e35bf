//! Error types for preference synchronization
//!
//! `RemoteError` is what the preferences service reports; `SyncError` is
//! what the controller hands back to UI callers.

use thiserror::Error;

/// Failure reported by the remote preferences service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Transport or connectivity failure; no response was received
    #[error("Request failed: {0}")]
    Network(String),

    /// The service answered with a non-success response
    #[error("Server responded with status {status}: {message}")]
    Server { status: u16, message: String },
}

impl RemoteError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        RemoteError::Server {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if err.is_decode() || err.is_status() => {
                RemoteError::server(status.as_u16(), err.to_string())
            }
            _ => RemoteError::Network(err.to_string()),
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Error returned by the preference sync controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Transport failure talking to the preferences service
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the preferences service
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Caller passed a label group outside the configurable set
    #[error("Unknown label group: {0}")]
    InvalidGroup(String),

    /// Caller invoked an operation this platform disables
    #[error("Operation not permitted on this platform: {0}")]
    CallerMisuse(&'static str),
}

impl SyncError {
    /// Stable identifier used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Network(_) => "NetworkError",
            SyncError::Server { .. } => "ServerError",
            SyncError::InvalidGroup(_) => "InvalidGroup",
            SyncError::CallerMisuse(_) => "CallerMisuse",
        }
    }

    /// Transient remote failures, as opposed to caller bugs.
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Network(_) | SyncError::Server { .. })
    }
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Network(detail) => SyncError::Network(detail),
            RemoteError::Server { status, message } => {
                SyncError::Server { status, message }
            }
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
