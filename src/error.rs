use reqwest::StatusCode;
use thiserror::Error;

/// The only failure the resource client reports.
///
/// The variants say where a request broke down; view models do not branch
/// on them and surface every failure the same way.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("server responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error("request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error("invalid {resource}: {reason}")]
    Invalid {
        resource: &'static str,
        reason:   String,
    },
}

impl RequestFailure {
    pub fn invalid(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            resource,
            reason: reason.into(),
        }
    }

    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
