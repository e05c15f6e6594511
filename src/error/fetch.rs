use reqwest::StatusCode;
use thiserror::Error as ThisError;

use crate::utils::logging::body_preview;

#[derive(Debug, ThisError)]
pub enum FetchError {
    /// Timeout, refused connection, TLS failure, or a body that could not be read in time.
    #[error("GtR transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GtR responded with status {status}: {}", body_preview(.body))]
    Request { status: StatusCode, body: String },

    #[error("GtR payload could not be decoded: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Request { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
            FetchError::Payload(_) | FetchError::UrlError(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_timeout())
    }
}
