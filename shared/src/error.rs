//! Error types for the calendar events gateway.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving an events request.
#[derive(Error, Debug)]
pub enum Error {
    /// Required credential or calendar identifier missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream calendar API answered with a non-success status
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Outbound call could not complete. Never holds the request URL,
    /// which carries the API key.
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    /// Upstream answered 2xx with a body we could not decode
    #[error("Decode error: {0}")]
    Decode(String),

    /// Raw item violates the mapping precondition
    #[error("Malformed item {id}: {reason}")]
    MalformedItem { id: String, reason: String },

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON error envelope returned to the calendar widget.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            details: None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.without_url())
    }
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Upstream { status, .. } => *status,
            _ => 500,
        }
    }

    /// Build the JSON envelope describing this error.
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Error::Config(_) => ErrorBody::message(
                "Server not configured: missing GOOGLE_CALENDAR_API_KEY or GOOGLE_CALENDAR_ID",
            ),
            Error::Upstream { status, body } => ErrorBody {
                error: "Google API error".to_string(),
                status: Some(*status),
                details: Some(body.clone()),
            },
            Error::Transport(e) => ErrorBody {
                error: "Server fetch failed".to_string(),
                status: None,
                details: Some(e.to_string()),
            },
            Error::Decode(details) => ErrorBody {
                error: "Invalid response from Google API".to_string(),
                status: None,
                details: Some(details.clone()),
            },
            other => ErrorBody {
                error: "Internal error".to_string(),
                status: None,
                details: Some(other.to_string()),
            },
        }
    }
}
