/// Client error type
///
/// Every failure a caller can show to a person reduces to
/// [`ClientError::user_message`]: the server's own `message` when the API
/// answered with an error body, otherwise a generic fallback.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Shown when the server gave no usable message
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Client error
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, bad body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}")]
    Api {
        status: StatusCode,
        /// Error code from the body, e.g. `not_found`
        code: Option<String>,
        /// Human-readable message from the body
        message: Option<String>,
    },

    /// Reading or writing the session slot failed
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Session slot exists but does not parse
    #[error("Session file is corrupt: {0}")]
    CorruptSession(#[from] serde_json::Error),

    /// Operation needs a token and there is none
    #[error("Not signed in")]
    NotSignedIn,
}

/// Error body produced by the API
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ClientError {
    /// Builds an API error from a status and the raw response body
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
        let (code, message) = match parsed {
            Some(body) => (body.error, body.message.filter(|m| !m.trim().is_empty())),
            None => (None, None),
        };

        ClientError::Api {
            status,
            code,
            message,
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// Message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::NotSignedIn => "Please log in to continue.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
