use pies_core::{FormError, SessionError};
use reqwest::StatusCode;

/// Shown when a failure response has no body.
pub const EMPTY_RESPONSE_MESSAGE: &str = "The server returned an error without any details.";

/// Shown when a failure response body is not structured error JSON.
pub const UNREADABLE_RESPONSE_MESSAGE: &str = "The server returned an error that could not be read.";

/// What a failure response body looked like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorBody {
    /// JSON carrying a `message` or `error` string.
    Structured,
    Empty,
    Unreadable,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{message}")]
    Status {
        status: StatusCode,
        body: ErrorBody,
        message: String,
    },
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Builds the error for a non-success response from its raw body.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let (body_kind, message) = interpret_error_body(body);
        ClientError::Status {
            status,
            body: body_kind,
            message,
        }
    }

    /// True when the form was rejected before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Form(FormError::Validation(_)))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Picks the human-readable message out of a failure body.
///
/// `message` wins over `error`; blank strings count as absent.
pub fn interpret_error_body(body: &str) -> (ErrorBody, String) {
    if body.trim().is_empty() {
        return (ErrorBody::Empty, EMPTY_RESPONSE_MESSAGE.to_string());
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return (ErrorBody::Unreadable, UNREADABLE_RESPONSE_MESSAGE.to_string());
    };
    ["message", "error"]
        .iter()
        .find_map(|key| {
            value
                .get(*key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .map(|message| (ErrorBody::Structured, message.to_string()))
        .unwrap_or_else(|| (ErrorBody::Unreadable, UNREADABLE_RESPONSE_MESSAGE.to_string()))
}
