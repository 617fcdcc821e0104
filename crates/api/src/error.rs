//! Error type for the item API client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while talking to the item backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure: connection refused, reset, TLS, etc.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {}", describe(.message, .body))]
    Api {
        status: StatusCode,
        message: Option<String>,
        body: String,
    },

    /// A success response whose body is not a usable record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Reading an attachment from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Build an `Api` error from a failed response's status and raw body.
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        let message = extract_message(&body);
        ApiError::Api {
            status,
            message,
            body,
        }
    }

    /// The human readable message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a server-reported failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

fn describe<'a>(message: &'a Option<String>, body: &'a str) -> &'a str {
    message.as_deref().unwrap_or(body)
}

/// Pull `message` out of a JSON error body.
///
/// Validation failures report `message` as an array of strings; those are
/// joined into one line.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(parts) => {
            let parts: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}
