//! API-specific error types
//!
//! Provides error classification for API operations with retry metadata.
//! [`ApiError`] is `Clone` so a single refresh outcome can be delivered to
//! every caller that was waiting on it.

use std::time::Duration;

use chatrizz_common::auth::CredentialStoreError;
use chatrizz_domain::ChatrizzError;
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Credential missing, rejected or unrecoverable (401, 403, expired session)
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) and bad local input - non-retryable
    Client,
    /// Network/connection errors and timeouts - retryable
    Network,
    /// Configuration, storage and cancellation - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The session could not be renewed; the user must sign in again
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Map a non-success status and its body to an error.
    ///
    /// The message is the body's `message` or `detail` field when the body is
    /// JSON, the raw body otherwise, and the canonical reason when empty.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        Self::with_status_message(status, error_message(status, body))
    }

    /// Map a non-success status to an error carrying `message`.
    pub fn with_status_message(status: StatusCode, message: String) -> Self {
        let code = status.as_u16();

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit(message),
            s if s.is_server_error() => Self::Server { status: code, message },
            _ => Self::Client { status: code, message },
        }
    }

    /// Transport failure while the call was bounded by `timeout`.
    pub fn from_transport(err: ChatrizzError, timeout: Duration) -> Self {
        match err {
            ChatrizzError::Timeout(_) => Self::Timeout(timeout),
            ChatrizzError::InvalidInput(message) => Self::InvalidInput(message),
            ChatrizzError::Config(message) => Self::Config(message),
            other => Self::Network(other.to_string()),
        }
    }

    /// Local validation failure; nothing was sent.
    pub fn rejected_input(err: ChatrizzError) -> Self {
        match err {
            ChatrizzError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::InvalidInput(other.to_string()),
        }
    }

    /// Re-label a refresh failure as the end of the session.
    #[must_use]
    pub fn into_session_expired(self) -> Self {
        match self {
            Self::SessionExpired(_) | Self::Cancelled | Self::Store(_) => self,
            other => Self::SessionExpired(other.to_string()),
        }
    }

    /// HTTP status behind the error, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::RateLimit(_) => Some(429),
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::Forbidden(_) | Self::SessionExpired(_) => {
                ApiErrorCategory::Authentication
            }
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Client { .. } | Self::Decode(_) | Self::InvalidInput(_) => {
                ApiErrorCategory::Client
            }
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Store(_) | Self::Config(_) | Self::Cancelled => ApiErrorCategory::Config,
        }
    }

    /// Check if a call-site retry could help
    ///
    /// Authentication failures are never retried here; the gateway already
    /// performed the single refresh-and-replay.
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::RateLimit => 60,
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Authentication
            | ApiErrorCategory::Client
            | ApiErrorCategory::Config => 0,
        }
    }
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in ["message", "detail", "error"] {
            if let Some(text) = value.get(field).and_then(serde_json::Value::as_str) {
                return text.to_string();
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text.chars().take(512).collect()
    }
}

impl From<CredentialStoreError> for ApiError {
    fn from(err: CredentialStoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<ApiError> for ChatrizzError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(m) | ApiError::Forbidden(m) | ApiError::SessionExpired(m) => {
                Self::Auth(m)
            }
            ApiError::Client { status: 404, message } => Self::NotFound(message),
            ApiError::Timeout(after) => Self::Timeout(format!("{after:?}")),
            ApiError::Store(m) => Self::Storage(m),
            ApiError::Decode(m) => Self::Serialization(m),
            ApiError::Config(m) => Self::Config(m),
            ApiError::InvalidInput(m) => Self::InvalidInput(m),
            ApiError::Cancelled => Self::Internal("operation cancelled".into()),
            other => Self::Network(other.to_string()),
        }
    }
}
