//! Error types used throughout the admin client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Chatrizz admin client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ChatrizzError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for admin client operations
pub type Result<T> = std::result::Result<T, ChatrizzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = ChatrizzError::Timeout("GET /admin/users/".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "Timeout");
        assert_eq!(json["message"], "GET /admin/users/");
    }

    #[test]
    fn display_includes_category() {
        let err = ChatrizzError::Storage("keychain locked".into());
        assert_eq!(err.to_string(), "Credential storage error: keychain locked");
    }
}
