//! Conversions from external infrastructure errors into domain errors.

use chatrizz_common::auth::CredentialStoreError;
use chatrizz_domain::ChatrizzError;
#[cfg(feature = "keychain")]
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ChatrizzError);

impl From<InfraError> for ChatrizzError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ChatrizzError> for InfraError {
    fn from(value: ChatrizzError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoChatrizzError {
    fn into_chatrizz(self) -> ChatrizzError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ChatrizzError */
/* -------------------------------------------------------------------------- */

impl IntoChatrizzError for HttpError {
    fn into_chatrizz(self) -> ChatrizzError {
        if self.is_timeout() {
            return ChatrizzError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ChatrizzError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ChatrizzError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return ChatrizzError::Serialization(format!("invalid HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ChatrizzError::Auth(message),
                404 => ChatrizzError::NotFound(message),
                400..=499 => ChatrizzError::InvalidInput(message),
                _ => ChatrizzError::Network(message),
            };
        }

        ChatrizzError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_chatrizz())
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → ChatrizzError */
/* -------------------------------------------------------------------------- */

#[cfg(feature = "keychain")]
impl IntoChatrizzError for KeyringError {
    fn into_chatrizz(self) -> ChatrizzError {
        match self {
            Self::NoEntry => ChatrizzError::NotFound("keychain entry not found".into()),
            Self::BadEncoding(_) => {
                ChatrizzError::Storage("credential in keychain is not valid UTF-8".into())
            }
            Self::PlatformFailure(err) => {
                ChatrizzError::Storage(format!("keychain platform error: {err}"))
            }
            Self::NoStorageAccess(err) => {
                ChatrizzError::Storage(format!("unable to access secure storage: {err}"))
            }
            other => ChatrizzError::Storage(other.to_string()),
        }
    }
}

#[cfg(feature = "keychain")]
impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_chatrizz())
    }
}

/* -------------------------------------------------------------------------- */
/* credential store / io / serde → ChatrizzError */
/* -------------------------------------------------------------------------- */

impl IntoChatrizzError for CredentialStoreError {
    fn into_chatrizz(self) -> ChatrizzError {
        ChatrizzError::Storage(self.to_string())
    }
}

impl From<CredentialStoreError> for InfraError {
    fn from(value: CredentialStoreError) -> Self {
        Self(value.into_chatrizz())
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(match value.kind() {
            std::io::ErrorKind::NotFound => ChatrizzError::NotFound(value.to_string()),
            _ => ChatrizzError::Internal(format!("I/O failure: {value}")),
        })
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(ChatrizzError::Serialization(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
