//! Generic keychain provider for secure credential storage
//!
//! This module exposes a thin wrapper over the platform keychain for storing
//! arbitrary secrets across macOS (Keychain Access), Windows (Credential
//! Manager), and Linux (Secret Service API).
//!
//! ## Module Relationships
//!
//! - This module (`security::keychain`): generic secret storage behind the
//!   [`SecretVault`] trait
//! - `auth::keychain`: session credential storage built on any vault
//!
//! ## Usage
//!
//! ```no_run
//! # #[cfg(feature = "platform")]
//! # {
//! use chatrizz_common::security::{KeychainProvider, SecretVault};
//!
//! let keychain = KeychainProvider::new("Chatrizz.admin");
//! keychain.set_secret("refresh_token", "super-secret")?;
//! let secret = keychain.get_secret("refresh_token")?;
//! assert_eq!(secret, "super-secret");
//! # }
//! # Ok::<(), chatrizz_common::security::KeychainError>(())
//! ```

use thiserror::Error;

/// Minimal secret storage surface shared by the platform keychain and its
/// in-memory test double.
pub trait SecretVault: Send + Sync {
    /// Store a secret value under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the backend rejects the write
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// Retrieve a secret value.
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if the secret doesn't exist
    fn get_secret(&self, key: &str) -> Result<String, KeychainError>;

    /// Delete a secret (idempotent).
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the backend rejects the delete
    fn delete_secret(&self, key: &str) -> Result<(), KeychainError>;

    /// Check if a secret exists.
    fn secret_exists(&self, key: &str) -> bool {
        self.get_secret(key).is_ok()
    }
}

/// Keychain error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, not available, etc.)
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found in keychain
    #[error("Entry not found")]
    NotFound,

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(feature = "platform")]
pub use platform::KeychainProvider;

#[cfg(feature = "platform")]
mod platform {
    use keyring::Entry;
    use tracing::debug;

    use super::{KeychainError, SecretVault};

    /// Platform keychain scoped to one service name.
    #[derive(Debug, Clone)]
    pub struct KeychainProvider {
        service_name: String,
    }

    impl KeychainProvider {
        /// Create a new keychain provider for a specific service
        ///
        /// # Arguments
        /// * `service_name` - Service identifier (e.g., "Chatrizz.admin")
        pub fn new(service_name: impl Into<String>) -> Self {
            Self { service_name: service_name.into() }
        }

        #[must_use]
        pub fn service_name(&self) -> &str {
            &self.service_name
        }

        fn create_entry(&self, account: &str) -> Result<Entry, KeychainError> {
            Entry::new(&self.service_name, account).map_err(|e| {
                KeychainError::AccessFailed(format!("Failed to create keychain entry: {e}"))
            })
        }
    }

    impl SecretVault for KeychainProvider {
        fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
            debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

            let entry = self.create_entry(key)?;
            entry.set_password(value).map_err(|e| {
                KeychainError::AccessFailed(format!("Failed to store secret for {key}: {e}"))
            })
        }

        fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
            debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

            let entry = self.create_entry(key)?;
            entry.get_password().map_err(|e| {
                if matches!(e, keyring::Error::NoEntry) {
                    KeychainError::NotFound
                } else {
                    KeychainError::AccessFailed(format!("Failed to retrieve secret for {key}: {e}"))
                }
            })
        }

        fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
            debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

            let entry = self.create_entry(key)?;
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(KeychainError::AccessFailed(format!(
                    "Failed to delete secret for {key}: {e}"
                ))),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn provider_keeps_service_name() {
            let keychain = KeychainProvider::new("Chatrizz.test");
            assert_eq!(keychain.service_name(), "Chatrizz.test");
        }
    }
}
