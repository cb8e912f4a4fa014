//! Session credential storage layered on top of a [`SecretVault`].
//!
//! # Module Layering
//!
//! - **`security::keychain`**: generic secret storage via the platform keychain
//!   (macOS Keychain, Windows Credential Manager, Linux Secret Service)
//! - **`auth::keychain`** (this module): maps the session entries onto vault
//!   accounts and keeps their expiry next to them
//!
//! Each entry is stored under its own account name. Expiry lives in a
//! separate `metadata.<entry>` account as a small JSON document, so a value
//! written without an expiry leaves no metadata behind.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use tracing::debug;

use super::store::{CredentialStore, CredentialStoreError, SessionKey};
use crate::security::{KeychainError, SecretVault};

const METADATA_PREFIX: &str = "metadata.";

/// Credential store backed by any [`SecretVault`].
#[derive(Debug, Clone)]
pub struct KeychainCredentialStore<V> {
    vault: V,
}

impl<V: SecretVault> KeychainCredentialStore<V> {
    pub fn new(vault: V) -> Self {
        Self { vault }
    }

    #[must_use]
    pub fn vault(&self) -> &V {
        &self.vault
    }

    fn metadata_account(key: SessionKey) -> String {
        format!("{METADATA_PREFIX}{}", key.as_str())
    }

    fn read_expiry(&self, key: SessionKey) -> Result<Option<DateTime<Utc>>, CredentialStoreError> {
        let raw = match self.vault.get_secret(&Self::metadata_account(key)) {
            Ok(raw) => raw,
            Err(KeychainError::NotFound) => return Ok(None),
            Err(other) => return Err(other.into()),
        };

        let metadata: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| CredentialStoreError::Corrupt(format!("metadata for {key}: {e}")))?;

        Ok(metadata
            .get("expires_at")
            .and_then(serde_json::Value::as_i64)
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single()))
    }

    fn remove(&self, key: SessionKey) -> Result<(), CredentialStoreError> {
        self.vault.delete_secret(key.as_str())?;
        self.vault.delete_secret(&Self::metadata_account(key))?;
        Ok(())
    }
}

impl From<KeychainError> for CredentialStoreError {
    fn from(err: KeychainError) -> Self {
        match err {
            KeychainError::Serialization(e) => Self::Corrupt(e.to_string()),
            other => Self::Backend(other.to_string()),
        }
    }
}

#[async_trait]
impl<V: SecretVault> CredentialStore for KeychainCredentialStore<V> {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, CredentialStoreError> {
        let value = match self.vault.get_secret(key.as_str()) {
            Ok(value) => value,
            Err(KeychainError::NotFound) => return Ok(None),
            Err(other) => return Err(other.into()),
        };

        if let Some(expires_at) = self.read_expiry(key)? {
            if Utc::now() >= expires_at {
                debug!(entry = %key, "keychain entry expired; removing");
                self.remove(key)?;
                return Ok(None);
            }
        }

        Ok(Some(value))
    }

    async fn set(
        &self,
        key: SessionKey,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CredentialStoreError> {
        debug!(entry = %key, expires = expires_at.is_some(), "storing session entry in keychain");

        self.vault.set_secret(key.as_str(), value)?;

        let metadata_account = Self::metadata_account(key);
        match expires_at {
            Some(at) => {
                let metadata = json!({ "expires_at": at.timestamp() });
                self.vault.set_secret(&metadata_account, &metadata.to_string())?;
            }
            None => self.vault.delete_secret(&metadata_account)?,
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        debug!("clearing session entries from keychain");
        for key in SessionKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}
