//! Credential storage port and the in-memory store.
//!
//! A [`CredentialStore`] holds the three session entries (access credential,
//! refresh credential, signed-in profile). Entries may carry an expiry; an
//! expired entry reads as absent, the same way an expired cookie disappears.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named session entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    UserData,
}

impl SessionKey {
    /// Every entry [`CredentialStore::clear`] must remove.
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::UserData];

    /// Storage name of the entry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::UserData => "user_data",
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored value plus optional expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSecret {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredSecret {
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { value: value.into(), expires_at }
    }

    /// Whether the entry is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

impl std::fmt::Debug for StoredSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSecret")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Credential store failures.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    /// Backing storage refused the operation
    #[error("credential backend unavailable: {0}")]
    Backend(String),

    /// Persisted state could not be understood
    #[error("stored credentials are corrupt: {0}")]
    Corrupt(String),

    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Pluggable persistence for session credentials.
///
/// Implementations must be safe to share across tasks; the gateway reads the
/// access credential on every request.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read an entry. Missing and expired entries both yield `None`.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read
    async fn get(&self, key: SessionKey) -> Result<Option<String>, CredentialStoreError>;

    /// Write an entry, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written
    async fn set(
        &self,
        key: SessionKey,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CredentialStoreError>;

    /// Remove every session entry.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<Mutex<HashMap<SessionKey, StoredSecret>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an access/refresh pair that never expires.
    #[must_use]
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.lock();
            if let Some(access) = access {
                entries.insert(SessionKey::AccessToken, StoredSecret::new(access, None));
            }
            if let Some(refresh) = refresh {
                entries.insert(SessionKey::RefreshToken, StoredSecret::new(refresh, None));
            }
        }
        store
    }

    /// Raw entry including expiry metadata, regardless of expiry.
    #[must_use]
    pub fn entry(&self, key: SessionKey) -> Option<StoredSecret> {
        self.entries.lock().get(&key).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, CredentialStoreError> {
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(secret) if secret.is_expired_at(Utc::now()) => {
                entries.remove(&key);
                Ok(None)
            }
            Some(secret) => Ok(Some(secret.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: SessionKey,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CredentialStoreError> {
        self.entries.lock().insert(key, StoredSecret::new(value, expires_at));
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.entries.lock().clear();
        Ok(())
    }
}
