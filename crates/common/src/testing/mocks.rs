//! Mock implementations of common traits
//!
//! Provides mock objects for testing purposes.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::auth::{CredentialStore, CredentialStoreError, MemoryCredentialStore, SessionKey};
use crate::security::{KeychainError, SecretVault};

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// In-memory stand-in for the platform keychain.
///
/// Clones share storage, so a test can hand one clone to the code under test
/// and inspect the other.
#[derive(Debug, Clone)]
pub struct MockKeychainProvider {
    storage: StorageData,
    service_name: String,
}

impl MockKeychainProvider {
    /// Create a new mock keychain provider with a service name for namespacing.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { storage: Arc::new(Mutex::new(HashMap::new())), service_name: service_name.into() }
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Number of stored secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }
}

impl Default for MockKeychainProvider {
    fn default() -> Self {
        Self::new("chatrizz-test")
    }
}

impl SecretVault for MockKeychainProvider {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.storage.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.storage.lock().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.storage.lock().remove(key);
        Ok(())
    }

    fn secret_exists(&self, key: &str) -> bool {
        self.storage.lock().contains_key(key)
    }
}

/// Credential store whose writes can be switched to fail.
///
/// Reads and writes go to an inner [`MemoryCredentialStore`] until
/// [`FlakyCredentialStore::fail_writes`] is called.
#[derive(Debug, Clone, Default)]
pub struct FlakyCredentialStore {
    inner: MemoryCredentialStore,
    failing: Arc<AtomicBool>,
}

impl FlakyCredentialStore {
    #[must_use]
    pub fn new(inner: MemoryCredentialStore) -> Self {
        Self { inner, failing: Arc::new(AtomicBool::new(false)) }
    }

    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn inner(&self) -> &MemoryCredentialStore {
        &self.inner
    }

    fn check(&self) -> Result<(), CredentialStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CredentialStoreError::Backend("simulated write failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialStore for FlakyCredentialStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, CredentialStoreError> {
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: SessionKey,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CredentialStoreError> {
        self.check()?;
        self.inner.set(key, value, expires_at).await
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.inner.clear().await
    }
}
