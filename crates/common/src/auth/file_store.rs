//! JSON-file credential store for hosts without a usable keychain.
//!
//! The whole session is one small JSON document keyed by entry name. Writes
//! go to a sibling temp file which is then renamed over the original. On unix
//! that file is created owner-only, before any secret is written to it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::store::{CredentialStore, CredentialStoreError, SessionKey, StoredSecret};

type SessionDocument = BTreeMap<SessionKey, StoredSecret>;

/// Credential store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SessionDocument, CredentialStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(SessionDocument::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CredentialStoreError::Corrupt(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionDocument::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, document: &SessionDocument) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))?;
        let staging = self.path.with_extension("tmp");
        write_private(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), entries = document.len(), "session file written");
        Ok(())
    }
}

/// Write `bytes` to a freshly created file that only the owner can read.
///
/// A leftover staging file is removed first; its permissions cannot be trusted.
async fn write_private(path: &Path, bytes: &[u8]) -> Result<(), CredentialStoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, CredentialStoreError> {
        let document = self.load().await?;
        Ok(document
            .get(&key)
            .filter(|secret| !secret.is_expired_at(Utc::now()))
            .map(|secret| secret.value.clone()))
    }

    async fn set(
        &self,
        key: SessionKey,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        document.insert(key, StoredSecret::new(value, expires_at));
        self.persist(&document).await
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
