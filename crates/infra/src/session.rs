//! Wiring from configuration to a ready-to-use admin session
//!
//! Picks the credential store named by the configuration and assembles the
//! gateway, auth service and resource API over it.

use std::path::PathBuf;
use std::sync::Arc;

use chatrizz_common::auth::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use chatrizz_core::SessionObserver;
use chatrizz_domain::{ChatrizzError, Config, CredentialStoreKind, SessionConfig};
use tracing::debug;

use crate::api::{AdminApi, ApiClient, ApiError, AuthService, Gateway, GatewayConfig};

const DEFAULT_SESSION_FILE: &str = "session.json";

/// Build the credential store selected by `config`.
///
/// # Errors
/// Returns `ChatrizzError::Config` when the keychain store is requested but
/// the crate was built without the `keychain` feature.
pub fn credential_store(config: &SessionConfig) -> Result<Arc<dyn CredentialStore>, ChatrizzError> {
    match config.store {
        CredentialStoreKind::Memory => Ok(Arc::new(MemoryCredentialStore::new())),
        CredentialStoreKind::File => {
            let path = config.file_path.as_ref().map_or_else(default_session_file, PathBuf::from);
            debug!(path = %path.display(), "using file credential store");
            Ok(Arc::new(FileCredentialStore::new(path)))
        }
        CredentialStoreKind::Keychain => keychain_store(&config.keychain_service),
    }
}

#[cfg(feature = "keychain")]
fn keychain_store(service: &str) -> Result<Arc<dyn CredentialStore>, ChatrizzError> {
    use chatrizz_common::auth::KeychainCredentialStore;
    use chatrizz_common::security::KeychainProvider;

    debug!(service, "using keychain credential store");
    Ok(Arc::new(KeychainCredentialStore::new(KeychainProvider::new(service))))
}

#[cfg(not(feature = "keychain"))]
fn keychain_store(_service: &str) -> Result<Arc<dyn CredentialStore>, ChatrizzError> {
    Err(ChatrizzError::Config(
        "keychain credential store requires the `keychain` feature".to_string(),
    ))
}

/// `~/.chatrizz/session.json`, or `./.chatrizz-session.json` without a home.
fn default_session_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".chatrizz-session.json"),
        |home| PathBuf::from(home).join(".chatrizz").join(DEFAULT_SESSION_FILE),
    )
}

/// Gateway plus the services built on it.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub gateway: Arc<Gateway>,
    pub auth: AuthService,
    pub api: AdminApi,
}

impl AdminSession {
    /// Assemble a session from configuration.
    ///
    /// # Errors
    /// `Config` if the store or gateway cannot be built
    pub fn connect(config: &Config, observer: Arc<dyn SessionObserver>) -> Result<Self, ApiError> {
        let store = credential_store(&config.session)
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Self::with_store(config, store, observer)
    }

    /// Assemble a session over an existing credential store.
    ///
    /// # Errors
    /// `Config` if the gateway cannot be built
    pub fn with_store(
        config: &Config,
        store: Arc<dyn CredentialStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, ApiError> {
        let mut builder = Gateway::builder()
            .config(GatewayConfig::from_config(config))
            .store(store)
            .observer(observer);
        if let Some(agent) = &config.api.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let gateway = Arc::new(builder.build()?);
        Ok(Self {
            auth: AuthService::new(gateway.clone()),
            api: AdminApi::new(ApiClient::new(gateway.clone())),
            gateway,
        })
    }
}

#[cfg(test)]
mod tests {
    use chatrizz_common::auth::SessionKey;
    use chatrizz_core::NoopSessionObserver;

    use super::*;

    #[tokio::test]
    async fn file_store_uses_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let config = SessionConfig {
            store: CredentialStoreKind::File,
            file_path: Some(path.display().to_string()),
            ..SessionConfig::default()
        };

        let store = credential_store(&config).unwrap();
        store.set(SessionKey::RefreshToken, "r", None).await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn connect_with_memory_store() {
        let mut config = Config::default();
        config.session.store = CredentialStoreKind::Memory;
        config.api.base_url = "http://localhost:9/api/v1/".into();

        let session = AdminSession::connect(&config, Arc::new(NoopSessionObserver)).unwrap();
        assert_eq!(session.gateway.config().base_url, "http://localhost:9/api/v1/");
        assert_eq!(session.gateway.config().access_ttl, chrono::Duration::hours(24));
    }
}
