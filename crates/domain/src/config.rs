//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACCESS_TTL_HOURS, DEFAULT_BASE_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

/// Where session credentials live and how long access credentials last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub store: CredentialStoreKind,
    /// Session file used by [`CredentialStoreKind::File`]
    pub file_path: Option<String>,
    /// Keychain service name used by [`CredentialStoreKind::Keychain`]
    pub keychain_service: String,
    pub access_ttl_hours: i64,
}

/// Credential store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStoreKind {
    #[default]
    Keychain,
    File,
    Memory,
}

impl std::str::FromStr for CredentialStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keychain" => Ok(Self::Keychain),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown credential store '{other}'")),
        }
    }
}

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: CredentialStoreKind::default(),
            file_path: None,
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            access_ttl_hours: DEFAULT_ACCESS_TTL_HOURS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default() }
    }
}
