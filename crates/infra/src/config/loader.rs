//! Configuration loader
//!
//! Builds the application configuration in three layers.
//!
//! ## Loading Strategy
//! 1. Start from the built-in defaults
//! 2. Overlay a config file, if one is given or found by probing
//! 3. Overlay `CHATRIZZ_*` environment variables
//!
//! The result is validated before it is returned.
//!
//! ## Environment Variables
//! - `CHATRIZZ_API_BASE_URL`: Backend base URL
//! - `CHATRIZZ_API_TIMEOUT_SECS`: Per-call timeout in seconds
//! - `CHATRIZZ_API_USER_AGENT`: User agent sent with every call
//! - `CHATRIZZ_SESSION_STORE`: `keychain`, `file` or `memory`
//! - `CHATRIZZ_SESSION_FILE`: Session file for the `file` store
//! - `CHATRIZZ_SESSION_KEYCHAIN_SERVICE`: Keychain service name
//! - `CHATRIZZ_SESSION_ACCESS_TTL_HOURS`: Lifetime of stored access credentials
//! - `CHATRIZZ_LOG_LEVEL`: Default log filter
//! - `CHATRIZZ_LOG_FORMAT`: `pretty` or `json`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./chatrizz.toml`, `./chatrizz.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use chatrizz_domain::{ChatrizzError, Config, CredentialStoreKind, LogFormat, Result};

const FILE_NAMES: [&str; 4] = ["chatrizz.toml", "chatrizz.json", "config.toml", "config.json"];

pub const ENV_BASE_URL: &str = "CHATRIZZ_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHATRIZZ_API_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "CHATRIZZ_API_USER_AGENT";
pub const ENV_SESSION_STORE: &str = "CHATRIZZ_SESSION_STORE";
pub const ENV_SESSION_FILE: &str = "CHATRIZZ_SESSION_FILE";
pub const ENV_KEYCHAIN_SERVICE: &str = "CHATRIZZ_SESSION_KEYCHAIN_SERVICE";
pub const ENV_ACCESS_TTL_HOURS: &str = "CHATRIZZ_SESSION_ACCESS_TTL_HOURS";
pub const ENV_LOG_LEVEL: &str = "CHATRIZZ_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CHATRIZZ_LOG_FORMAT";

/// Load configuration from probed files and the environment.
///
/// # Errors
/// Returns `ChatrizzError::Config` if a found file is invalid, an
/// environment override cannot be parsed, or validation fails.
pub fn load() -> Result<Config> {
    load_with(None)
}

/// Load configuration, reading `path` instead of probing when given.
///
/// # Errors
/// Returns `ChatrizzError::Config` if `path` does not exist, a file is
/// invalid, an environment override cannot be parsed, or validation fails.
pub fn load_with(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found; using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Fields missing from
/// the file keep their defaults. JSON and TOML are detected by extension.
///
/// # Errors
/// Returns `ChatrizzError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ChatrizzError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ChatrizzError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ChatrizzError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ChatrizzError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ChatrizzError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ChatrizzError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Overlay `CHATRIZZ_*` variables onto `config`.
///
/// Unset and blank variables leave the current value untouched.
///
/// # Errors
/// Returns `ChatrizzError::Config` if a numeric or enumerated variable
/// cannot be parsed.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(url) = env_opt(ENV_BASE_URL) {
        config.api.base_url = url;
    }
    if let Some(secs) = env_opt(ENV_TIMEOUT_SECS) {
        config.api.timeout_secs = secs
            .parse()
            .map_err(|e| ChatrizzError::Config(format!("Invalid {ENV_TIMEOUT_SECS}: {e}")))?;
    }
    if let Some(agent) = env_opt(ENV_USER_AGENT) {
        config.api.user_agent = Some(agent);
    }
    if let Some(kind) = env_opt(ENV_SESSION_STORE) {
        config.session.store = kind.parse::<CredentialStoreKind>().map_err(ChatrizzError::Config)?;
    }
    if let Some(file) = env_opt(ENV_SESSION_FILE) {
        config.session.file_path = Some(file);
    }
    if let Some(service) = env_opt(ENV_KEYCHAIN_SERVICE) {
        config.session.keychain_service = service;
    }
    if let Some(hours) = env_opt(ENV_ACCESS_TTL_HOURS) {
        config.session.access_ttl_hours = hours
            .parse()
            .map_err(|e| ChatrizzError::Config(format!("Invalid {ENV_ACCESS_TTL_HOURS}: {e}")))?;
    }
    if let Some(level) = env_opt(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(format) = env_opt(ENV_LOG_FORMAT) {
        config.logging.format = match format.to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ChatrizzError::Config(format!("Invalid {ENV_LOG_FORMAT}: '{other}'")))
            }
        };
    }
    Ok(())
}

/// Check the assembled configuration.
///
/// # Errors
/// Returns `ChatrizzError::Config` naming the first invalid setting.
pub fn validate(config: &Config) -> Result<()> {
    let url = url::Url::parse(&config.api.base_url).map_err(|e| {
        ChatrizzError::Config(format!("Invalid base URL '{}': {e}", config.api.base_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ChatrizzError::Config(format!(
            "Base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if config.api.timeout_secs == 0 {
        return Err(ChatrizzError::Config("Timeout must be at least one second".into()));
    }
    if config.session.access_ttl_hours <= 0 {
        return Err(ChatrizzError::Config("Access credential lifetime must be positive".into()));
    }
    if config.session.store == CredentialStoreKind::Keychain
        && config.session.keychain_service.trim().is_empty()
    {
        return Err(ChatrizzError::Config("Keychain service name is empty".into()));
    }
    Ok(())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
