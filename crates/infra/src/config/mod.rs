//! Configuration loading and management
//!
//! Layers built-in defaults, an optional config file and environment
//! overrides into a validated [`Config`](chatrizz_domain::Config).

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, load_with, probe_config_paths, validate};
