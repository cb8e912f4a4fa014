//! # Chatrizz Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP transport and the authenticated request gateway
//! - Auth service and typed admin resources
//! - Configuration loading
//! - Credential store selection
//! - Conversions from external errors into `ChatrizzError`
//!
//! ## Architecture
//! - Implements traits defined in `chatrizz-core` and `chatrizz-common`
//! - Depends on `chatrizz-domain`, `chatrizz-common` and `chatrizz-core`
//! - Contains all "impure" code (network, files, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observer;
pub mod session;

// Re-export commonly used items
pub use api::{AdminApi, ApiClient, ApiError, AuthService, Gateway, GatewayConfig};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observer::TracingSessionObserver;
pub use session::{credential_store, AdminSession};
