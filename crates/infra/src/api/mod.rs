//! Admin REST API client
//!
//! # Architecture
//!
//! - [`Gateway`]: authenticated transport with single-flight credential
//!   refresh and FIFO replay
//! - [`AuthService`]: login, logout and startup session restore
//! - [`ApiClient`]: typed JSON calls over the gateway
//! - [`AdminApi`]: one method per admin endpoint, with call-site retry
//!
//! Structured tracing only; credentials never appear in spans or events.

pub mod auth;
pub mod client;
pub mod errors;
pub mod gateway;
pub mod request;
pub mod resources;
pub mod retry;

pub use auth::{AuthService, HttpTokenRefresher};
pub use client::ApiClient;
pub use errors::{ApiError, ApiErrorCategory};
pub use gateway::{Gateway, GatewayBuilder, GatewayConfig, TokenRefresher};
pub use request::{ApiRequest, ApiResponse};
pub use resources::{
    admin_query, content_query, group_query, notification_query, report_query,
    user_content_query, user_query, AdminApi,
};
pub use retry::RetryPolicy;
