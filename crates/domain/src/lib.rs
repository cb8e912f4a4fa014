//! # Chatrizz Domain
//!
//! Business domain types and models for the Chatrizz admin client.
//!
//! This crate contains:
//! - Wire types for the admin REST backend (team, broadcasts, moderation,
//!   users, overview)
//! - Domain error type and Result definition
//! - Configuration structures
//! - Backend contract constants
//!
//! ## Architecture
//! - No dependencies on other Chatrizz crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
