//! Session plumbing shared across Chatrizz admin crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards; it is the layer
//! every credential passes through.
//!
//! # Feature Tiers
//!
//! - default: credential store port, memory/file/keychain stores over any
//!   [`security::SecretVault`], refresh gate, JWT expiry
//! - `platform`: the OS keychain as a [`security::SecretVault`]
//! - `test-utils`: in-memory keychain, flaky store, polling helpers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{
    AttemptedRequest, CredentialStore, CredentialStoreError, FileCredentialStore,
    KeychainCredentialStore, MemoryCredentialStore, RefreshGate, SessionKey,
};
#[cfg(feature = "platform")]
pub use security::KeychainProvider;
pub use security::{KeychainError, SecretVault};
