//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: polling helpers for state changed by other tasks
//! - **[`mocks`]**: in-memory keychain and a credential store with switchable
//!   write failures
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for downstream crates.

pub mod async_utils;
pub mod mocks;

pub use async_utils::{poll_until, wait_for};
pub use mocks::{FlakyCredentialStore, MockKeychainProvider};
