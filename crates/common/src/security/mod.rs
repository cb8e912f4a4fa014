//! Platform secret storage.

pub mod keychain;

#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;
pub use keychain::{KeychainError, SecretVault};
