//! Session credential plumbing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ CredentialStore  │  get / set / clear of the session entries
//! └────────┬─────────┘
//!          ├──► MemoryCredentialStore    (process-local)
//!          ├──► FileCredentialStore      (JSON file, owner-only)
//!          └──► KeychainCredentialStore  (any SecretVault)
//!
//! ┌──────────────────┐
//! │  RefreshGate<W>  │  single-flight refresh + FIFO waiter queue
//! └──────────────────┘
//! ```
//!
//! [`AttemptedRequest`] carries the replay flag a request needs so it is never
//! retried more than once after a refresh, and [`jwt`] reads credential expiry
//! for session restoration.

pub mod attempt;
pub mod file_store;
pub mod gate;
pub mod jwt;
pub mod keychain;
pub mod store;

pub use attempt::AttemptedRequest;
pub use file_store::FileCredentialStore;
pub use gate::{Admission, RefreshGate, RefreshLease};
pub use jwt::{is_token_expired, token_expiry, TokenExpiry};
pub use keychain::KeychainCredentialStore;
pub use store::{
    CredentialStore, CredentialStoreError, MemoryCredentialStore, SessionKey, StoredSecret,
};
