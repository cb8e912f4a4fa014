//! # Chatrizz Core
//!
//! Business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Session feedback ports implemented by adapters
//! - List-query cleaning shared by every paginated resource
//! - Overview trend shaping
//! - Role and permission checks
//!
//! ## Architecture Principles
//! - Only depends on `chatrizz-domain`
//! - No HTTP, storage, or platform code
//! - All external effects via traits

pub mod listing;
pub mod overview;
pub mod permissions;
pub mod session;

pub use listing::{ListQuery, SearchTerm};
pub use overview::{merge_trend, OverviewQuery};
pub use permissions::Permissions;
pub use session::{Notice, NoopSessionObserver, SessionObserver, SessionState};
