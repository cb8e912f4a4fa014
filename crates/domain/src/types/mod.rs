//! Domain types and models
//!
//! Wire shapes of the admin REST backend. Everything here is plain data;
//! behaviour over these types lives in `chatrizz-core`.

pub mod access;
pub mod auth;
pub mod content;
pub mod notification;
pub mod overview;
pub mod pagination;
pub mod report;
pub mod team;
pub mod user;

// Re-export the full surface for convenience
pub use access::{AccessProfile, Permission, Role};
pub use auth::{
    IssuedTokens, LoginCredentials, LoginResponse, RefreshRequest, RefreshResponse,
    SessionProfile,
};
pub use content::{
    Author, Content, ContentKind, MediaFile, Post, PostMedia, Product, QuotedPost, Review,
    ReviewItem, ReviewVendor,
};
pub use notification::{Audience, Channel, Notification, NotificationPayload};
pub use overview::{DailyEngagement, EngagementTrend, Overview, TrendPoint};
pub use pagination::{ActionAck, CursorPage, PageLinks, Paginated};
pub use report::{Report, ReportReason, ReportStatus, Reporter, ResolvedReport};
pub use team::{Admin, AdminPayload, AdminRole};
pub use user::{Group, UserDetail, UserSummary};
