//! Application constants
//!
//! Centralized location for the backend contract values shared by every
//! crate: default endpoints, credential lifetime and list defaults.

// Backend defaults
pub const DEFAULT_BASE_URL: &str = "https://www.api.chatrizz.co/api/v1/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Chatrizz.admin";

// Access credentials are (re)issued with a one-day lifetime
pub const DEFAULT_ACCESS_TTL_HOURS: i64 = 24;

// Auth endpoints, relative to the base URL
pub const LOGIN_PATH: &str = "auth/login/";
pub const REFRESH_PATH: &str = "auth/token/refresh/";

// List queries
pub const DEFAULT_PAGE: u32 = 1;
pub const MIN_SEARCH_LENGTH: usize = 3;
pub const TEAM_PAGE_SIZE: u32 = 10;
pub const NOTIFICATION_PAGE_SIZE: u32 = 10;
pub const USER_CONTENT_PAGE_SIZE: u32 = 10;
pub const MODERATION_PAGE_SIZE: u32 = 15;

// Login form rules
pub const MIN_PASSWORD_LENGTH: usize = 6;
