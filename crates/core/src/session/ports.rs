//! Port interfaces for session feedback
//!
//! The request gateway and the auth service report user-facing outcomes
//! through [`SessionObserver`]. What a notice looks like (toast, log line,
//! terminal message) and what "go to the login surface" means are left to
//! the adapter.

use serde::{Deserialize, Serialize};

/// Where the current session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No usable access credential
    Unauthenticated,
    /// Access credential present and assumed valid
    Authenticated,
    /// A refresh exchange is in flight
    RefreshPending,
}

/// User-facing outcome worth surfacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    PermissionDenied,
    ServerError,
    SessionExpired,
    LoginSucceeded,
    LoggedOut,
}

impl Notice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "You don't have permission to perform this action.",
            Self::ServerError => "Server error. Please try again later.",
            Self::SessionExpired => "Session expired. Please login again.",
            Self::LoginSucceeded => "Login successful!",
            Self::LoggedOut => "Logged out successfully",
        }
    }

    /// Whether the notice reports a failure.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::PermissionDenied | Self::ServerError | Self::SessionExpired)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives session feedback from the gateway and auth service.
///
/// Calls happen on the task that produced the outcome and must not block.
pub trait SessionObserver: Send + Sync {
    /// Surface a notice to the user.
    fn notify(&self, notice: Notice);

    /// The session is over; send the user to the login surface.
    fn session_ended(&self);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionObserver;

impl SessionObserver for NoopSessionObserver {
    fn notify(&self, _notice: Notice) {}

    fn session_ended(&self) {}
}
