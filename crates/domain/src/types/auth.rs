//! Login and token exchange wire types

use serde::{Deserialize, Serialize};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::errors::{ChatrizzError, Result};

/// Email/password pair submitted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Apply the login form rules before anything is sent.
    ///
    /// # Errors
    /// Returns `ChatrizzError::InvalidInput` naming the first failing rule.
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ChatrizzError::InvalidInput("Email is required".into()));
        }
        if !looks_like_email(email) {
            return Err(ChatrizzError::InvalidInput("Invalid email address".into()));
        }
        if self.password.is_empty() {
            return Err(ChatrizzError::InvalidInput("Password is required".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ChatrizzError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

// Password stays out of logs and panics.
impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

/// Access/refresh pair issued at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTokens {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for IssuedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IssuedTokens { .. }")
    }
}

/// Login response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub tokens: IssuedTokens,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub profile: bool,
}

impl LoginResponse {
    /// Split the response into the token pair and the profile kept as
    /// session user data.
    #[must_use]
    pub fn into_parts(self) -> (IssuedTokens, SessionProfile) {
        let profile = SessionProfile {
            id: self.id,
            email: self.email,
            is_verified: self.is_verified,
            profile: self.profile,
        };
        (self.tokens, profile)
    }
}

/// Signed-in admin as remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub id: String,
    pub email: String,
    pub is_verified: bool,
    pub profile: bool,
}

/// Body of the refresh exchange.
#[derive(Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Successful refresh exchange. Some deployments rotate the refresh
/// credential as well.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl std::fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshResponse")
            .field("rotated_refresh", &self.refresh.is_some())
            .finish_non_exhaustive()
    }
}
