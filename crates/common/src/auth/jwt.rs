//! Expiry inspection for JWT access credentials.
//!
//! Only the payload's `exp` claim is read. Signatures are never checked here;
//! the backend remains the authority on whether a credential is accepted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// What a credential's `exp` claim says about its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenExpiry {
    /// Valid until the given instant
    Expires(DateTime<Utc>),
    /// Payload carries no `exp` claim
    Never,
    /// Not a decodable JWT
    Unreadable,
}

impl TokenExpiry {
    /// Whether the credential should be treated as expired at `now`.
    ///
    /// Unreadable credentials count as expired.
    #[must_use]
    pub fn is_expired_at(self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Expires(at) => now >= at,
            Self::Never => false,
            Self::Unreadable => true,
        }
    }
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode the expiry of `token`.
#[must_use]
pub fn token_expiry(token: &str) -> TokenExpiry {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return TokenExpiry::Unreadable;
    };

    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) else {
        return TokenExpiry::Unreadable;
    };
    let Ok(claims) = serde_json::from_slice::<Claims>(&bytes) else {
        return TokenExpiry::Unreadable;
    };

    match claims.exp {
        Some(exp) => DateTime::from_timestamp(exp, 0)
            .map_or(TokenExpiry::Unreadable, TokenExpiry::Expires),
        None => TokenExpiry::Never,
    }
}

/// Shorthand for `token_expiry(token).is_expired_at(Utc::now())`.
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    token_expiry(token).is_expired_at(Utc::now())
}
