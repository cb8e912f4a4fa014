//! Broadcast notifications

use serde::{Deserialize, Serialize};

/// Audience a broadcast targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Audience {
    All,
    Admins,
    Individual,
    Business,
    Organization,
}

impl Audience {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Admins => "ADMINS",
            Self::Individual => "INDIVIDUAL",
            Self::Business => "BUSINESS",
            Self::Organization => "ORGANIZATION",
        }
    }
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "ADMINS" => Ok(Self::Admins),
            "INDIVIDUAL" => Ok(Self::Individual),
            "BUSINESS" => Ok(Self::Business),
            "ORGANIZATION" => Ok(Self::Organization),
            other => Err(format!("unknown audience '{other}'")),
        }
    }
}

/// Delivery channel of a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "IN-APP")]
    InApp,
    #[serde(rename = "PUSH")]
    Push,
    #[serde(rename = "EMAIL")]
    Email,
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "IN-APP" | "INAPP" => Ok(Self::InApp),
            "PUSH" => Ok(Self::Push),
            "EMAIL" => Ok(Self::Email),
            other => Err(format!("unknown channel '{other}'")),
        }
    }
}

/// Broadcast notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub audience: Audience,
    pub channel: Channel,
    pub created_at: String,
}

/// Create/update body for a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub audience: Audience,
    pub channel: Channel,
}
