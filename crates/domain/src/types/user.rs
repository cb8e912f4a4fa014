//! Platform users and groups as seen by admins

use serde::{Deserialize, Serialize};

/// Row of the users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers: u64,
    pub created_at: String,
    #[serde(default)]
    pub last_seen: Option<String>,
    pub is_active: bool,
}

/// Full profile of a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub email: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Account type (personal, business, organization)
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub post_count: u64,
    #[serde(default)]
    pub messages_count: u64,
    pub is_active: bool,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub allowed_call: Option<String>,
    #[serde(default)]
    pub allowed_message: Option<String>,
    #[serde(default)]
    pub business_category: Option<String>,
    #[serde(default)]
    pub business_description: Option<String>,
    #[serde(default)]
    pub business_location: Option<String>,
    #[serde(default)]
    pub organization_url: Option<String>,
    #[serde(default)]
    pub active_subscription: bool,
}

/// Community group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
