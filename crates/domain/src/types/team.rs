//! Admin team members

use serde::{Deserialize, Serialize};

/// Role an admin is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRole {
    Administrator,
    #[serde(rename = "Sub-admin")]
    SubAdmin,
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "sub-admin" | "subadmin" | "sub_admin" => Ok(Self::SubAdmin),
            other => Err(format!("unknown admin role '{other}'")),
        }
    }
}

/// Admin team member as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub full_name: String,
    pub email: String,
    /// Display role; older records carry free-form values
    pub role: String,
    #[serde(default)]
    pub admin_role: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Create/update body for an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPayload {
    pub full_name: String,
    pub email: String,
    pub role: AdminRole,
}
