//! Admin roles and permission names

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Moderator,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewUsers,
    EditUsers,
    DeleteUsers,
    ViewContent,
    ModerateContent,
    ViewAnalytics,
    ManagePayments,
    ManagePromotions,
    ViewReports,
}

/// Role and grants of a signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessProfile {
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}
