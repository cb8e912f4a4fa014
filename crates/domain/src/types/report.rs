//! Abuse reports filed by platform users

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Spam,
    Harassment,
    Hate,
    Violence,
    Misinformation,
    Nudity,
    Other,
}

impl ReportReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Harassment => "harassment",
            Self::Hate => "hate",
            Self::Violence => "violence",
            Self::Misinformation => "misinformation",
            Self::Nudity => "nudity",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spam" => Ok(Self::Spam),
            "harassment" => Ok(Self::Harassment),
            "hate" => Ok(Self::Hate),
            "violence" => Ok(Self::Violence),
            "misinformation" => Ok(Self::Misinformation),
            "nudity" => Ok(Self::Nudity),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown report reason '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Processing,
    Resolved,
}

impl ReportStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PROCESSING" => Ok(Self::Processing),
            "RESOLVED" => Ok(Self::Resolved),
            other => Err(format!("unknown report status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    /// Reported post id
    pub post: String,
    pub reason: ReportReason,
    #[serde(default)]
    pub details: Option<String>,
    pub status: ReportStatus,
    pub reporter: Reporter,
    pub created_at: String,
}

/// Result of resolving a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReport {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
