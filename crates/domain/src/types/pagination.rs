//! Collection envelopes returned by list endpoints

use serde::{Deserialize, Serialize};

/// Links to neighbouring pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Page envelope used by most admin list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub links: PageLinks,
    pub total: u64,
    pub limit: u32,
    pub pages: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Whether the backend advertises a following page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.links.next.is_some()
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.links.previous.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Count/next/previous envelope used by the reports endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> CursorPage<T> {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Acknowledgement body returned by moderation actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}
