//! Typed admin REST resources
//!
//! Every call is a pass-through over [`ApiClient`], so authentication,
//! credential refresh and error notices come from the gateway. Each resource
//! lives in its own file as an `impl AdminApi` block.
//!
//! Reads retry transient failures per [`RetryPolicy::QUERY`]; mutations are
//! sent once.

use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::errors::ApiError;
use super::retry::RetryPolicy;

mod content;
mod groups;
mod notifications;
mod overview;
mod reports;
mod team;
mod users;

pub use content::content_query;
pub use groups::group_query;
pub use notifications::notification_query;
pub use reports::report_query;
pub use team::admin_query;
pub use users::{user_content_query, user_query};

/// Admin dashboard API.
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn read<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.read_with(RetryPolicy::QUERY, path).await
    }

    async fn read_with<T: DeserializeOwned>(
        &self,
        policy: RetryPolicy,
        path: &str,
    ) -> Result<T, ApiError> {
        let client = &self.client;
        policy.run(move || client.get(path)).await
    }

    async fn read_query<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let client = &self.client;
        RetryPolicy::QUERY.run(move || client.get_query(path, pairs.clone())).await
    }
}

/// Percent-encode a record id for use as a path segment.
fn path_id(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidInput("id must not be empty".into()));
    }
    Ok(urlencoding::encode(id).into_owned())
}
