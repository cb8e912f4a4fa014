//! Platform user management

use chatrizz_core::ListQuery;
use chatrizz_domain::constants::{MODERATION_PAGE_SIZE, USER_CONTENT_PAGE_SIZE};
use chatrizz_domain::{ActionAck, Content, ContentKind, Paginated, UserDetail, UserSummary};
use tracing::{info, instrument};

use super::{path_id, AdminApi};
use crate::api::errors::ApiError;
use crate::api::retry::RetryPolicy;

/// Empty user listing query (15 per page).
pub fn user_query() -> ListQuery {
    ListQuery::new(MODERATION_PAGE_SIZE)
}

/// Query for one user's content, optionally restricted to one kind.
pub fn user_content_query(kind: Option<ContentKind>) -> ListQuery {
    ListQuery::new(USER_CONTENT_PAGE_SIZE)
        .with_upper_filter("type", kind.map_or("", ContentKind::as_str))
}

impl AdminApi {
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn list_users(&self, query: &ListQuery) -> Result<Paginated<UserSummary>, ApiError> {
        self.read_query("admin/users/", query.to_pairs()).await
    }

    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<UserDetail, ApiError> {
        self.read(&format!("admin/user/{}/", path_id(id)?)).await
    }

    /// Posts, products and reviews created by one user.
    ///
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn user_content(
        &self,
        id: &str,
        query: &ListQuery,
    ) -> Result<Paginated<Content>, ApiError> {
        self.read_query(&format!("admin/user_content/{}/", path_id(id)?), query.to_pairs()).await
    }

    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self))]
    pub async fn suspend_user(&self, id: &str) -> Result<ActionAck, ApiError> {
        let ack = self.client.get(&format!("admin/suspend/{}/", path_id(id)?)).await?;
        info!(id, "user suspended");
        Ok(ack)
    }

    /// Remove a user's verification badge. Retried once on transient failure.
    ///
    /// # Errors
    /// Propagates the gateway error after the retry
    #[instrument(skip(self))]
    pub async fn remove_badge(&self, id: &str) -> Result<ActionAck, ApiError> {
        self.read_with(RetryPolicy::ONCE, &format!("admin/remove_badge/{}/", path_id(id)?)).await
    }
}
