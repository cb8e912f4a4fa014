//! Content moderation

use chatrizz_core::ListQuery;
use chatrizz_domain::constants::MODERATION_PAGE_SIZE;
use chatrizz_domain::{ActionAck, Content, ContentKind, Paginated};
use tracing::{info, instrument};

use super::{path_id, AdminApi};
use crate::api::errors::ApiError;

/// Content listing query, optionally restricted to one kind.
pub fn content_query(kind: Option<ContentKind>) -> ListQuery {
    ListQuery::new(MODERATION_PAGE_SIZE).with_upper_filter("type", kind.map_or("", ContentKind::as_str))
}

impl AdminApi {
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn list_content(&self, query: &ListQuery) -> Result<Paginated<Content>, ApiError> {
        self.read_query("admin/content/", query.to_pairs()).await
    }

    /// Delete a post, product or review.
    ///
    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self), fields(kind = kind.as_str()))]
    pub async fn delete_content(&self, kind: ContentKind, id: &str) -> Result<ActionAck, ApiError> {
        let path = format!("admin/{}/{}/", kind.delete_segment(), path_id(id)?);
        let ack = self.client.post_empty(&path).await?;
        info!(id, "content deleted");
        Ok(ack)
    }
}
