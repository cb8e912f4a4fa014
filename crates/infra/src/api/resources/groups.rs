//! Community groups

use chatrizz_core::ListQuery;
use chatrizz_domain::constants::MODERATION_PAGE_SIZE;
use chatrizz_domain::{Group, Paginated};
use tracing::instrument;

use super::AdminApi;
use crate::api::errors::ApiError;

pub fn group_query() -> ListQuery {
    ListQuery::new(MODERATION_PAGE_SIZE)
}

impl AdminApi {
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn list_groups(&self, query: &ListQuery) -> Result<Paginated<Group>, ApiError> {
        self.read_query("admin/groups/", query.to_pairs()).await
    }
}
