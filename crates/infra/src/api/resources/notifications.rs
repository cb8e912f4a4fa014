//! Broadcast notifications

use chatrizz_core::ListQuery;
use chatrizz_domain::constants::NOTIFICATION_PAGE_SIZE;
use chatrizz_domain::{Audience, Notification, NotificationPayload, Paginated};
use tracing::instrument;

use super::{path_id, AdminApi};
use crate::api::errors::ApiError;

/// Broadcast listing query, optionally restricted to one audience.
pub fn notification_query(audience: Option<Audience>) -> ListQuery {
    ListQuery::new(NOTIFICATION_PAGE_SIZE).with_filter("type", audience.map_or("", Audience::as_str))
}

impl AdminApi {
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn list_notifications(
        &self,
        query: &ListQuery,
    ) -> Result<Paginated<Notification>, ApiError> {
        self.read_query("admin/broadcast/", query.to_pairs()).await
    }

    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self))]
    pub async fn get_notification(&self, id: &str) -> Result<Notification, ApiError> {
        self.read(&format!("admin/single_broadcast/{}", path_id(id)?)).await
    }

    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self, payload), fields(audience = payload.audience.as_str()))]
    pub async fn create_notification(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Notification, ApiError> {
        self.client.post("admin/broadcast/", payload).await
    }

    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self, payload))]
    pub async fn update_notification(
        &self,
        id: &str,
        payload: &NotificationPayload,
    ) -> Result<Notification, ApiError> {
        self.client.patch(&format!("admin/single_broadcast/{}", path_id(id)?), payload).await
    }
}
