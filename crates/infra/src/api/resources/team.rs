//! Admin team management

use chatrizz_core::ListQuery;
use chatrizz_domain::constants::TEAM_PAGE_SIZE;
use chatrizz_domain::{ActionAck, Admin, AdminPayload, Paginated};
use tracing::{info, instrument};

use super::{path_id, AdminApi};
use crate::api::errors::ApiError;

/// Empty team listing query (10 per page).
pub fn admin_query() -> ListQuery {
    ListQuery::new(TEAM_PAGE_SIZE)
}

impl AdminApi {
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn list_admins(&self, query: &ListQuery) -> Result<Paginated<Admin>, ApiError> {
        self.read_query("admin/team/", query.to_pairs()).await
    }

    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self))]
    pub async fn get_admin(&self, id: &str) -> Result<Admin, ApiError> {
        self.read(&format!("admin/team/{}/", path_id(id)?)).await
    }

    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn create_admin(&self, payload: &AdminPayload) -> Result<Admin, ApiError> {
        let admin: Admin = self.client.post("admin/team/", payload).await?;
        info!(admin_id = %admin.id, "admin created");
        Ok(admin)
    }

    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self, payload))]
    pub async fn update_admin(&self, id: &str, payload: &AdminPayload) -> Result<Admin, ApiError> {
        self.client.patch(&format!("admin/team/{}/", path_id(id)?), payload).await
    }

    /// Suspend an admin account. The backend exposes this as a GET.
    ///
    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self))]
    pub async fn suspend_admin(&self, id: &str) -> Result<ActionAck, ApiError> {
        self.client.get(&format!("admin/suspend/{}/", path_id(id)?)).await
    }
}
