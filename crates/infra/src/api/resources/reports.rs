//! Abuse reports

use chatrizz_core::ListQuery;
use chatrizz_domain::constants::MODERATION_PAGE_SIZE;
use chatrizz_domain::{CursorPage, Report, ReportReason, ReportStatus, ResolvedReport};
use tracing::instrument;

use super::{path_id, AdminApi};
use crate::api::errors::ApiError;

/// Report listing query with optional status and reason filters.
pub fn report_query(status: Option<ReportStatus>, reason: Option<ReportReason>) -> ListQuery {
    ListQuery::new(MODERATION_PAGE_SIZE)
        .with_filter("status", status.map_or("", ReportStatus::as_str))
        .with_filter("reason", reason.map_or("", ReportReason::as_str))
}

impl AdminApi {
    /// # Errors
    /// Propagates the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn list_reports(&self, query: &ListQuery) -> Result<CursorPage<Report>, ApiError> {
        self.read_query("admin/reports/", query.to_pairs()).await
    }

    /// Mark a report resolved.
    ///
    /// # Errors
    /// Propagates the gateway error
    #[instrument(skip(self))]
    pub async fn resolve_report(&self, id: &str) -> Result<ResolvedReport, ApiError> {
        self.client.get(&format!("admin/resolve_report/{}/", path_id(id)?)).await
    }
}
