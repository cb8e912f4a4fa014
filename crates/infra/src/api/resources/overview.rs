//! Dashboard overview

use chatrizz_core::{merge_trend, OverviewQuery};
use chatrizz_domain::{DailyEngagement, Overview};
use tracing::instrument;

use super::AdminApi;
use crate::api::errors::ApiError;

impl AdminApi {
    /// Fetch the overview metrics for an optional date window.
    ///
    /// # Errors
    /// `InvalidInput` if the window ends before it starts (nothing is sent),
    /// otherwise the gateway error after retries
    #[instrument(skip(self, query))]
    pub async fn overview(&self, query: &OverviewQuery) -> Result<Overview, ApiError> {
        query.validate().map_err(ApiError::rejected_input)?;
        self.read_query("admin/overview/", query.to_pairs()).await
    }

    /// Overview together with its engagement series merged per day.
    ///
    /// # Errors
    /// Same as [`AdminApi::overview`]
    pub async fn overview_with_engagement(
        &self,
        query: &OverviewQuery,
    ) -> Result<(Overview, Vec<DailyEngagement>), ApiError> {
        let overview = self.overview(query).await?;
        let daily = overview.trend.as_ref().map(merge_trend).unwrap_or_default();
        Ok((overview, daily))
    }
}
