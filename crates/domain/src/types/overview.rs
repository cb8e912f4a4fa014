//! Dashboard overview metrics

use serde::{Deserialize, Serialize};

use super::report::Report;

/// One day of a single engagement series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// ISO date (`YYYY-MM-DD`), optionally with a time part
    pub day: String,
    pub count: u64,
}

/// Engagement series keyed by activity. Any series may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementTrend {
    pub posts: Vec<TrendPoint>,
    pub comments: Vec<TrendPoint>,
    pub likes: Vec<TrendPoint>,
    pub shares: Vec<TrendPoint>,
}

/// All engagement counts for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEngagement {
    pub date: String,
    pub posts: u64,
    pub comments: u64,
    pub likes: u64,
    pub shares: u64,
}

/// Overview page payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overview {
    pub total_users: u64,
    pub active_users: u64,
    pub total_posts: u64,
    pub engagement_rate: f64,
    pub change_engagement_rate: Option<f64>,
    pub trend: Option<EngagementTrend>,
    /// Most recent reports shown under the metrics
    pub results: Vec<Report>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_tolerates_missing_series() {
        let overview: Overview = serde_json::from_str(
            r#"{
                "total_users": 1200, "active_users": 300, "total_posts": 88,
                "engagement_rate": 12.5, "change_engagement_rate": -1.5,
                "trend": { "posts": [ { "day": "2025-01-02", "count": 4 } ] }
            }"#,
        )
        .unwrap();

        let trend = overview.trend.unwrap();
        assert_eq!(trend.posts.len(), 1);
        assert!(trend.likes.is_empty());
        assert!(overview.results.is_empty());
    }
}
