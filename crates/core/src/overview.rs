//! Overview query and engagement trend shaping

use std::collections::BTreeMap;

use chatrizz_domain::constants::MODERATION_PAGE_SIZE;
use chatrizz_domain::{ChatrizzError, DailyEngagement, EngagementTrend, Result, TrendPoint};
use chrono::{DateTime, NaiveDate};

use crate::listing::ListQuery;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Overview request: the usual list parameters plus an optional date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewQuery {
    pub list: ListQuery,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for OverviewQuery {
    fn default() -> Self {
        Self { list: ListQuery::new(MODERATION_PAGE_SIZE), start_date: None, end_date: None }
    }
}

impl OverviewQuery {
    #[must_use]
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// # Errors
    /// Returns `InvalidInput` when the window ends before it starts
    pub fn validate(&self) -> Result<()> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => Err(ChatrizzError::InvalidInput(format!(
                "end date {end} is before start date {start}"
            ))),
            _ => Ok(()),
        }
    }

    /// List pairs followed by `start_date` / `end_date` as `YYYY-MM-DD`.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.list.to_pairs();
        if let Some(start) = self.start_date {
            pairs.push(("start_date".to_string(), start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date".to_string(), end.format(DATE_FORMAT).to_string()));
        }
        pairs
    }
}

/// Sort key for a series day: its calendar date when parseable.
fn day_key(day: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(day).ok().map(|at| at.date_naive()))
        .or_else(|| day.get(..10).and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()))
}

/// Merge the four engagement series into one row per day.
///
/// Rows are keyed by the day string as the backend sent it. A series with no
/// point for a day contributes 0; if a series repeats a day, the last point
/// wins. Rows come back oldest first; days that don't parse as dates sort
/// after the ones that do.
#[must_use]
pub fn merge_trend(trend: &EngagementTrend) -> Vec<DailyEngagement> {
    let mut rows: BTreeMap<String, DailyEngagement> = BTreeMap::new();

    let mut apply = |series: &[TrendPoint], set: fn(&mut DailyEngagement, u64)| {
        for point in series {
            let row = rows.entry(point.day.clone()).or_insert_with(|| DailyEngagement {
                date: point.day.clone(),
                ..DailyEngagement::default()
            });
            set(row, point.count);
        }
    };

    apply(&trend.posts, |row, count| row.posts = count);
    apply(&trend.comments, |row, count| row.comments = count);
    apply(&trend.likes, |row, count| row.likes = count);
    apply(&trend.shares, |row, count| row.shares = count);

    let mut merged: Vec<_> = rows.into_values().collect();
    merged.sort_by(|a, b| match (day_key(&a.date), day_key(&b.date)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.date.cmp(&b.date)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.date.cmp(&b.date),
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: &str, count: u64) -> TrendPoint {
        TrendPoint { day: day.to_string(), count }
    }

    #[test]
    fn merges_series_by_day_with_zero_fill() {
        let trend = EngagementTrend {
            posts: vec![point("2025-03-02", 4), point("2025-03-01", 1)],
            comments: vec![point("2025-03-02", 7)],
            likes: vec![],
            shares: vec![point("2025-03-03", 2)],
        };

        let rows = merge_trend(&trend);

        let dates: Vec<_> = rows.iter().map(|row| row.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-03-02", "2025-03-03"]);
        assert_eq!(
            rows[1],
            DailyEngagement {
                date: "2025-03-02".into(),
                posts: 4,
                comments: 7,
                likes: 0,
                shares: 0
            }
        );
        assert_eq!(rows[2].shares, 2);
        assert_eq!(rows[2].posts, 0);
    }

    #[test]
    fn repeated_day_keeps_last_count() {
        let trend = EngagementTrend {
            likes: vec![point("2025-01-01", 3), point("2025-01-01", 9)],
            ..EngagementTrend::default()
        };

        assert_eq!(merge_trend(&trend)[0].likes, 9);
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let trend = EngagementTrend {
            posts: vec![point("2025-02-10T00:00:00Z", 1), point("2025-02-09T12:00:00+00:00", 2)],
            ..EngagementTrend::default()
        };

        let rows = merge_trend(&trend);
        assert_eq!(rows[0].posts, 2);
        assert_eq!(rows[1].posts, 1);
    }

    #[test]
    fn empty_trend_yields_no_rows() {
        assert!(merge_trend(&EngagementTrend::default()).is_empty());
    }

    #[test]
    fn overview_pairs_include_formatted_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5);
        let end = NaiveDate::from_ymd_opt(2025, 2, 1);
        let query = OverviewQuery::default().between(start, end);

        let pairs = query.to_pairs();
        assert!(pairs.contains(&("start_date".to_string(), "2025-01-05".to_string())));
        assert!(pairs.contains(&("end_date".to_string(), "2025-02-01".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "15".to_string())));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn reversed_window_is_rejected() {
        let query = OverviewQuery::default()
            .between(NaiveDate::from_ymd_opt(2025, 2, 1), NaiveDate::from_ymd_opt(2025, 1, 1));

        assert!(matches!(query.validate(), Err(ChatrizzError::InvalidInput(_))));
    }
}
