// ── Dashboard view ──

use serde::Serialize;

use crate::api::FeedApi;
use crate::error::CoreError;
use crate::model::{Alert, DashboardStats, FeedPerformance, StatusBreakdown};

/// How many alerts the dashboard lists.
pub const RECENT_ALERT_COUNT: usize = 5;

/// Everything the dashboard renders, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    /// Oldest first.
    pub performance: Vec<FeedPerformance>,
    /// Newest first, at most [`RECENT_ALERT_COUNT`].
    pub recent_alerts: Vec<Alert>,
}

impl DashboardData {
    /// Build from a full alert list that is already ordered newest first.
    pub fn new(stats: DashboardStats, performance: Vec<FeedPerformance>, alerts: &[Alert]) -> Self {
        Self {
            stats,
            performance,
            recent_alerts: alerts.iter().take(RECENT_ALERT_COUNT).cloned().collect(),
        }
    }

    /// Fetch stats, performance, and alerts concurrently.
    pub async fn fetch<A: FeedApi>(api: &A) -> Result<Self, CoreError> {
        let (stats, performance, alerts) = tokio::try_join!(
            api.get_dashboard_stats(),
            api.get_feed_performance(),
            api.get_alerts(),
        )?;
        Ok(Self::new(stats, performance, &alerts))
    }

    pub fn status_breakdown(&self) -> StatusBreakdown {
        self.stats.status_breakdown()
    }
}
