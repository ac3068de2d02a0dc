// ── Aggregate statistics ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::client::Client;
use super::feed::{Feed, FeedStatus};

/// Display format for performance dates (`Mar 04`).
pub const PERFORMANCE_LABEL_FORMAT: &str = "%b %d";

/// Pipeline-wide snapshot shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_feeds: u32,
    pub active_feeds: u32,
    pub delayed_feeds: u32,
    pub failed_feeds: u32,
    pub total_clients: u32,
    pub active_clients: u32,
    /// Gigabytes.
    pub total_data_transferred: f64,
    /// Minutes.
    pub average_generation_time: f64,
    /// Minutes.
    pub average_transfer_time: f64,
    /// Percentage, 0–100.
    pub uptime: f64,
}

/// Feed counts for the dashboard status chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub active: u32,
    pub delayed: u32,
    pub failed: u32,
    pub inactive: u32,
}

impl DashboardStats {
    /// Feeds not counted as active, delayed, or failed.
    pub fn inactive_feeds(&self) -> u32 {
        self.total_feeds
            .saturating_sub(self.active_feeds)
            .saturating_sub(self.delayed_feeds)
            .saturating_sub(self.failed_feeds)
    }

    pub fn status_breakdown(&self) -> StatusBreakdown {
        StatusBreakdown {
            active: self.active_feeds,
            delayed: self.delayed_feeds,
            failed: self.failed_feeds,
            inactive: self.inactive_feeds(),
        }
    }

    /// Compute a snapshot from live collections.
    ///
    /// Averages and totals are rounded to one decimal place. Uptime is the
    /// share of generated feeds that did not fail over the performance window,
    /// or 100 when the window is empty.
    pub fn derive(feeds: &[Feed], clients: &[Client], performance: &[FeedPerformance]) -> Self {
        let total_mb: u64 = feeds.iter().map(|f| f.size_mb).sum();
        let avg = |sum: u64| {
            if feeds.is_empty() {
                0.0
            } else {
                round1(to_f64(sum) / to_f64(len_u64(feeds.len())))
            }
        };

        let generated: u64 = performance.iter().map(|p| u64::from(p.generated)).sum();
        let failed: u64 = performance.iter().map(|p| u64::from(p.failed)).sum();
        let uptime = if generated == 0 {
            100.0
        } else {
            round1(100.0 * (1.0 - to_f64(failed) / to_f64(generated))).max(0.0)
        };

        Self {
            total_feeds: count_where(feeds, |_| true),
            active_feeds: count_where(feeds, |f| f.status == FeedStatus::Active),
            delayed_feeds: count_where(feeds, |f| f.is_delayed),
            failed_feeds: count_where(feeds, Feed::is_failed),
            total_clients: count_where(clients, |_| true),
            active_clients: count_where(clients, Client::is_active),
            total_data_transferred: round1(to_f64(total_mb) / 1024.0),
            average_generation_time: avg(feeds.iter().map(|f| u64::from(f.generation_time)).sum()),
            average_transfer_time: avg(feeds.iter().map(|f| u64::from(f.transfer_time)).sum()),
            uptime,
        }
    }
}

/// One calendar day of feed activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPerformance {
    pub date: NaiveDate,
    pub generated: u32,
    pub transferred: u32,
    pub delayed: u32,
    pub failed: u32,
}

impl FeedPerformance {
    /// Short chart label, e.g. `Mar 04`.
    pub fn label(&self) -> String {
        self.date.format(PERFORMANCE_LABEL_FORMAT).to_string()
    }
}

fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> u32 {
    u32::try_from(items.iter().filter(|item| pred(item)).count()).unwrap_or(u32::MAX)
}

fn len_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn to_f64(n: u64) -> f64 {
    n as f64
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientStatus;
    use chrono::Utc;

    fn feed(status: FeedStatus, delayed: bool, size_mb: u64) -> Feed {
        Feed {
            id: "feed-001".into(),
            name: "Daily Report 1".into(),
            description: String::new(),
            status,
            last_generated: Utc::now(),
            last_transferred: Utc::now(),
            scheduled_time: "00:00".into(),
            client: "Client A".into(),
            size_mb,
            format: "CSV".into(),
            generation_time: 10,
            transfer_time: 4,
            is_delayed: delayed,
            delayed_by: if delayed { 30 } else { 0 },
        }
    }

    #[test]
    fn inactive_saturates_at_zero() {
        let stats = DashboardStats {
            total_feeds: 3,
            active_feeds: 3,
            delayed_feeds: 2,
            failed_feeds: 1,
            total_clients: 0,
            active_clients: 0,
            total_data_transferred: 0.0,
            average_generation_time: 0.0,
            average_transfer_time: 0.0,
            uptime: 100.0,
        };
        assert_eq!(stats.inactive_feeds(), 0);
    }

    #[test]
    fn derive_counts_and_averages() {
        let feeds = vec![
            feed(FeedStatus::Active, false, 1024),
            feed(FeedStatus::Active, true, 512),
            feed(FeedStatus::Error, false, 512),
            feed(FeedStatus::Pending, false, 0),
        ];
        let clients = vec![Client {
            id: "client-1".into(),
            name: "Client A".into(),
            feeds_count: 4,
            active_feeds: 2,
            total_transfer_mb: 900,
            last_activity: Utc::now(),
            status: ClientStatus::Active,
        }];
        let perf = vec![FeedPerformance {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).expect("date"),
            generated: 40,
            transferred: 38,
            delayed: 2,
            failed: 2,
        }];

        let stats = DashboardStats::derive(&feeds, &clients, &perf);
        assert_eq!(stats.total_feeds, 4);
        assert_eq!(stats.active_feeds, 2);
        assert_eq!(stats.delayed_feeds, 1);
        assert_eq!(stats.failed_feeds, 1);
        assert_eq!(stats.active_clients, 1);
        assert!((stats.total_data_transferred - 2.0).abs() < f64::EPSILON);
        assert!((stats.average_generation_time - 10.0).abs() < f64::EPSILON);
        assert!((stats.uptime - 95.0).abs() < f64::EPSILON);
        assert_eq!(
            stats.status_breakdown(),
            StatusBreakdown { active: 2, delayed: 1, failed: 1, inactive: 0 }
        );
    }

    #[test]
    fn empty_collections_derive_without_panicking() {
        let stats = DashboardStats::derive(&[], &[], &[]);
        assert_eq!(stats.total_feeds, 0);
        assert!((stats.uptime - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn performance_label_is_month_day() {
        let p = FeedPerformance {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).expect("date"),
            generated: 0,
            transferred: 0,
            delayed: 0,
            failed: 0,
        };
        assert_eq!(p.label(), "Mar 04");
    }
}
