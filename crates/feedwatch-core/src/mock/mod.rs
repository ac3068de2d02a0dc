// ── Mock data generator ──
//
// Produces randomized but internally consistent collections. All draws go
// through one `StdRng`, so a seeded generator is fully deterministic given
// the same `now`.

mod dataset;

pub use dataset::{Dataset, SharedDataset};

use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{
    Alert, AlertType, Client, ClientStatus, DashboardStats, Feed, FeedPerformance, FeedStatus,
    Severity,
};

pub const FEED_COUNT: usize = 25;
pub const ALERT_COUNT: usize = 15;
pub const PERFORMANCE_DAYS: u64 = 7;

pub const CLIENT_NAMES: [&str; 5] = ["Client A", "Client B", "Client C", "Client D", "Client E"];
pub const FEED_FORMATS: [&str; 4] = ["CSV", "JSON", "XML", "XLSX"];
pub const ALERT_MESSAGES: [&str; 6] = [
    "Feed generation exceeded expected time",
    "Transfer to client failed",
    "Data quality check failed",
    "Connection timeout during transfer",
    "Scheduled generation missed",
    "Client endpoint unavailable",
];

const FEED_STATUSES: [FeedStatus; 4] = [
    FeedStatus::Active,
    FeedStatus::Inactive,
    FeedStatus::Error,
    FeedStatus::Pending,
];
const ALERT_TYPES: [AlertType; 4] = [
    AlertType::GenerationDelay,
    AlertType::TransferDelay,
    AlertType::Failure,
    AlertType::Warning,
];
const SEVERITIES: [Severity; 4] = [
    Severity::Low,
    Severity::Medium,
    Severity::High,
    Severity::Critical,
];

const MS_PER_HOUR: i64 = 3_600_000;

/// Randomized data source backing the mock facade.
#[derive(Debug)]
pub struct MockGenerator {
    rng: StdRng,
}

impl MockGenerator {
    /// A generator seeded from `seed`, or from the OS when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    // ── Collections ──────────────────────────────────────────────────

    /// 25 feeds, `feed-001` through `feed-025`.
    pub fn generate_feeds(&mut self, now: DateTime<Utc>) -> Vec<Feed> {
        (1..=FEED_COUNT)
            .map(|i| {
                let last_generated = self.hours_before(now, 24);
                let last_transferred =
                    last_generated + TimeDelta::milliseconds(self.rng.random_range(0..MS_PER_HOUR));
                let generation_time = self.rng.random_range(5..=34);
                let transfer_time = self.rng.random_range(2..=16);
                let is_delayed = self.rng.random_bool(0.2);
                let description_client = self.pick(&CLIENT_NAMES);

                Feed {
                    id: format!("feed-{i:03}"),
                    name: format!("Daily Report {i}"),
                    description: format!("Automated daily report for {description_client}"),
                    status: self.pick(&FEED_STATUSES),
                    last_generated,
                    last_transferred,
                    scheduled_time: format!(
                        "{:02}:{:02}",
                        self.rng.random_range(0..24),
                        self.rng.random_range(0..60)
                    ),
                    client: self.pick(&CLIENT_NAMES).to_owned(),
                    size_mb: self.rng.random_range(10..=509),
                    format: self.pick(&FEED_FORMATS).to_owned(),
                    generation_time,
                    transfer_time,
                    is_delayed,
                    delayed_by: if is_delayed {
                        self.rng.random_range(10..=129)
                    } else {
                        0
                    },
                }
            })
            .collect()
    }

    /// 15 alerts against a freshly generated feed batch, newest first.
    pub fn generate_alerts(&mut self, now: DateTime<Utc>) -> Vec<Alert> {
        let feeds = self.generate_feeds(now);
        self.generate_alerts_for(&feeds, now)
    }

    /// 15 alerts drawn from `feeds`, newest first. Empty when `feeds` is.
    pub fn generate_alerts_for(&mut self, feeds: &[Feed], now: DateTime<Utc>) -> Vec<Alert> {
        if feeds.is_empty() {
            return Vec::new();
        }

        let mut alerts: Vec<Alert> = (1..=ALERT_COUNT)
            .map(|i| {
                let feed = &feeds[self.rng.random_range(0..feeds.len())];
                Alert {
                    id: format!("alert-{i:03}"),
                    feed_id: feed.id.clone(),
                    feed_name: feed.name.clone(),
                    alert_type: self.pick(&ALERT_TYPES),
                    severity: self.pick(&SEVERITIES),
                    message: self.pick(&ALERT_MESSAGES).to_owned(),
                    timestamp: self.hours_before(now, 72),
                    is_acknowledged: self.rng.random_bool(0.4),
                    client: feed.client.clone(),
                }
            })
            .collect();

        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts
    }

    /// One client per fixed name, `client-1` through `client-5`.
    pub fn generate_clients(&mut self, now: DateTime<Utc>) -> Vec<Client> {
        CLIENT_NAMES
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let feeds_count = self.rng.random_range(3..=12);
                let active_feeds = self.rng.random_range(1..=8u32).min(feeds_count);
                Client {
                    id: format!("client-{}", index + 1),
                    name: (*name).to_owned(),
                    feeds_count,
                    active_feeds,
                    total_transfer_mb: self.rng.random_range(500..=5499),
                    last_activity: self.hours_before(now, 48),
                    status: if self.rng.random_bool(0.8) {
                        ClientStatus::Active
                    } else {
                        ClientStatus::Inactive
                    },
                }
            })
            .collect()
    }

    /// The fixed dashboard snapshot served by the mock.
    pub fn generate_dashboard_stats() -> DashboardStats {
        DashboardStats {
            total_feeds: 25,
            active_feeds: 20,
            delayed_feeds: 3,
            failed_feeds: 2,
            total_clients: 5,
            active_clients: 4,
            total_data_transferred: 12.5,
            average_generation_time: 15.2,
            average_transfer_time: 8.7,
            uptime: 99.2,
        }
    }

    /// Seven daily records ending `today`, oldest first.
    pub fn generate_feed_performance(&mut self, today: NaiveDate) -> Vec<FeedPerformance> {
        (0..PERFORMANCE_DAYS)
            .rev()
            .map(|days_ago| FeedPerformance {
                date: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
                generated: self.rng.random_range(20..=69),
                transferred: self.rng.random_range(18..=62),
                delayed: self.rng.random_range(1..=8),
                failed: self.rng.random_range(0..=4),
            })
            .collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn pick<T: Copy, const N: usize>(&mut self, items: &[T; N]) -> T {
        items[self.rng.random_range(0..N)]
    }

    /// `now` minus a uniform offset in `[0, hours)`.
    fn hours_before(&mut self, now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
        now - TimeDelta::milliseconds(self.rng.random_range(0..hours * MS_PER_HOUR))
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-10T12:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn feeds_have_sequential_ids_and_consistent_delay() {
        let mut generator = MockGenerator::new(Some(7));
        let feeds = generator.generate_feeds(now());

        assert_eq!(feeds.len(), FEED_COUNT);
        assert_eq!(feeds[0].id, "feed-001");
        assert_eq!(feeds[24].id, "feed-025");
        assert_eq!(feeds[9].name, "Daily Report 10");

        for feed in &feeds {
            assert_eq!(feed.is_delayed, feed.delayed_by > 0, "{}", feed.id);
            assert!((10..=509).contains(&feed.size_mb));
            assert!((5..=34).contains(&feed.generation_time));
            assert!((2..=16).contains(&feed.transfer_time));
            assert!(feed.last_generated <= now());
            assert!(feed.last_generated > now() - TimeDelta::hours(24));
            assert!(feed.last_transferred >= feed.last_generated);
            assert!(feed.last_transferred < feed.last_generated + TimeDelta::hours(1));
            assert!(CLIENT_NAMES.contains(&feed.client.as_str()));
            assert!(FEED_FORMATS.contains(&feed.format.as_str()));
            assert_eq!(feed.scheduled_time.len(), 5);
            assert!(feed.description.starts_with("Automated daily report for Client "));
        }
    }

    #[test]
    fn alerts_reference_the_batch_and_are_sorted_newest_first() {
        let mut generator = MockGenerator::new(Some(11));
        let feeds = generator.generate_feeds(now());
        let alerts = generator.generate_alerts_for(&feeds, now());
        let ids: HashSet<&str> = feeds.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(alerts.len(), ALERT_COUNT);
        for alert in &alerts {
            assert!(ids.contains(alert.feed_id.as_str()));
            let feed = feeds
                .iter()
                .find(|f| f.id == alert.feed_id)
                .expect("referenced feed");
            assert_eq!(alert.feed_name, feed.name);
            assert_eq!(alert.client, feed.client);
            assert!(ALERT_MESSAGES.contains(&alert.message.as_str()));
            assert!(alert.timestamp > now() - TimeDelta::hours(72));
        }
        assert!(alerts.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn alerts_for_empty_batch_is_empty() {
        let mut generator = MockGenerator::new(Some(1));
        assert!(generator.generate_alerts_for(&[], now()).is_empty());
    }

    #[test]
    fn standalone_alerts_are_sorted() {
        let alerts = MockGenerator::new(Some(3)).generate_alerts(now());
        assert_eq!(alerts.len(), ALERT_COUNT);
        assert!(alerts.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn clients_never_exceed_their_feed_count() {
        for seed in 0..50 {
            let clients = MockGenerator::new(Some(seed)).generate_clients(now());
            assert_eq!(clients.len(), 5);
            assert_eq!(clients[0].id, "client-1");
            assert_eq!(clients[4].name, "Client E");
            for client in &clients {
                assert!(client.active_feeds <= client.feeds_count);
                assert!(client.active_feeds >= 1);
                assert!((500..=5499).contains(&client.total_transfer_mb));
            }
        }
    }

    #[test]
    fn performance_covers_trailing_week() {
        let today = now().date_naive();
        let perf = MockGenerator::new(Some(5)).generate_feed_performance(today);

        assert_eq!(perf.len(), 7);
        assert_eq!(perf[6].date, today);
        assert!(perf.windows(2).all(|w| w[0].date < w[1].date));
        for day in &perf {
            assert!((20..=69).contains(&day.generated));
            assert!((18..=62).contains(&day.transferred));
            assert!((1..=8).contains(&day.delayed));
            assert!(day.failed <= 4);
        }
    }

    #[test]
    fn fixed_stats_snapshot() {
        let stats = MockGenerator::generate_dashboard_stats();
        assert_eq!(stats.total_feeds, 25);
        assert_eq!(stats.inactive_feeds(), 0);
        assert!((stats.uptime - 99.2).abs() < f64::EPSILON);
    }

    #[test]
    fn seeded_generators_are_deterministic() {
        let a = MockGenerator::new(Some(42)).generate_feeds(now());
        let b = MockGenerator::new(Some(42)).generate_feeds(now());
        assert_eq!(a, b);
    }
}
