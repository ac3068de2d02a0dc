// ── In-memory mock backend ──

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::FeedApi;
use crate::command::{Command, CommandResult};
use crate::config::{ApiConfig, DatasetMode, LatencyProfile};
use crate::error::CoreError;
use crate::mock::{Dataset, MockGenerator, SharedDataset};
use crate::model::{Alert, Client, DashboardStats, Feed, FeedPerformance};

enum Backend {
    /// Fresh sample on every call.
    Regenerate(Mutex<MockGenerator>),
    /// Stable identities for the lifetime of the process.
    Shared(SharedDataset),
}

struct MockInner {
    latency: LatencyProfile,
    backend: Backend,
}

/// Mock data-access facade. Every call resolves after a simulated delay
/// and never fails.
#[derive(Clone)]
pub struct MockFeedApi {
    inner: Arc<MockInner>,
}

impl MockFeedApi {
    pub fn new(config: &ApiConfig) -> Self {
        let mut generator = MockGenerator::new(config.seed);
        let backend = match config.dataset {
            DatasetMode::Regenerate => Backend::Regenerate(Mutex::new(generator)),
            DatasetMode::Shared => {
                Backend::Shared(SharedDataset::new(Dataset::generate(&mut generator, Utc::now())))
            }
        };
        debug!(dataset = %config.dataset, seed = ?config.seed, "mock feed api ready");

        Self {
            inner: Arc::new(MockInner {
                latency: config.latency,
                backend,
            }),
        }
    }

    pub fn dataset_mode(&self) -> DatasetMode {
        match self.inner.backend {
            Backend::Regenerate(_) => DatasetMode::Regenerate,
            Backend::Shared(_) => DatasetMode::Shared,
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn simulate(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    /// Run `regenerate` against the generator or `shared` against the dataset.
    fn read<T>(
        &self,
        regenerate: impl FnOnce(&mut MockGenerator) -> T,
        shared: impl FnOnce(&Dataset) -> T,
    ) -> T {
        match &self.inner.backend {
            Backend::Regenerate(generator) => {
                let mut generator = generator.lock().unwrap_or_else(PoisonError::into_inner);
                regenerate(&mut generator)
            }
            Backend::Shared(dataset) => shared(&dataset.snapshot()),
        }
    }
}

impl std::fmt::Debug for MockFeedApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFeedApi")
            .field("dataset", &self.dataset_mode())
            .field("latency", &self.inner.latency)
            .finish()
    }
}

impl FeedApi for MockFeedApi {
    async fn get_feeds(&self) -> Result<Vec<Feed>, CoreError> {
        self.simulate(self.inner.latency.feeds).await;
        let feeds = self.read(|g| g.generate_feeds(Utc::now()), |d| d.feeds.clone());
        debug!(count = feeds.len(), "fetched feeds");
        Ok(feeds)
    }

    async fn get_alerts(&self) -> Result<Vec<Alert>, CoreError> {
        self.simulate(self.inner.latency.alerts).await;
        let alerts = self.read(|g| g.generate_alerts(Utc::now()), |d| d.alerts.clone());
        debug!(count = alerts.len(), "fetched alerts");
        Ok(alerts)
    }

    async fn get_clients(&self) -> Result<Vec<Client>, CoreError> {
        self.simulate(self.inner.latency.clients).await;
        let clients = self.read(|g| g.generate_clients(Utc::now()), |d| d.clients.clone());
        debug!(count = clients.len(), "fetched clients");
        Ok(clients)
    }

    async fn get_dashboard_stats(&self) -> Result<DashboardStats, CoreError> {
        self.simulate(self.inner.latency.stats).await;
        let stats = self.read(|_| MockGenerator::generate_dashboard_stats(), Dataset::stats);
        debug!("fetched dashboard stats");
        Ok(stats)
    }

    async fn get_feed_performance(&self) -> Result<Vec<FeedPerformance>, CoreError> {
        self.simulate(self.inner.latency.performance).await;
        let performance = self.read(
            |g| g.generate_feed_performance(Utc::now().date_naive()),
            |d| d.performance.clone(),
        );
        debug!(days = performance.len(), "fetched feed performance");
        Ok(performance)
    }

    async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        self.simulate(self.inner.latency.acknowledge).await;

        match command {
            Command::AcknowledgeAlert { alert_id } => match &self.inner.backend {
                Backend::Regenerate(_) => {
                    info!(%alert_id, "acknowledged alert");
                    Ok(CommandResult::Ok)
                }
                Backend::Shared(dataset) => {
                    let changed = dataset.acknowledge(&alert_id);
                    info!(%alert_id, changed, "acknowledged alert");
                    Ok(dataset
                        .snapshot()
                        .alerts
                        .iter()
                        .find(|a| a.id == alert_id)
                        .cloned()
                        .map_or(CommandResult::Ok, CommandResult::Alert))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn api(dataset: DatasetMode) -> MockFeedApi {
        MockFeedApi::new(&ApiConfig {
            latency: LatencyProfile::instant(),
            dataset,
            seed: Some(2024),
        })
    }

    #[tokio::test]
    async fn shared_alerts_reference_shared_feeds() {
        let api = api(DatasetMode::Shared);
        let feeds = api.get_feeds().await.expect("feeds");
        let alerts = api.get_alerts().await.expect("alerts");
        let ids: HashSet<_> = feeds.iter().map(|f| f.id.clone()).collect();

        assert_eq!(feeds.len(), 25);
        assert_eq!(alerts.len(), 15);
        assert!(alerts.iter().all(|a| ids.contains(&a.feed_id)));
        assert_eq!(feeds, api.get_feeds().await.expect("feeds again"));
    }

    #[tokio::test]
    async fn shared_acknowledge_persists() {
        let api = api(DatasetMode::Shared);
        let alerts = api.get_alerts().await.expect("alerts");
        let target = alerts
            .iter()
            .find(|a| !a.is_acknowledged)
            .expect("unacknowledged alert")
            .id
            .clone();

        let result = api.acknowledge_alert(&target).await.expect("ack");
        match result {
            CommandResult::Alert(alert) => assert!(alert.is_acknowledged),
            CommandResult::Ok => panic!("expected the updated alert"),
        }

        let after = api.get_alerts().await.expect("alerts");
        for (old, new) in alerts.iter().zip(after.iter()) {
            assert_eq!(new.is_acknowledged, old.is_acknowledged || old.id == target);
        }
    }

    #[tokio::test]
    async fn acknowledge_unknown_id_succeeds() {
        for mode in [DatasetMode::Shared, DatasetMode::Regenerate] {
            let result = api(mode).acknowledge_alert("alert-999").await;
            assert_eq!(result, Ok(CommandResult::Ok));
        }
    }

    #[tokio::test]
    async fn shared_stats_are_derived() {
        let api = api(DatasetMode::Shared);
        let feeds = api.get_feeds().await.expect("feeds");
        let stats = api.get_dashboard_stats().await.expect("stats");
        assert_eq!(stats.total_feeds, 25);
        assert_eq!(
            stats.failed_feeds,
            u32::try_from(feeds.iter().filter(|f| f.is_failed()).count()).expect("count")
        );
    }

    #[tokio::test]
    async fn regenerate_serves_fixed_stats_and_fresh_samples() {
        let api = api(DatasetMode::Regenerate);
        let stats = api.get_dashboard_stats().await.expect("stats");
        assert_eq!(stats, MockGenerator::generate_dashboard_stats());

        let first = api.get_feeds().await.expect("feeds");
        let second = api.get_feeds().await.expect("feeds");
        assert_eq!(first.len(), 25);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn get_feed_by_id() {
        let api = api(DatasetMode::Shared);
        let feed = api.get_feed("feed-007").await.expect("feed");
        assert_eq!(feed.name, "Daily Report 7");

        let err = api.get_feed("feed-999").await.expect_err("missing feed");
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let api = MockFeedApi::new(&ApiConfig {
            seed: Some(1),
            ..ApiConfig::default()
        });
        let start = tokio::time::Instant::now();
        api.get_feeds().await.expect("feeds");
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
