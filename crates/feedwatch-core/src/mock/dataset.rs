// ── Shared mock dataset ──
//
// One process-lifetime set of collections with stable identities. Reads
// are lock-free snapshots; acknowledgment publishes a new snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use super::MockGenerator;
use crate::model::{Alert, Client, DashboardStats, Feed, FeedPerformance};

/// A consistent set of collections: every alert references one of `feeds`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feeds: Vec<Feed>,
    pub alerts: Vec<Alert>,
    pub clients: Vec<Client>,
    pub performance: Vec<FeedPerformance>,
}

impl Dataset {
    pub fn generate(generator: &mut MockGenerator, now: DateTime<Utc>) -> Self {
        let feeds = generator.generate_feeds(now);
        let alerts = generator.generate_alerts_for(&feeds, now);
        let clients = generator.generate_clients(now);
        let performance = generator.generate_feed_performance(now.date_naive());
        Self {
            feeds,
            alerts,
            clients,
            performance,
        }
    }

    /// Stats computed from this dataset's collections.
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::derive(&self.feeds, &self.clients, &self.performance)
    }
}

/// Atomically swappable [`Dataset`] shared across fetches.
#[derive(Debug)]
pub struct SharedDataset {
    current: ArcSwap<Dataset>,
}

impl SharedDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: ArcSwap::from_pointee(dataset),
        }
    }

    /// Cheap snapshot of the current dataset.
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.current.load_full()
    }

    /// Acknowledge `alert_id` in place. Returns `true` when an alert flipped;
    /// unknown or already acknowledged ids leave the dataset untouched.
    pub fn acknowledge(&self, alert_id: &str) -> bool {
        let snapshot = self.current.load();
        let needs_update = snapshot
            .alerts
            .iter()
            .any(|a| a.id == alert_id && !a.is_acknowledged);
        if !needs_update {
            return false;
        }

        let mut flipped = false;
        self.current.rcu(|current| {
            let mut next = Dataset::clone(current);
            flipped = next
                .alerts
                .iter_mut()
                .find(|a| a.id == alert_id)
                .is_some_and(Alert::acknowledge);
            next
        });
        flipped
    }
}
