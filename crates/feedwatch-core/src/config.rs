// ── Runtime configuration ──
//
// These types describe how the data layer behaves at runtime: simulated
// latency, dataset lifetime, polling cadence, and retry policy. They never
// touch disk. The CLI/TUI build them from `feedwatch-config` and hand them in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Simulated per-operation latency of the mock backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub feeds: Duration,
    pub alerts: Duration,
    pub clients: Duration,
    pub stats: Duration,
    pub performance: Duration,
    pub acknowledge: Duration,
}

impl LatencyProfile {
    /// Zero latency everywhere. Used by tests and `--no-latency`.
    pub const fn instant() -> Self {
        Self {
            feeds: Duration::ZERO,
            alerts: Duration::ZERO,
            clients: Duration::ZERO,
            stats: Duration::ZERO,
            performance: Duration::ZERO,
            acknowledge: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            feeds: Duration::from_millis(500),
            alerts: Duration::from_millis(300),
            clients: Duration::from_millis(400),
            stats: Duration::from_millis(200),
            performance: Duration::from_millis(300),
            acknowledge: Duration::from_millis(200),
        }
    }
}

/// Lifetime of the mock dataset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DatasetMode {
    /// Every fetch returns a fresh random sample; identities are unstable.
    Regenerate,
    /// One dataset per process; acknowledgments persist across fetches.
    #[default]
    Shared,
}

/// Configuration for the data-access facade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub latency: LatencyProfile,
    pub dataset: DatasetMode,
    /// Fixed seed for reproducible data. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Bounded exponential backoff for transient fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

/// Polling cadence per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub dashboard_interval: Duration,
    pub feeds_interval: Duration,
    pub alerts_interval: Duration,
    /// When false, views fetch once on start and only refresh on demand.
    pub auto_refresh: bool,
    /// Deadline for a single fetch attempt.
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            dashboard_interval: Duration::from_secs(30),
            feeds_interval: Duration::from_secs(30),
            alerts_interval: Duration::from_secs(15),
            auto_refresh: true,
            request_timeout: Duration::from_secs(300),
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(10), Duration::from_secs(8));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(8));
    }

    #[test]
    fn default_latencies() {
        let l = LatencyProfile::default();
        assert_eq!(l.feeds, Duration::from_millis(500));
        assert_eq!(l.acknowledge, Duration::from_millis(200));
        assert_eq!(LatencyProfile::instant().feeds, Duration::ZERO);
    }

    #[test]
    fn dataset_mode_parses() {
        assert_eq!("regenerate".parse::<DatasetMode>().ok(), Some(DatasetMode::Regenerate));
        assert_eq!(DatasetMode::default(), DatasetMode::Shared);
    }
}
