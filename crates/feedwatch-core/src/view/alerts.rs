// ── Alerts view ──

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use serde::Serialize;

use super::StaleGuard;
use super::search::matches_search;
use crate::model::{Alert, AlertType, Severity};

/// Search, categorical, and acknowledgment filters for alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFilter {
    pub search: String,
    /// Exact severity; `None` means all.
    pub severity: Option<Severity>,
    /// Exact type; `None` means all.
    pub alert_type: Option<AlertType>,
    pub show_acknowledged: bool,
    /// Hide alerts below this severity.
    pub min_severity: Severity,
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            severity: None,
            alert_type: None,
            show_acknowledged: true,
            min_severity: Severity::Low,
        }
    }
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        matches_search(
            &self.search,
            [
                alert.feed_name.as_str(),
                alert.message.as_str(),
                alert.client.as_str(),
            ],
        ) && self.severity.is_none_or(|s| alert.severity == s)
            && self.alert_type.is_none_or(|t| alert.alert_type == t)
            && (self.show_acknowledged || !alert.is_acknowledged)
            && alert.severity >= self.min_severity
    }

    /// Filter preserving input order.
    pub fn apply(&self, alerts: &[Alert]) -> Vec<Alert> {
        alerts.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

/// Counters over the unfiltered alert collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub unacknowledged: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        alerts.iter().fold(
            Self {
                total: alerts.len(),
                ..Self::default()
            },
            |mut acc, alert| {
                acc.critical += usize::from(alert.severity == Severity::Critical);
                acc.high += usize::from(alert.severity == Severity::High);
                acc.unacknowledged += usize::from(!alert.is_acknowledged);
                acc
            },
        )
    }
}

/// Stateful alerts listing with optimistic acknowledgment.
///
/// An acknowledgment is applied locally as soon as it is requested and stays
/// applied across source refreshes until the command resolves. A failed
/// command restores the previous state.
#[derive(Debug, Clone, Default)]
pub struct AlertsView {
    source: Vec<Alert>,
    filter: AlertFilter,
    filtered: Vec<Alert>,
    /// Acknowledgments in flight, keyed by alert id.
    pending: HashMap<String, PendingAck>,
    guard: StaleGuard,
}

/// Identity of an alert awaiting acknowledgment. Ids alone are reused
/// across regenerated batches, so the feed and timestamp must match too.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingAck {
    feed_id: String,
    timestamp: DateTime<Utc>,
}

impl PendingAck {
    fn of(alert: &Alert) -> Self {
        Self {
            feed_id: alert.feed_id.clone(),
            timestamp: alert.timestamp,
        }
    }

    fn is(&self, alert: &Alert) -> bool {
        self.feed_id == alert.feed_id && self.timestamp == alert.timestamp
    }
}

impl AlertsView {
    pub fn new(filter: AlertFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Replace the source if `seq` is newer than the last applied result.
    pub fn apply_update(&mut self, seq: u64, alerts: Vec<Alert>) -> bool {
        if !self.guard.accept(seq) {
            return false;
        }
        self.set_source(alerts);
        true
    }

    pub fn set_source(&mut self, mut alerts: Vec<Alert>) {
        for alert in &mut alerts {
            if self.pending.get(&alert.id).is_some_and(|p| p.is(alert)) {
                alert.is_acknowledged = true;
            }
        }
        self.source = alerts;
        self.recompute();
    }

    pub fn set_filter(&mut self, filter: AlertFilter) {
        self.filter = filter;
        self.recompute();
    }

    /// Edit the filter in place and recompute.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut AlertFilter)) {
        edit(&mut self.filter);
        self.recompute();
    }

    /// Optimistically acknowledge `alert_id`. Returns `false` when the alert
    /// is unknown or already acknowledged, in which case nothing is pending.
    pub fn begin_acknowledge(&mut self, alert_id: &str) -> bool {
        let Some(alert) = self.source.iter_mut().find(|a| a.id == alert_id) else {
            return false;
        };
        if !alert.acknowledge() {
            return false;
        }
        let pending = PendingAck::of(alert);
        self.pending.insert(alert_id.to_owned(), pending);
        self.recompute();
        true
    }

    /// The backend accepted the acknowledgment.
    pub fn confirm_acknowledge(&mut self, alert_id: &str) {
        self.pending.remove(alert_id);
    }

    /// The backend rejected the acknowledgment; undo the local flip.
    pub fn rollback_acknowledge(&mut self, alert_id: &str) {
        if let Some(pending) = self.pending.remove(alert_id) {
            if let Some(alert) = self.source.iter_mut().find(|a| a.id == alert_id && pending.is(a)) {
                alert.is_acknowledged = false;
            }
            self.recompute();
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn filter(&self) -> &AlertFilter {
        &self.filter
    }

    pub fn source(&self) -> &[Alert] {
        &self.source
    }

    pub fn filtered(&self) -> &[Alert] {
        &self.filtered
    }

    pub fn is_pending(&self, alert_id: &str) -> bool {
        self.pending.contains_key(alert_id)
    }

    pub fn summary(&self) -> AlertSummary {
        AlertSummary::from_alerts(&self.source)
    }

    fn recompute(&mut self) {
        self.filtered = self.filter.apply(&self.source);
    }
}
