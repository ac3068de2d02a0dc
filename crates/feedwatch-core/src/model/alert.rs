// ── Alert domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Alert priority. Declaration order is the ordering: low < medium < high < critical.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

/// What kind of anomaly raised the alert.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AlertType {
    GenerationDelay,
    TransferDelay,
    Failure,
    Warning,
}

/// A notification tied to an anomalous feed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub feed_id: String,
    pub feed_name: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_acknowledged: bool,
    pub client: String,
}

impl Alert {
    /// Mark the alert as reviewed. Returns `true` only on the
    /// unacknowledged → acknowledged transition.
    pub fn acknowledge(&mut self) -> bool {
        if self.is_acknowledged {
            return false;
        }
        self.is_acknowledged = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> Alert {
        Alert {
            id: "alert-001".into(),
            feed_id: "feed-003".into(),
            feed_name: "Daily Report 3".into(),
            alert_type: AlertType::TransferDelay,
            severity: Severity::High,
            message: "Transfer to client failed".into(),
            timestamp: Utc::now(),
            is_acknowledged: false,
            client: "Client B".into(),
        }
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn acknowledge_transitions_once() {
        let mut a = alert();
        assert!(a.acknowledge());
        assert!(a.is_acknowledged);
        assert!(!a.acknowledge());
        assert!(a.is_acknowledged);
    }

    #[test]
    fn wire_names_match_dashboard_json() {
        let json = serde_json::to_value(alert()).expect("serialize");
        assert_eq!(json["type"], "transfer_delay");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["feedId"], "feed-003");
        assert_eq!(json["isAcknowledged"], false);
    }

    #[test]
    fn alert_type_parses_snake_case() {
        assert_eq!(
            "generation_delay".parse::<AlertType>().ok(),
            Some(AlertType::GenerationDelay)
        );
        assert!("delay".parse::<AlertType>().is_err());
    }
}
