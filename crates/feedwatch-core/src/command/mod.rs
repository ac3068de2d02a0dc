// ── Command API ──
//
// All write operations flow through a unified `Command` enum so the
// facade has a single mutation entry point. Reads stay on the
// `FeedApi` getters.

use crate::model::Alert;

/// All possible write operations against the feed backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mark an alert as reviewed. Unknown ids are accepted and ignored.
    AcknowledgeAlert { alert_id: String },
}

impl Command {
    pub fn acknowledge(alert_id: impl Into<String>) -> Self {
        Self::AcknowledgeAlert {
            alert_id: alert_id.into(),
        }
    }

    /// Short verb for logs and status messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AcknowledgeAlert { .. } => "acknowledge alert",
        }
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Accepted with nothing to report (e.g. the backend keeps no state).
    Ok,
    /// The alert as it stands after the command.
    Alert(Alert),
}
