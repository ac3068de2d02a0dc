//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use feedwatch_config::Config;
use feedwatch_core::{Alert, DashboardData, Feed, PollUpdate};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Polled data ───────────────────────────────────────────────
    DashboardUpdated(PollUpdate<Arc<DashboardData>>),
    FeedsUpdated(PollUpdate<Arc<Vec<Feed>>>),
    AlertsUpdated(PollUpdate<Arc<Vec<Alert>>>),
    /// Fetch the visible screen now, outside its schedule.
    ForceRefresh,

    // ── Acknowledgment ────────────────────────────────────────────
    /// The Alerts screen already shows the alert as acknowledged.
    RequestAcknowledge(String),
    AcknowledgeFinished {
        alert_id: String,
        error: Option<String>,
    },

    // ── Search ────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Settings ──────────────────────────────────────────────────
    OpenSettings,
    CloseSettings,
    /// Validated settings to persist and apply.
    SettingsApply(Box<Config>),
}
