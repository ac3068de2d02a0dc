//! Screen identifiers.

use std::fmt;

use feedwatch_core::PolledView;

/// Primary TUI screens, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard, // 1
    Feeds,  // 2
    Alerts, // 3
}

impl ScreenId {
    /// Tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Dashboard, Self::Feeds, Self::Alerts];

    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Feeds => 2,
            Self::Alerts => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::Feeds),
            3 => Some(Self::Alerts),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Feeds => "Feeds",
            Self::Alerts => "Alerts",
        }
    }

    /// The poller that feeds this screen.
    pub fn polled_view(self) -> PolledView {
        match self {
            Self::Dashboard => PolledView::Dashboard,
            Self::Feeds => PolledView::Feeds,
            Self::Alerts => PolledView::Alerts,
        }
    }

    /// Whether `/` filters this screen.
    pub fn searchable(self) -> bool {
        matches!(self, Self::Feeds | Self::Alerts)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
