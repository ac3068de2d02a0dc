//! Screen implementations. Each screen is a top-level Component.

pub mod alerts;
pub mod dashboard;
pub mod feeds;
pub mod settings;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use feedwatch_config::Config;
use feedwatch_core::PollUpdate;
use feedwatch_core::view::StaleGuard;

use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// Create the tab-bar screens.
pub fn create_screens(config: &Config) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (ScreenId::Feeds, Box::new(feeds::FeedsScreen::new())),
        (
            ScreenId::Alerts,
            Box::new(alerts::AlertsScreen::new(config.dashboard.alert_threshold)),
        ),
    ]
}

/// Freshness and failure state of a screen's polled data.
///
/// A failed cycle keeps the last good data on screen and raises a banner
/// until the next successful load.
#[derive(Debug, Default)]
pub struct PollStatus {
    guard: StaleGuard,
    last_loaded: Option<Instant>,
    error: Option<String>,
}

impl PollStatus {
    /// Record `update` unless it is older than one already seen.
    /// Returns whether it was fresh.
    pub fn observe<T>(&mut self, update: &PollUpdate<T>) -> bool {
        if !self.guard.accept(update.seq()) {
            return false;
        }
        match update {
            PollUpdate::Loaded { .. } => {
                self.last_loaded = Some(Instant::now());
                self.error = None;
            }
            PollUpdate::Failed {
                error, attempts, ..
            } => {
                self.error = Some(format!("{error} (after {attempts} attempts)"));
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.last_loaded.is_none() && self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Data age for the title bar.
    pub fn age_label(&self) -> String {
        match self.last_loaded {
            Some(t) => {
                let secs = t.elapsed().as_secs();
                if secs < 5 {
                    "just now".into()
                } else if secs < 60 {
                    format!("{secs}s ago")
                } else {
                    format!("{}m ago", secs / 60)
                }
            }
            None if self.error.is_some() => "failed".into(),
            None => "loading…".into(),
        }
    }
}

/// Rounded panel with a styled title.
pub fn panel<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// One-line error banner, or nothing when `error` is `None`.
pub fn render_error_banner(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(error) = error {
        let line = Line::from(vec![
            Span::styled(" ✗ ", theme::error_banner()),
            Span::styled(format!("Refresh failed: {error}"), theme::error_banner()),
            Span::styled("  r retry", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedwatch_core::CoreError;

    fn failed(seq: u64) -> PollUpdate<()> {
        PollUpdate::Failed {
            seq,
            error: CoreError::Unavailable {
                message: "backend down".into(),
            },
            attempts: 4,
        }
    }

    #[test]
    fn failure_keeps_banner_until_next_load() {
        let mut status = PollStatus::default();
        assert!(status.is_loading());

        assert!(status.observe(&failed(1)));
        assert!(status.error().is_some_and(|e| e.contains("after 4 attempts")));

        assert!(status.observe(&PollUpdate::Loaded { seq: 2, data: () }));
        assert_eq!(status.error(), None);
        assert!(!status.is_loading());
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut status = PollStatus::default();
        assert!(status.observe(&PollUpdate::Loaded { seq: 5, data: () }));
        assert!(!status.observe(&failed(3)));
        assert_eq!(status.error(), None);
    }
}
