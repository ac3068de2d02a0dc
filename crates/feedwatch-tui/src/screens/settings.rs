//! Settings screen: edit dashboard preferences from within the TUI.
//!
//! Opened with `,`, not in the tab bar. Esc cancels without saving.
//! Enter validates the draft and emits `SettingsApply`; the app persists
//! it and restarts polling with the new intervals.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use strum::IntoEnumIterator;

use feedwatch_config::{Config, LOG_LEVELS, Theme};
use feedwatch_core::{DatasetMode, Severity};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

use super::panel;

/// Editable settings, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    RefreshInterval,
    AlertRefreshInterval,
    AutoRefresh,
    AlertThreshold,
    Theme,
    ShowNotifications,
    Email,
    Sms,
    Slack,
    MaxRetries,
    Timeout,
    LogLevel,
    Dataset,
}

impl Field {
    const ALL: [Field; 13] = [
        Self::RefreshInterval,
        Self::AlertRefreshInterval,
        Self::AutoRefresh,
        Self::AlertThreshold,
        Self::Theme,
        Self::ShowNotifications,
        Self::Email,
        Self::Sms,
        Self::Slack,
        Self::MaxRetries,
        Self::Timeout,
        Self::LogLevel,
        Self::Dataset,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::RefreshInterval => "Refresh interval",
            Self::AlertRefreshInterval => "Alert refresh interval",
            Self::AutoRefresh => "Auto refresh",
            Self::AlertThreshold => "Alert threshold",
            Self::Theme => "Theme",
            Self::ShowNotifications => "Show notifications",
            Self::Email => "Email notifications",
            Self::Sms => "SMS notifications",
            Self::Slack => "Slack notifications",
            Self::MaxRetries => "Max retries",
            Self::Timeout => "Request timeout",
            Self::LogLevel => "Log level",
            Self::Dataset => "Mock dataset",
        }
    }

    fn section(self) -> &'static str {
        match self {
            Self::RefreshInterval
            | Self::AlertRefreshInterval
            | Self::AutoRefresh
            | Self::AlertThreshold
            | Self::Theme => "Dashboard",
            Self::ShowNotifications | Self::Email | Self::Sms | Self::Slack => "Notifications",
            Self::MaxRetries | Self::Timeout | Self::LogLevel | Self::Dataset => "Advanced",
        }
    }
}

fn step(value: u64, forward: bool, by: u64, min: u64, max: u64) -> u64 {
    if forward {
        value.saturating_add(by).min(max)
    } else {
        value.saturating_sub(by).max(min)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    all[next]
}

pub struct SettingsScreen {
    draft: Config,
    active: usize,
    error: Option<String>,
}

impl SettingsScreen {
    pub fn new(config: &Config) -> Self {
        Self {
            draft: config.clone(),
            active: 0,
            error: None,
        }
    }

    /// Discard edits and start over from `config`.
    pub fn reset(&mut self, config: &Config) {
        self.draft = config.clone();
        self.active = 0;
        self.error = None;
    }

    fn field(&self) -> Field {
        Field::ALL[self.active]
    }

    fn adjust(&mut self, forward: bool) {
        let field = self.field();
        let d = &mut self.draft;
        match field {
            Field::RefreshInterval => {
                d.dashboard.refresh_interval =
                    step(d.dashboard.refresh_interval, forward, 5, 5, 3600);
            }
            Field::AlertRefreshInterval => {
                d.dashboard.alert_refresh_interval =
                    step(d.dashboard.alert_refresh_interval, forward, 5, 5, 3600);
            }
            Field::AutoRefresh => d.dashboard.auto_refresh = !d.dashboard.auto_refresh,
            Field::AlertThreshold => {
                let all: Vec<Severity> = Severity::iter().collect();
                d.dashboard.alert_threshold = cycle(&all, d.dashboard.alert_threshold, forward);
            }
            Field::Theme => {
                d.dashboard.theme =
                    cycle(&[Theme::Light, Theme::Dark, Theme::Auto], d.dashboard.theme, forward);
            }
            Field::ShowNotifications => {
                d.notifications.show_notifications = !d.notifications.show_notifications;
            }
            Field::Email => d.notifications.email = !d.notifications.email,
            Field::Sms => d.notifications.sms = !d.notifications.sms,
            Field::Slack => d.notifications.slack = !d.notifications.slack,
            Field::MaxRetries => {
                d.advanced.max_retries = cycle(
                    &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
                    d.advanced.max_retries,
                    forward,
                );
            }
            Field::Timeout => {
                d.advanced.timeout = step(d.advanced.timeout, forward, 30, 30, 600);
            }
            Field::LogLevel => {
                let current = LOG_LEVELS
                    .iter()
                    .copied()
                    .find(|l| *l == d.advanced.log_level)
                    .unwrap_or("info");
                d.advanced.log_level = cycle(&LOG_LEVELS, current, forward).to_owned();
            }
            Field::Dataset => {
                d.mock.dataset = cycle(
                    &[DatasetMode::Shared, DatasetMode::Regenerate],
                    d.mock.dataset,
                    forward,
                );
            }
        }
    }

    fn value_label(&self, field: Field) -> String {
        let d = &self.draft;
        let on_off = |v: bool| if v { "on" } else { "off" }.to_owned();
        match field {
            Field::RefreshInterval => format!("{}s", d.dashboard.refresh_interval),
            Field::AlertRefreshInterval => format!("{}s", d.dashboard.alert_refresh_interval),
            Field::AutoRefresh => on_off(d.dashboard.auto_refresh),
            Field::AlertThreshold => d.dashboard.alert_threshold.to_string(),
            Field::Theme => d.dashboard.theme.to_string(),
            Field::ShowNotifications => on_off(d.notifications.show_notifications),
            Field::Email => on_off(d.notifications.email),
            Field::Sms => on_off(d.notifications.sms),
            Field::Slack => on_off(d.notifications.slack),
            Field::MaxRetries => d.advanced.max_retries.to_string(),
            Field::Timeout => format!("{}s", d.advanced.timeout),
            Field::LogLevel => d.advanced.log_level.clone(),
            Field::Dataset => d.mock.dataset.to_string(),
        }
    }

    fn submit(&mut self) -> Option<Action> {
        match self.draft.validate() {
            Ok(()) => {
                self.error = None;
                Some(Action::SettingsApply(Box::new(self.draft.clone())))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        let mut section = "";
        for (i, field) in Field::ALL.iter().enumerate() {
            if field.section() != section {
                section = field.section();
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    format!("  {section}"),
                    theme::table_header(),
                )));
            }

            let active = i == self.active;
            let (arrow_l, arrow_r) = if active { ("◂ ", " ▸") } else { ("  ", "  ") };
            let label_style = if active {
                theme::key_hint_key()
            } else {
                theme::table_row()
            };
            let value_style = if active {
                Style::default()
                    .fg(theme::palette().highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::palette().text)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("    {:<24}", field.label()), label_style),
                Span::styled(arrow_l, theme::border_focused()),
                Span::styled(self.value_label(*field), value_style),
                Span::styled(arrow_r, theme::border_focused()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.error = None;
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseSettings),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.active = (self.active + 1) % Field::ALL.len();
                None
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.active = (self.active + Field::ALL.len() - 1) % Field::ALL.len();
                None
            }
            KeyCode::Char('l' | ' ') | KeyCode::Right => {
                self.adjust(true);
                None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.adjust(false);
                None
            }
            KeyCode::Enter => self.submit(),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(64);
        let height = area.height.min(24);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(Block::default().style(theme::overlay()), popup);

        let block = panel(
            Line::from(Span::styled(" Settings ", theme::title_style())),
            true,
        )
        .title_alignment(Alignment::Center);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // fields
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_fields(frame, layout[1]);

        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(err.as_str(), theme::error_banner()))
                    .alignment(Alignment::Center),
                layout[2],
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "j/k field  h/l change  Enter save  Esc cancel",
                theme::key_hint(),
            ))
            .alignment(Alignment::Center),
            layout[3],
        );
    }

    fn id(&self) -> &'static str {
        "Settings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn press(screen: &mut SettingsScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn numeric_fields_step_within_range() {
        let mut screen = SettingsScreen::new(&Config::default());
        for _ in 0..20 {
            press(&mut screen, KeyCode::Char('h'));
        }
        assert_eq!(screen.draft.dashboard.refresh_interval, 5);

        press(&mut screen, KeyCode::Char('l'));
        assert_eq!(screen.draft.dashboard.refresh_interval, 10);
    }

    #[test]
    fn enums_cycle_and_wrap() {
        let mut screen = SettingsScreen::new(&Config::default());
        screen.active = Field::ALL
            .iter()
            .position(|f| *f == Field::AlertThreshold)
            .unwrap();
        press(&mut screen, KeyCode::Char('h'));
        assert_eq!(screen.draft.dashboard.alert_threshold, Severity::Critical);
        press(&mut screen, KeyCode::Char('l'));
        assert_eq!(screen.draft.dashboard.alert_threshold, Severity::Low);

        screen.active = Field::ALL.iter().position(|f| *f == Field::Theme).unwrap();
        press(&mut screen, KeyCode::Right);
        assert_eq!(screen.draft.dashboard.theme, Theme::Dark);
    }

    #[test]
    fn enter_emits_validated_config() {
        let mut screen = SettingsScreen::new(&Config::default());
        screen.active = Field::ALL
            .iter()
            .position(|f| *f == Field::AutoRefresh)
            .unwrap();
        press(&mut screen, KeyCode::Char(' '));

        match press(&mut screen, KeyCode::Enter) {
            Some(Action::SettingsApply(config)) => assert!(!config.dashboard.auto_refresh),
            other => panic!("expected SettingsApply, got {other:?}"),
        }
    }

    #[test]
    fn invalid_draft_is_rejected() {
        let mut config = Config::default();
        config.advanced.log_level = "loud".into();
        let mut screen = SettingsScreen::new(&config);
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert!(screen.error.as_deref().is_some_and(|e| e.contains("log_level")));
    }

    #[test]
    fn reset_discards_edits() {
        let config = Config::default();
        let mut screen = SettingsScreen::new(&config);
        press(&mut screen, KeyCode::Char('l'));
        screen.reset(&config);
        assert_eq!(screen.draft, config);
        assert!(matches!(
            press(&mut screen, KeyCode::Esc),
            Some(Action::CloseSettings)
        ));
    }
}
