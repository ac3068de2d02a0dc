//! Application core: the event loop and action dispatch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use feedwatch_config::Config;
use feedwatch_core::{MockFeedApi, PollConfig, PollGuard, PollUpdate};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::{spawn_acknowledge, spawn_view_poller};
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{create_screens, panel, settings::SettingsScreen};
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Settings editor, drawn over the active screen while open.
    settings: Option<SettingsScreen>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    api: MockFeedApi,
    config: Config,
    /// Where `SettingsApply` persists the config.
    config_path: PathBuf,
    poll: PollConfig,
    /// Parent of every background task; cancelled on exit.
    root_cancel: CancellationToken,
    /// Poller for the visible screen. Replacing it stops the old one.
    poll_guard: Option<PollGuard>,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(api: MockFeedApi, config: Config, config_path: PathBuf) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&config).into_iter().collect();

        theme::apply(config.dashboard.theme);

        Self {
            active_screen: ScreenId::Dashboard,
            screens,
            settings: None,
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            action_tx,
            action_rx,
            api,
            poll: config.to_runtime().poll,
            config,
            config_path,
            root_cancel: CancellationToken::new(),
            poll_guard: None,
            notification: None,
        }
    }

    /// Show `message` as a warning toast once the UI is up.
    pub fn notify_startup(&mut self, message: String) {
        self.notification = Some((Notification::warning(message), Instant::now()));
    }

    fn focus(&mut self, target: ScreenId) {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&target) {
            screen.set_focused(true);
            debug!(screen = screen.id(), "focused");
        }
    }

    /// Poll the data behind the active screen, stopping the previous poller.
    fn restart_poller(&mut self) {
        let view = self.active_screen.polled_view();
        self.poll_guard = Some(spawn_view_poller(
            view,
            &self.api,
            &self.poll,
            &self.root_cancel,
            self.action_tx.clone(),
        ));
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (cols, rows) = tui.size().unwrap_or((80, 24));
        debug!(cols, rows, "terminal ready");
        self.focus(self.active_screen);
        self.restart_poller();

        let mut events = EventReader::new(Duration::from_millis(250), &self.root_cancel);

        info!("TUI event loop started");

        while self.running {
            tui.draw(|frame| self.render(frame))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(Event::Key(key)) => {
                        if let Some(action) = self.handle_key_event(key)? {
                            self.process_action(&action)?;
                        }
                    }
                    Some(Event::Resize(cols, rows)) => {
                        debug!(cols, rows, "terminal resized");
                    }
                    Some(Event::Tick) => self.expire_notification(),
                    None => break,
                },
                Some(action) = self.action_rx.recv() => self.process_action(&action)?,
            }

            // Drain follow-ups and poller results before the next frame
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
            }
        }

        self.poll_guard = None;
        self.root_cancel.cancel();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Settings editor captures all other keys
        if let Some(settings) = self.settings.as_mut() {
            return settings.handle_key_event(key);
        }

        if self.search_active {
            return match key.code {
                KeyCode::Esc => Ok(Some(Action::CloseSearch)),
                KeyCode::Enter => Ok(Some(Action::SearchSubmit)),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Ok(Some(Action::SearchInput(self.search_query.clone())))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Ok(Some(Action::SearchInput(self.search_query.clone())))
                }
                _ => Ok(None),
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/')) if self.active_screen.searchable() => {
                return Ok(Some(Action::OpenSearch));
            }
            (KeyModifiers::NONE, KeyCode::Char(',')) => return Ok(Some(Action::OpenSettings)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::ForceRefresh)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = u8::try_from(c).unwrap_or(b'0') - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Forward `action` to every screen, queueing any follow-ups.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        let quiet = !self.config.notifications.show_notifications;
        if quiet && notification.level != NotificationLevel::Error {
            debug!(message = %notification.message, "notification suppressed");
            return;
        }
        self.notification = Some((notification, Instant::now()));
    }

    fn report_failure<T>(&mut self, view: &str, update: &PollUpdate<T>) {
        if let PollUpdate::Failed { error, .. } = update {
            self.notify(Notification::error(format!("{view} refresh failed: {error}")));
        }
    }

    fn expire_notification(&mut self) {
        let expired = self.notification.as_ref().is_some_and(|(n, created)| {
            let ttl = match n.level {
                NotificationLevel::Error | NotificationLevel::Warning => 5,
                NotificationLevel::Success | NotificationLevel::Info => 3,
            };
            created.elapsed() > Duration::from_secs(ttl)
        });
        if expired {
            self.notification = None;
        }
    }

    fn apply_settings(&mut self, config: &Config) {
        match feedwatch_config::save_config_to(config, &self.config_path) {
            Ok(()) => {
                info!(path = %self.config_path.display(), "settings saved");
                self.notify(Notification::success("Settings saved"));
            }
            Err(e) => {
                warn!(error = %e, "failed to save settings");
                self.notify(Notification::error(format!("Settings not saved: {e}")));
            }
        }

        if config.mock.dataset != self.config.mock.dataset
            || config.advanced.log_level != self.config.advanced.log_level
        {
            self.notify(Notification::info(
                "Dataset and log level changes apply on restart",
            ));
        }

        theme::apply(config.dashboard.theme);
        self.poll = config.to_runtime().poll;
        self.config = config.clone();
        self.settings = None;
        self.restart_poller();
    }

    /// Update app state for `action` and propagate it to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    self.focus(*target);
                    self.search_active = false;
                    self.search_query.clear();
                    self.restart_poller();
                }
            }

            Action::ForceRefresh => {
                if let Some(guard) = &self.poll_guard {
                    debug!(view = guard.name(), "manual refresh");
                    guard.refresh();
                }
            }

            Action::DashboardUpdated(update) => {
                self.report_failure("Dashboard", update);
                self.broadcast(action)?;
            }
            Action::FeedsUpdated(update) => {
                self.report_failure("Feeds", update);
                self.broadcast(action)?;
            }
            Action::AlertsUpdated(update) => {
                self.report_failure("Alerts", update);
                self.broadcast(action)?;
            }

            Action::RequestAcknowledge(alert_id) => {
                spawn_acknowledge(
                    &self.api,
                    alert_id.clone(),
                    &self.root_cancel,
                    self.action_tx.clone(),
                );
            }
            Action::AcknowledgeFinished { alert_id, error } => {
                self.broadcast(action)?;
                match error {
                    None => self.notify(Notification::success(format!("Acknowledged {alert_id}"))),
                    Some(e) => {
                        self.notify(Notification::error(format!("Acknowledge failed: {e}")));
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::OpenSearch => {
                self.search_active = true;
                self.search_query.clear();
            }
            Action::SearchSubmit => self.search_active = false,
            Action::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    screen.update(action)?;
                }
            }

            Action::OpenSettings => {
                self.help_visible = false;
                self.settings = Some(SettingsScreen::new(&self.config));
            }
            Action::CloseSettings => self.settings = None,
            Action::SettingsApply(config) => {
                self.broadcast(action)?;
                self.apply_settings(config);
            }

            // Everything else goes to the active screen only
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays, last = topmost
        if let Some(settings) = &self.settings {
            settings.render(frame, layout[0]);
        }
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let p = theme::palette();
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(p.accent)),
                Span::styled(&self.search_query, Style::default().fg(p.highlight)),
                Span::styled("█", Style::default().fg(p.highlight)),
                Span::styled("  Esc clear  Enter keep", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let refresh = if self.config.dashboard.auto_refresh {
            let secs = self
                .poll
                .settings_for(self.active_screen.polled_view())
                .interval
                .map_or(0, |d| d.as_secs());
            Span::styled(
                format!("● auto {secs}s"),
                Style::default().fg(p.success),
            )
        } else {
            Span::styled("○ manual", Style::default().fg(p.warning))
        };

        let search = if self.search_query.is_empty() {
            String::new()
        } else {
            format!(" │ filter \"{}\"", self.search_query)
        };
        let hints = Span::styled(
            format!("{search} │ r refresh  ? help  / search  , settings  q quit"),
            theme::key_hint(),
        );
        let line = Line::from(vec![Span::raw(" "), refresh, hints]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 60u16.min(area.width.saturating_sub(4));
        let help_height = 22u16.min(area.height.saturating_sub(4));
        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);
        frame.render_widget(Block::default().style(theme::overlay()), help_area);

        let block = panel(
            Span::styled(" Keyboard Shortcuts ", theme::title_style()),
            true,
        );
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(format!("  {title}"), theme::table_header()))
        };
        let row = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Navigation"),
            row("1-3", "Jump to screen"),
            row("Tab", "Next screen"),
            row("j/k ↑/↓", "Move up/down"),
            row("n/p", "Next / previous page (Feeds)"),
            row("Enter", "Details (Feeds) / acknowledge (Alerts)"),
            row("Esc", "Close"),
            Line::from(""),
            section("Filters"),
            row("/", "Search"),
            row("f", "Cycle status / severity filter"),
            row("t", "Cycle alert type"),
            row("a", "Show / hide acknowledged alerts"),
            row("s", "Cycle sort (Feeds)"),
            Line::from(""),
            section("Global"),
            row("r", "Refresh now"),
            row(",", "Settings"),
            row("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;
        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let p = theme::palette();
        let (color, icon) = match notif.level {
            NotificationLevel::Success => (p.success, "✓"),
            NotificationLevel::Error => (p.error, "✗"),
            NotificationLevel::Warning => (p.warning, "!"),
            NotificationLevel::Info => (p.highlight, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = panel("", false)
            .border_style(Style::default().fg(color))
            .style(theme::overlay());
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {icon} "), Style::default().fg(color)),
                Span::styled(notif.message.as_str(), theme::table_row()),
            ])),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedwatch_core::{ApiConfig, LatencyProfile};

    fn app(dir: &tempfile::TempDir) -> App {
        let api = MockFeedApi::new(&ApiConfig {
            latency: LatencyProfile::instant(),
            seed: Some(21),
            ..ApiConfig::default()
        });
        App::new(api, Config::default(), dir.path().join("config.toml"))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn switching_screens_replaces_poller() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.restart_poller();
        assert_eq!(app.poll_guard.as_ref().unwrap().name(), "dashboard");

        let action = app.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        app.process_action(&action.unwrap()).unwrap();
        assert_eq!(app.active_screen, ScreenId::Alerts);
        assert_eq!(app.poll_guard.as_ref().unwrap().name(), "alerts");
    }

    #[tokio::test]
    async fn acknowledge_round_trip_reports_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.process_action(&Action::RequestAcknowledge("alert-002".into()))
            .unwrap();

        loop {
            match app.action_rx.recv().await {
                Some(Action::AcknowledgeFinished { alert_id, error }) => {
                    assert_eq!(alert_id, "alert-002");
                    assert_eq!(error, None);
                    break;
                }
                Some(_) => {}
                None => panic!("channel closed"),
            }
        }
    }

    #[tokio::test]
    async fn search_is_scoped_to_list_screens() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert!(app.handle_key_event(key(KeyCode::Char('/'))).unwrap().is_none());

        app.process_action(&Action::SwitchScreen(ScreenId::Feeds))
            .unwrap();
        let open = app.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        app.process_action(&open.unwrap()).unwrap();
        assert!(app.search_active);

        let typed = app.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        assert!(matches!(typed, Some(Action::SearchInput(ref q)) if q == "x"));
    }

    #[tokio::test]
    async fn settings_apply_saves_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.process_action(&Action::OpenSettings).unwrap();
        assert!(app.settings.is_some());

        let mut config = Config::default();
        config.dashboard.refresh_interval = 120;
        app.process_action(&Action::SettingsApply(Box::new(config)))
            .unwrap();

        assert!(app.settings.is_none());
        assert_eq!(app.poll.dashboard_interval, Duration::from_secs(120));
        let saved = feedwatch_config::load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.dashboard.refresh_interval, 120);
    }

    #[tokio::test]
    async fn quiet_mode_keeps_error_toasts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.config.notifications.show_notifications = false;

        app.notify(Notification::success("saved"));
        assert!(app.notification.is_none());
        app.notify(Notification::error("boom"));
        assert!(app.notification.is_some());
    }
}
