//! Alerts screen: filtered alert list with optimistic acknowledgment.

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use feedwatch_core::{Alert, AlertFilter, AlertsView, PollUpdate, Severity};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{meter, sub_tabs};

use super::{PollStatus, panel, render_error_banner};

const SEVERITY_OPTIONS: [&str; 5] = ["All", "Low", "Medium", "High", "Critical"];
const TYPE_OPTIONS: [&str; 5] = ["All", "Gen Delay", "Xfer Delay", "Failure", "Warning"];

pub struct AlertsScreen {
    focused: bool,
    view: AlertsView,
    status: PollStatus,
    table_state: TableState,
}

impl AlertsScreen {
    /// Alerts below `threshold` are never listed.
    pub fn new(threshold: Severity) -> Self {
        Self {
            focused: false,
            view: AlertsView::new(AlertFilter {
                min_severity: threshold,
                ..AlertFilter::default()
            }),
            status: PollStatus::default(),
            table_state: TableState::default().with_selected(Some(0)),
        }
    }

    fn selected_alert(&self) -> Option<&Alert> {
        self.view
            .filtered()
            .get(self.table_state.selected().unwrap_or(0))
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.view.filtered().len();
        if len == 0 {
            return;
        }
        let next = self
            .table_state
            .selected()
            .unwrap_or(0)
            .saturating_add_signed(delta)
            .min(len - 1);
        self.table_state.select(Some(next));
    }

    /// Keep the cursor on a row after the list shrinks.
    fn clamp_selection(&mut self) {
        let len = self.view.filtered().len();
        let selected = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(selected.min(len.saturating_sub(1))));
    }

    fn acknowledge_selected(&mut self) -> Option<Action> {
        let id = self.selected_alert()?.id.clone();
        if self.view.begin_acknowledge(&id) {
            self.clamp_selection();
            Some(Action::RequestAcknowledge(id))
        } else {
            None
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["", "Severity", "Type", "Feed", "Client", "Message", "When"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let now = Utc::now();
        let rows: Vec<Row> = self
            .view
            .filtered()
            .iter()
            .map(|alert| {
                let marker = if self.view.is_pending(&alert.id) {
                    Cell::from("…").style(theme::key_hint_key())
                } else if alert.is_acknowledged {
                    Cell::from("✓").style(Style::default().fg(theme::palette().success))
                } else {
                    Cell::from("●").style(theme::severity(alert.severity))
                };
                let row_style = if alert.is_acknowledged {
                    theme::key_hint()
                } else {
                    theme::table_row()
                };
                Row::new(vec![
                    marker,
                    Cell::from(alert.severity.to_string()).style(theme::severity(alert.severity)),
                    Cell::from(alert.alert_type.to_string()),
                    Cell::from(alert.feed_name.clone()),
                    Cell::from(alert.client.clone()),
                    Cell::from(alert.message.clone()),
                    Cell::from(meter::ago(&alert.timestamp, now)),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Length(9),
            Constraint::Length(17),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Fill(1),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Component for AlertsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('f') => {
                self.view
                    .update_filter(|f| f.severity = sub_tabs::cycle_option(f.severity));
                self.clamp_selection();
                None
            }
            KeyCode::Char('t') => {
                self.view
                    .update_filter(|f| f.alert_type = sub_tabs::cycle_option(f.alert_type));
                self.clamp_selection();
                None
            }
            KeyCode::Char('a') => {
                self.view
                    .update_filter(|f| f.show_acknowledged = !f.show_acknowledged);
                self.clamp_selection();
                None
            }
            KeyCode::Enter => self.acknowledge_selected(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AlertsUpdated(update) => {
                if self.status.observe(update) {
                    if let PollUpdate::Loaded { seq, data } = update {
                        self.view.apply_update(*seq, data.as_ref().clone());
                        self.clamp_selection();
                    }
                }
            }
            Action::AcknowledgeFinished { alert_id, error } => {
                if error.is_some() {
                    self.view.rollback_acknowledge(alert_id);
                } else {
                    self.view.confirm_acknowledge(alert_id);
                }
                self.clamp_selection();
            }
            Action::SearchInput(query) => {
                self.view.update_filter(|f| f.search.clone_from(query));
                self.table_state.select(Some(0));
            }
            Action::CloseSearch => {
                self.view.update_filter(|f| f.search.clear());
                self.clamp_selection();
            }
            Action::SettingsApply(config) => {
                let threshold = config.dashboard.alert_threshold;
                self.view.update_filter(|f| f.min_severity = threshold);
                self.clamp_selection();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let filter = self.view.filter();
        let shown = self.view.filtered().len();
        let total = self.view.source().len();
        let mut title = vec![
            Span::styled(format!(" Alerts ({shown}/{total}) "), theme::title_style()),
            Span::styled(format!("[{}] ", self.status.age_label()), theme::key_hint()),
        ];
        if filter.min_severity > Severity::Low {
            title.push(Span::styled(
                format!("≥{} ", filter.min_severity),
                theme::severity(filter.min_severity),
            ));
        }
        if !filter.search.is_empty() {
            title.push(Span::styled(
                format!("\"{}\" ", filter.search),
                theme::key_hint_key(),
            ));
        }
        let block = panel(Line::from(title), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // error banner
            Constraint::Length(1), // summary
            Constraint::Length(1), // filters
            Constraint::Min(3),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        render_error_banner(frame, layout[0], self.status.error());

        let summary = self.view.summary();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("  {} alerts  ", summary.total), theme::table_row()),
                Span::styled(
                    format!("{} critical  ", summary.critical),
                    theme::severity(Severity::Critical),
                ),
                Span::styled(
                    format!("{} high  ", summary.high),
                    theme::severity(Severity::High),
                ),
                Span::styled(
                    format!("{} unacknowledged", summary.unacknowledged),
                    theme::key_hint_key(),
                ),
            ])),
            layout[1],
        );

        let mut filters = sub_tabs::render_sub_tabs(
            "  Severity",
            &SEVERITY_OPTIONS,
            sub_tabs::option_index(filter.severity),
        );
        filters.spans.push(Span::raw("    "));
        filters.spans.extend(
            sub_tabs::render_sub_tabs(
                "Type",
                &TYPE_OPTIONS,
                sub_tabs::option_index(filter.alert_type),
            )
            .spans,
        );
        filters.spans.push(Span::styled(
            if filter.show_acknowledged {
                "    showing acknowledged"
            } else {
                "    hiding acknowledged"
            },
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(filters), layout[2]);

        if self.status.is_loading() {
            frame.render_widget(
                Paragraph::new(Span::styled("  Loading alerts…", theme::key_hint())),
                layout[3],
            );
        } else if self.view.filtered().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No alerts match", theme::key_hint())),
                layout[3],
            );
        } else {
            self.render_table(frame, layout[3]);
        }

        let hints = Line::from(vec![
            Span::styled("  Enter ", theme::key_hint_key()),
            Span::styled("acknowledge  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled("severity  ", theme::key_hint()),
            Span::styled("t ", theme::key_hint_key()),
            Span::styled("type  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("acknowledged  ", theme::key_hint()),
            Span::styled("/ ", theme::key_hint_key()),
            Span::styled("search", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[4]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Alerts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use feedwatch_core::MockGenerator;
    use pretty_assertions::assert_eq;

    /// Same seed and clock on every call, so each batch is identical.
    fn loaded(seq: u64) -> Action {
        let now = chrono::DateTime::from_timestamp(1_790_000_000, 0).unwrap();
        let alerts = MockGenerator::new(Some(9)).generate_alerts(now);
        Action::AlertsUpdated(PollUpdate::Loaded {
            seq,
            data: Arc::new(alerts),
        })
    }

    fn press(screen: &mut AlertsScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    /// Select the first unacknowledged alert and return its id.
    fn select_unacknowledged(screen: &mut AlertsScreen) -> String {
        let idx = screen
            .view
            .filtered()
            .iter()
            .position(|a| !a.is_acknowledged)
            .expect("mock data has unacknowledged alerts");
        screen.table_state.select(Some(idx));
        screen.view.filtered()[idx].id.clone()
    }

    #[test]
    fn threshold_hides_lower_severities() {
        let mut screen = AlertsScreen::new(Severity::High);
        screen.update(&loaded(1)).unwrap();
        assert!(
            screen
                .view
                .filtered()
                .iter()
                .all(|a| a.severity >= Severity::High)
        );
    }

    #[test]
    fn acknowledge_is_optimistic_then_confirmed() {
        let mut screen = AlertsScreen::new(Severity::Low);
        screen.update(&loaded(1)).unwrap();
        let id = select_unacknowledged(&mut screen);

        let action = press(&mut screen, KeyCode::Enter);
        assert!(matches!(action, Some(Action::RequestAcknowledge(ref a)) if *a == id));
        assert!(screen.view.is_pending(&id));

        // A refresh carrying the old state keeps the local flip.
        screen.update(&loaded(2)).unwrap();
        let alert = screen.view.source().iter().find(|a| a.id == id).unwrap();
        assert!(alert.is_acknowledged);

        screen
            .update(&Action::AcknowledgeFinished {
                alert_id: id.clone(),
                error: None,
            })
            .unwrap();
        assert!(!screen.view.is_pending(&id));
    }

    #[test]
    fn failed_acknowledge_rolls_back() {
        let mut screen = AlertsScreen::new(Severity::Low);
        screen.update(&loaded(1)).unwrap();
        let id = select_unacknowledged(&mut screen);
        press(&mut screen, KeyCode::Enter);

        screen
            .update(&Action::AcknowledgeFinished {
                alert_id: id.clone(),
                error: Some("backend unavailable".into()),
            })
            .unwrap();
        let alert = screen.view.source().iter().find(|a| a.id == id).unwrap();
        assert!(!alert.is_acknowledged);
        assert!(!screen.view.is_pending(&id));
    }

    #[test]
    fn filter_keys_cycle() {
        let mut screen = AlertsScreen::new(Severity::Low);
        screen.update(&loaded(1)).unwrap();

        press(&mut screen, KeyCode::Char('f'));
        assert_eq!(screen.view.filter().severity, Some(Severity::Low));
        press(&mut screen, KeyCode::Char('a'));
        assert!(!screen.view.filter().show_acknowledged);
        assert!(screen.view.filtered().iter().all(|a| !a.is_acknowledged));
    }

    #[test]
    fn settings_apply_moves_threshold() {
        let mut screen = AlertsScreen::new(Severity::Low);
        screen.update(&loaded(1)).unwrap();
        let mut config = feedwatch_config::Config::default();
        config.dashboard.alert_threshold = Severity::Critical;
        screen
            .update(&Action::SettingsApply(Box::new(config)))
            .unwrap();
        assert_eq!(screen.view.filter().min_severity, Severity::Critical);
    }
}
