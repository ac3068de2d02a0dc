//! Dashboard screen: headline stats, weekly performance, status mix,
//! and the most recent alerts.

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph};

use feedwatch_core::{DashboardData, PollUpdate};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::meter;

use super::{PollStatus, panel, render_error_banner};

pub struct DashboardScreen {
    focused: bool,
    data: Option<Arc<DashboardData>>,
    status: PollStatus,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            data: None,
            status: PollStatus::default(),
        }
    }

    fn apply(&mut self, update: &PollUpdate<Arc<DashboardData>>) {
        if self.status.observe(update) {
            if let PollUpdate::Loaded { data, .. } = update {
                self.data = Some(Arc::clone(data));
            }
        }
    }

    fn render_cards(frame: &mut Frame, area: Rect, data: &DashboardData) {
        let s = &data.stats;
        let p = theme::palette();
        let cards: [(&str, String, String, Color); 8] = [
            (
                "Feeds",
                s.total_feeds.to_string(),
                format!("{} active", s.active_feeds),
                p.highlight,
            ),
            (
                "Delayed",
                s.delayed_feeds.to_string(),
                "behind schedule".into(),
                p.warning,
            ),
            (
                "Failed",
                s.failed_feeds.to_string(),
                "need attention".into(),
                p.error,
            ),
            (
                "Clients",
                s.total_clients.to_string(),
                format!("{} active", s.active_clients),
                p.accent,
            ),
            (
                "Transferred",
                format!("{:.1} GB", s.total_data_transferred),
                "all feeds".into(),
                p.highlight,
            ),
            (
                "Avg Generation",
                format!("{:.1} min", s.average_generation_time),
                "per run".into(),
                p.coral,
            ),
            (
                "Avg Transfer",
                format!("{:.1} min", s.average_transfer_time),
                "per run".into(),
                p.coral,
            ),
            (
                "Uptime",
                format!("{:.1}%", s.uptime),
                "last 7 days".into(),
                p.success,
            ),
        ];

        let rows = Layout::vertical([Constraint::Length(4), Constraint::Length(4)]).split(area);
        for (row, chunk) in rows.iter().zip(cards.chunks(4)) {
            let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(*row);
            for (col, (title, value, caption, color)) in cols.iter().zip(chunk) {
                let block = panel(Span::styled(format!(" {title} "), theme::title_style()), false);
                let inner = block.inner(*col);
                frame.render_widget(block, *col);
                let lines = vec![
                    Line::from(Span::styled(
                        format!(" {value}"),
                        Style::default().fg(*color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(format!(" {caption}"), theme::key_hint())),
                ];
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }
    }

    fn render_performance(frame: &mut Frame, area: Rect, data: &DashboardData) {
        let p = theme::palette();
        let legend = Line::from(vec![
            Span::styled(" Feed Performance ", theme::title_style()),
            Span::styled("■", Style::default().fg(p.highlight)),
            Span::styled(" gen ", theme::key_hint()),
            Span::styled("■", Style::default().fg(p.success)),
            Span::styled(" xfer ", theme::key_hint()),
            Span::styled("■", Style::default().fg(p.warning)),
            Span::styled(" delay ", theme::key_hint()),
            Span::styled("■", Style::default().fg(p.error)),
            Span::styled(" fail ", theme::key_hint()),
        ]);
        let block = panel(legend, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut chart = BarChart::default()
            .bar_width(2)
            .bar_gap(0)
            .group_gap(2)
            .value_style(theme::key_hint());
        for day in &data.performance {
            let bar = |value: u32, color: Color| {
                Bar::default()
                    .value(u64::from(value))
                    .style(Style::default().fg(color))
                    .text_value(String::new())
            };
            let bars = [
                bar(day.generated, p.highlight),
                bar(day.transferred, p.success),
                bar(day.delayed, p.warning),
                bar(day.failed, p.error),
            ];
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(day.label()))
                    .bars(&bars),
            );
        }
        frame.render_widget(chart, inner);
    }

    fn render_breakdown(frame: &mut Frame, area: Rect, data: &DashboardData) {
        let block = panel(Span::styled(" Feed Status ", theme::title_style()), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let p = theme::palette();
        let breakdown = data.status_breakdown();
        let total = data.stats.total_feeds;
        let bar_width = inner.width.saturating_sub(22).clamp(4, 30);

        let mut lines = vec![Line::from("")];
        for (label, count, color) in [
            ("Active", breakdown.active, p.success),
            ("Delayed", breakdown.delayed, p.warning),
            ("Failed", breakdown.failed, p.error),
            ("Inactive", breakdown.inactive, p.muted),
        ] {
            let pct = meter::share(count, total);
            let (filled, empty) = meter::pct_bar(pct, bar_width);
            lines.push(Line::from(vec![
                Span::styled(format!(" {label:<9}"), theme::table_row()),
                Span::styled(filled, Style::default().fg(color)),
                Span::styled(empty, theme::key_hint()),
                Span::styled(format!(" {count:>3} {pct:>3.0}%"), Style::default().fg(color)),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_recent_alerts(frame: &mut Frame, area: Rect, data: &DashboardData) {
        let block = panel(Span::styled(" Recent Alerts ", theme::title_style()), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if data.recent_alerts.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No alerts", theme::key_hint())),
                inner,
            );
            return;
        }

        let now = Utc::now();
        let msg_width = usize::from(inner.width.saturating_sub(40));
        let lines: Vec<Line> = data
            .recent_alerts
            .iter()
            .map(|alert| {
                let message: String = alert.message.chars().take(msg_width).collect();
                let ack = if alert.is_acknowledged { "✓" } else { "●" };
                Line::from(vec![
                    Span::styled(format!(" {ack} "), theme::severity(alert.severity)),
                    Span::styled(
                        format!("{:<9}", alert.severity.to_string()),
                        theme::severity(alert.severity),
                    ),
                    Span::styled(format!("{:<16} ", alert.feed_name), theme::table_row()),
                    Span::styled(message, theme::table_row()),
                    Span::styled(
                        format!("  {}", meter::ago(&alert.timestamp, now)),
                        theme::key_hint(),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DashboardUpdated(update) = action {
            self.apply(update);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" Feed Monitoring ", theme::title_style()),
            Span::styled(format!(" [{}] ", self.status.age_label()), theme::key_hint()),
        ]);
        let block = panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);
        render_error_banner(frame, layout[0], self.status.error());

        let Some(data) = self.data.as_deref() else {
            let text = if self.status.is_loading() {
                " Loading dashboard…"
            } else {
                " No data yet"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme::key_hint())),
                layout[1],
            );
            return;
        };

        let rows = Layout::vertical([
            Constraint::Length(8), // stat cards
            Constraint::Min(10),   // chart + breakdown
            Constraint::Length(7), // recent alerts
        ])
        .split(layout[1]);

        Self::render_cards(frame, rows[0], data);

        let middle =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(rows[1]);
        Self::render_performance(frame, middle[0], data);
        Self::render_breakdown(frame, middle[1], data);
        Self::render_recent_alerts(frame, rows[2], data);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Dashboard"
    }
}
