//! Feeds screen: paged feed table with status filter, sort, and detail panel.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use strum::IntoEnumIterator;

use feedwatch_core::view::{format_size_mb, format_timestamp};
use feedwatch_core::{Feed, FeedFilter, FeedSort, FeedStatus, FeedsView};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs;

use super::{PollStatus, panel, render_error_banner};

const STATUS_OPTIONS: [&str; 5] = ["All", "Active", "Inactive", "Error", "Pending"];
const SORT_OPTIONS: [&str; 5] = ["Id", "Name", "Status", "Size", "Last Generated"];

pub struct FeedsScreen {
    focused: bool,
    view: FeedsView,
    status: PollStatus,
    table_state: TableState,
    detail_open: bool,
}

impl FeedsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: FeedsView::new(FeedFilter::default()),
            status: PollStatus::default(),
            table_state: TableState::default().with_selected(Some(0)),
            detail_open: false,
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_feed(&self) -> Option<&Feed> {
        self.view.visible().get(self.selected_index())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.view.visible().len();
        if len == 0 {
            return;
        }
        let next = self
            .selected_index()
            .saturating_add_signed(delta)
            .min(len - 1);
        self.table_state.select(Some(next));
    }

    /// Back to the first row after the page content changes.
    fn reset_selection(&mut self) {
        self.table_state.select(Some(0));
        if self.view.visible().is_empty() {
            self.detail_open = false;
        }
    }

    fn cycle_sort(&mut self) {
        let current = self.view.filter().sort;
        let next = FeedSort::iter()
            .skip_while(|s| *s != current)
            .nth(1)
            .unwrap_or_default();
        self.view.set_sort(next);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Name", "Client", "Status", "Size", "Format", "Last Generated", "Delay"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .view
            .visible()
            .iter()
            .map(|feed| {
                let delay = if feed.is_delayed {
                    Cell::from(format!("+{}m", feed.delayed_by))
                        .style(Style::default().fg(theme::palette().warning))
                } else {
                    Cell::from("-").style(theme::key_hint())
                };
                Row::new(vec![
                    Cell::from(feed.id.clone()).style(theme::key_hint()),
                    Cell::from(feed.name.clone()),
                    Cell::from(feed.client.clone()),
                    Cell::from(feed.status.to_string()).style(theme::feed_status(feed.status)),
                    Cell::from(format_size_mb(feed.size_mb)),
                    Cell::from(feed.format.clone()),
                    Cell::from(format_timestamp(&feed.last_generated)),
                    delay,
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(9),
            Constraint::Fill(2),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(20),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(frame: &mut Frame, area: Rect, feed: &Feed) {
        let block = panel(
            Span::styled(format!(" {} ", feed.name), theme::title_style()),
            true,
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<17}"), theme::key_hint()),
                Span::styled(value, theme::table_row()),
            ])
        };
        let delay = if feed.is_delayed {
            format!("{} minutes", feed.delayed_by)
        } else {
            "on schedule".into()
        };

        let lines = vec![
            Line::from(Span::styled(
                format!("  {}", feed.description),
                theme::table_row(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  {:<17}", "Status"), theme::key_hint()),
                Span::styled(feed.status.to_string(), theme::feed_status(feed.status)),
            ]),
            field("ID", feed.id.clone()),
            field("Client", feed.client.clone()),
            field("Scheduled", feed.scheduled_time.clone()),
            field("Last generated", format_timestamp(&feed.last_generated)),
            field("Last transferred", format_timestamp(&feed.last_transferred)),
            field("Size", format_size_mb(feed.size_mb)),
            field("Format", feed.format.clone()),
            field("Generation time", format!("{} min", feed.generation_time)),
            field("Transfer time", format!("{} min", feed.transfer_time)),
            field("Delay", delay),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for FeedsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc if self.detail_open => self.detail_open = false,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                self.view.next_page();
                self.reset_selection();
            }
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
                self.view.prev_page();
                self.reset_selection();
            }
            KeyCode::Char('f') => {
                self.view
                    .set_status(sub_tabs::cycle_option(self.view.filter().status));
                self.reset_selection();
            }
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected_feed().is_some();
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::FeedsUpdated(update) => {
                if self.status.observe(update) {
                    if let feedwatch_core::PollUpdate::Loaded { seq, data } = update {
                        self.view.apply_update(*seq, data.as_ref().clone());
                        self.reset_selection();
                    }
                }
            }
            Action::SearchInput(query) => {
                self.view.set_search(query.as_str());
                self.reset_selection();
            }
            Action::CloseSearch => {
                self.view.set_search("");
                self.reset_selection();
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
            Span::styled(format!(" Feeds ({shown}/{total}) "), theme::title_style()),
            Span::styled(format!("[{}] ", self.status.age_label()), theme::key_hint()),
        ];
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
            Constraint::Min(3),    // table (+ detail)
            Constraint::Length(1), // pager + hints
        ])
        .split(inner);

        render_error_banner(frame, layout[0], self.status.error());

        let p = theme::palette();
        let summary = self.view.summary();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("  {} feeds  ", summary.total), theme::table_row()),
                Span::styled(
                    format!("{} active  ", summary.active),
                    Style::default().fg(p.success),
                ),
                Span::styled(
                    format!("{} delayed  ", summary.delayed),
                    Style::default().fg(p.warning),
                ),
                Span::styled(
                    format!("{} failed  ", summary.failed),
                    Style::default().fg(p.error),
                ),
                Span::styled(format_size_mb(summary.total_size_mb), theme::key_hint()),
            ])),
            layout[1],
        );

        let mut filters = sub_tabs::render_sub_tabs(
            "  Status",
            &STATUS_OPTIONS,
            sub_tabs::option_index(filter.status),
        );
        let sort_index = FeedSort::iter()
            .position(|s| s == filter.sort)
            .unwrap_or(0);
        filters.spans.push(Span::raw("    "));
        filters
            .spans
            .extend(sub_tabs::render_sub_tabs("Sort", &SORT_OPTIONS, sort_index).spans);
        frame.render_widget(Paragraph::new(filters), layout[2]);

        let (table_area, detail_area) = if self.detail_open {
            let chunks =
                Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                    .split(layout[3]);
            (chunks[0], Some(chunks[1]))
        } else {
            (layout[3], None)
        };

        if self.status.is_loading() {
            frame.render_widget(
                Paragraph::new(Span::styled("  Loading feeds…", theme::key_hint())),
                table_area,
            );
        } else if self.view.visible().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No feeds match", theme::key_hint())),
                table_area,
            );
        } else {
            self.render_table(frame, table_area);
        }

        if let (Some(area), Some(feed)) = (detail_area, self.selected_feed()) {
            Self::render_detail(frame, area, feed);
        }

        let page_count = self.view.page_count().max(1);
        let footer = Line::from(vec![
            Span::styled(
                format!("  Page {} of {page_count}   ", self.view.page()),
                theme::table_row(),
            ),
            Span::styled("n/p ", theme::key_hint_key()),
            Span::styled("page  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled("status  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("sort  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("details  ", theme::key_hint()),
            Span::styled("/ ", theme::key_hint_key()),
            Span::styled("search", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(footer), layout[4]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Feeds"
    }
}
