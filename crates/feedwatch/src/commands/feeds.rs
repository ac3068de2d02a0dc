//! Feed command handlers.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use feedwatch_core::view::{format_size_mb, format_timestamp};
use feedwatch_core::{Feed, FeedApi, FeedFilter, FeedSummary, FeedsView};

use crate::cli::{FeedListArgs, FeedsArgs, FeedsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct FeedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
    #[tabled(rename = "Last Generated")]
    last_generated: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Delay")]
    delay: String,
}

impl FeedRow {
    fn new(f: &Feed, color: bool) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            client: f.client.clone(),
            status: output::paint_status(f.status, color),
            scheduled: f.scheduled_time.clone(),
            last_generated: format_timestamp(&f.last_generated),
            size: format_size_mb(f.size_mb),
            delay: delay_label(f),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Active")]
    active: usize,
    #[tabled(rename = "Delayed")]
    delayed: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Total Size")]
    total_size: String,
}

impl From<&FeedSummary> for SummaryRow {
    fn from(s: &FeedSummary) -> Self {
        Self {
            total: s.total,
            active: s.active,
            delayed: s.delayed,
            failed: s.failed,
            total_size: format_size_mb(s.total_size_mb),
        }
    }
}

fn summary_table(summary: &FeedSummary) -> String {
    Table::new([SummaryRow::from(summary)])
        .with(Style::rounded())
        .to_string()
}

fn delay_label(f: &Feed) -> String {
    if f.is_delayed {
        format!("+{}m", f.delayed_by)
    } else {
        "-".into()
    }
}

fn detail(f: &Feed) -> String {
    output::detail_lines(&[
        ("ID", f.id.clone()),
        ("Name", f.name.clone()),
        ("Description", f.description.clone()),
        ("Client", f.client.clone()),
        ("Status", f.status.to_string()),
        ("Format", f.format.clone()),
        ("Size", format_size_mb(f.size_mb)),
        ("Scheduled", f.scheduled_time.clone()),
        ("Generated", format_timestamp(&f.last_generated)),
        ("Transferred", format_timestamp(&f.last_transferred)),
        ("Gen Time", format!("{} min", f.generation_time)),
        ("Xfer Time", format!("{} min", f.transfer_time)),
        ("Delay", delay_label(f)),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<A: FeedApi>(
    api: &A,
    args: FeedsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FeedsCommand::List(list) => {
            let feeds = api.get_feeds().await?;
            let (rows, footer) = list_page(feeds, &list);
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &rows,
                |f| FeedRow::new(f, color),
                |f| f.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                if let Some(footer) = footer {
                    eprintln!("{footer}");
                }
            }
            Ok(())
        }

        FeedsCommand::Get { feed } => {
            let found = api.get_feed(&feed).await?;
            let out = output::render_single(&global.output, &found, detail, |f| f.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FeedsCommand::Summary => {
            let feeds = api.get_feeds().await?;
            let summary = FeedSummary::from_feeds(&feeds);
            let out = output::render_single(
                &global.output,
                &summary,
                summary_table,
                |s| {
                    format!(
                        "total={} active={} delayed={} failed={} total_size_mb={}",
                        s.total, s.active, s.delayed, s.failed, s.total_size_mb
                    )
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Apply filters and pick the requested page. Returns the rows and a
/// `Page x of y` footer when paginating.
fn list_page(feeds: Vec<Feed>, args: &FeedListArgs) -> (Vec<Feed>, Option<String>) {
    let mut view = FeedsView::new(FeedFilter {
        search: args.search.clone().unwrap_or_default(),
        status: args.status,
        sort: args.sort,
    });
    view.set_source(feeds);

    if args.all {
        return (view.filtered().to_vec(), None);
    }

    view.set_page(usize::try_from(args.page).unwrap_or(usize::MAX));
    let footer = format!(
        "Page {} of {} ({} matching feeds)",
        view.page(),
        view.page_count(),
        view.filtered().len()
    );
    (view.visible().to_vec(), Some(footer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedwatch_core::MockGenerator;
    use feedwatch_core::view::FeedSort;

    fn args(page: u32, all: bool) -> FeedListArgs {
        FeedListArgs {
            search: None,
            status: None,
            page,
            all,
            sort: FeedSort::Id,
        }
    }

    #[test]
    fn pages_are_ten_ten_five_then_empty() {
        let feeds = MockGenerator::new(Some(1)).generate_feeds(chrono::Utc::now());
        let sizes: Vec<usize> = (1..=4)
            .map(|page| list_page(feeds.clone(), &args(page, false)).0.len())
            .collect();
        assert_eq!(sizes, [10, 10, 5, 0]);
        assert_eq!(list_page(feeds, &args(1, true)).0.len(), 25);
    }

    #[test]
    fn footer_reports_position() {
        let feeds = MockGenerator::new(Some(1)).generate_feeds(chrono::Utc::now());
        let (_, footer) = list_page(feeds, &args(2, false));
        assert_eq!(footer.as_deref(), Some("Page 2 of 3 (25 matching feeds)"));
    }
}
