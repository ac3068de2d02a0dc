//! Dashboard statistics and performance handlers.

use tabled::Tabled;

use feedwatch_core::{DashboardStats, FeedApi, FeedPerformance};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PerformanceRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Generated")]
    generated: u32,
    #[tabled(rename = "Transferred")]
    transferred: u32,
    #[tabled(rename = "Delayed")]
    delayed: u32,
    #[tabled(rename = "Failed")]
    failed: u32,
}

impl From<&FeedPerformance> for PerformanceRow {
    fn from(p: &FeedPerformance) -> Self {
        Self {
            day: p.label(),
            generated: p.generated,
            transferred: p.transferred,
            delayed: p.delayed,
            failed: p.failed,
        }
    }
}

fn stats_detail(s: &DashboardStats) -> String {
    output::detail_lines(&[
        ("Total feeds", s.total_feeds.to_string()),
        ("Active", s.active_feeds.to_string()),
        ("Delayed", s.delayed_feeds.to_string()),
        ("Failed", s.failed_feeds.to_string()),
        ("Inactive", s.inactive_feeds().to_string()),
        (
            "Clients",
            format!("{} ({} active)", s.total_clients, s.active_clients),
        ),
        ("Transferred", format!("{:.1} GB", s.total_data_transferred)),
        ("Avg generation", format!("{:.1} min", s.average_generation_time)),
        ("Avg transfer", format!("{:.1} min", s.average_transfer_time)),
        ("Uptime", format!("{:.1}%", s.uptime)),
    ])
}

pub async fn handle_stats<A: FeedApi>(api: &A, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = api.get_dashboard_stats().await?;
    let out = output::render_single(&global.output, &stats, stats_detail, |s| {
        format!(
            "total={} active={} delayed={} failed={} uptime={}",
            s.total_feeds, s.active_feeds, s.delayed_feeds, s.failed_feeds, s.uptime
        )
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_performance<A: FeedApi>(api: &A, global: &GlobalOpts) -> Result<(), CliError> {
    let performance = api.get_feed_performance().await?;
    let out = output::render_list(
        &global.output,
        &performance,
        |p| PerformanceRow::from(p),
        FeedPerformance::label,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
