//! Alert command handlers.

use tabled::Tabled;

use feedwatch_core::view::format_timestamp;
use feedwatch_core::{
    Alert, AlertFilter, AlertSummary, AlertsView, CommandResult, FeedApi, Severity,
};

use crate::cli::{AlertListArgs, AlertsArgs, AlertsCommand, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

const MESSAGE_WIDTH: usize = 48;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    alert_type: String,
    #[tabled(rename = "Feed")]
    feed: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Ack")]
    ack: String,
}

impl AlertRow {
    fn new(a: &Alert, color: bool) -> Self {
        Self {
            id: a.id.clone(),
            severity: output::paint_severity(a.severity, color),
            alert_type: a.alert_type.to_string(),
            feed: a.feed_name.clone(),
            client: a.client.clone(),
            message: util::truncate(&a.message, MESSAGE_WIDTH),
            when: format_timestamp(&a.timestamp),
            ack: if a.is_acknowledged { "yes" } else { "-" }.into(),
        }
    }
}

fn detail(a: &Alert) -> String {
    output::detail_lines(&[
        ("ID", a.id.clone()),
        ("Severity", a.severity.to_string()),
        ("Type", a.alert_type.to_string()),
        ("Feed", format!("{} ({})", a.feed_name, a.feed_id)),
        ("Client", a.client.clone()),
        ("Message", a.message.clone()),
        ("Raised", format_timestamp(&a.timestamp)),
        ("Acknowledged", a.is_acknowledged.to_string()),
    ])
}

fn summary_detail(s: &AlertSummary) -> String {
    output::detail_lines(&[
        ("Total", s.total.to_string()),
        ("Critical", s.critical.to_string()),
        ("High", s.high.to_string()),
        ("Unacknowledged", s.unacknowledged.to_string()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<A: FeedApi>(
    api: &A,
    args: AlertsArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List(list) => {
            let alerts = api.get_alerts().await?;
            let rows = select(alerts, &list, cfg.dashboard.alert_threshold);
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &rows,
                |a| AlertRow::new(a, color),
                |a| a.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Ack { alert } => {
            match api.acknowledge_alert(&alert).await? {
                CommandResult::Alert(updated) => {
                    let out = output::render_single(&global.output, &updated, detail, |a| {
                        a.id.clone()
                    });
                    output::print_output(&out, global.quiet);
                }
                CommandResult::Ok => {
                    if !global.quiet {
                        eprintln!("Alert {alert} acknowledged");
                    }
                }
            }
            Ok(())
        }

        AlertsCommand::Summary => {
            let alerts = api.get_alerts().await?;
            let summary = AlertSummary::from_alerts(&alerts);
            let out = output::render_single(&global.output, &summary, summary_detail, |s| {
                format!(
                    "total={} critical={} high={} unacknowledged={}",
                    s.total, s.critical, s.high, s.unacknowledged
                )
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Filter alerts for listing. `--min-severity` falls back to the configured
/// alert threshold.
fn select(alerts: Vec<Alert>, args: &AlertListArgs, threshold: Severity) -> Vec<Alert> {
    let mut view = AlertsView::new(AlertFilter {
        search: args.search.clone().unwrap_or_default(),
        severity: args.severity,
        alert_type: args.alert_type,
        show_acknowledged: !args.unacknowledged,
        min_severity: args.min_severity.unwrap_or(threshold),
    });
    view.set_source(alerts);

    let mut rows = view.filtered().to_vec();
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedwatch_core::MockGenerator;

    fn args() -> AlertListArgs {
        AlertListArgs {
            search: None,
            severity: None,
            alert_type: None,
            unacknowledged: false,
            min_severity: None,
            limit: None,
        }
    }

    fn sample() -> Vec<Alert> {
        MockGenerator::new(Some(9)).generate_alerts(chrono::Utc::now())
    }

    #[test]
    fn threshold_applies_when_flag_missing() {
        let rows = select(sample(), &args(), Severity::High);
        assert!(rows.iter().all(|a| a.severity >= Severity::High));
    }

    #[test]
    fn flag_overrides_threshold() {
        let alerts = sample();
        let all = alerts.len();
        let rows = select(
            alerts,
            &AlertListArgs {
                min_severity: Some(Severity::Low),
                ..args()
            },
            Severity::Critical,
        );
        assert_eq!(rows.len(), all);
    }

    #[test]
    fn limit_and_unacknowledged() {
        let rows = select(
            sample(),
            &AlertListArgs {
                unacknowledged: true,
                limit: Some(3),
                ..args()
            },
            Severity::Low,
        );
        assert!(rows.len() <= 3);
        assert!(rows.iter().all(|a| !a.is_acknowledged));
    }
}
