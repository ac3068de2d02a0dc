//! `feedwatch-tui`: live terminal dashboard for feed monitoring.
//!
//! Built on [ratatui](https://ratatui.rs). Three screens (Dashboard, Feeds,
//! Alerts) poll the feed backend on their own schedule while visible; `,`
//! opens the settings editor, which writes the shared config file.
//!
//! Logs go to a file (default `/tmp/feedwatch-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use feedwatch_config::Config;
use feedwatch_core::{DatasetMode, LatencyProfile, MockFeedApi};

use crate::app::App;

/// Terminal dashboard for data feed monitoring.
#[derive(Parser, Debug)]
#[command(name = "feedwatch-tui", version, about)]
struct Cli {
    /// Seed for reproducible mock data (overrides config)
    #[arg(long, env = "FEEDWATCH_SEED")]
    seed: Option<u64>,

    /// Dataset lifetime: shared or regenerate (overrides config)
    #[arg(long)]
    dataset: Option<DatasetMode>,

    /// Skip the simulated backend latency
    #[arg(long)]
    no_latency: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/feedwatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity over the configured level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Writing to stdout/stderr would corrupt the TUI.
/// The returned guard must live as long as the app so logs are flushed.
fn setup_tracing(cli: &Cli, configured_level: &str) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => configured_level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "feedwatch_tui={log_level},feedwatch_core={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("feedwatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Load the shared config. A broken file falls back to defaults so the
/// dashboard still starts; the error is reported once logging is up.
fn load_config() -> (Config, Option<String>) {
    match feedwatch_config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    }
}

fn build_api(cli: &Cli, cfg: &Config) -> MockFeedApi {
    let mut api = cfg.to_runtime().api;
    if let Some(seed) = cli.seed {
        api.seed = Some(seed);
    }
    if let Some(dataset) = cli.dataset {
        api.dataset = dataset;
    }
    if cli.no_latency {
        api.latency = LatencyProfile::instant();
    }
    MockFeedApi::new(&api)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks before entering the terminal so init panics restore it too
    tui::install_hooks()?;

    let (config, config_error) = load_config();
    let _log_guard = setup_tracing(&cli, &config.advanced.log_level);

    if let Some(err) = &config_error {
        warn!(error = %err, "config invalid, using defaults");
    }

    let api = build_api(&cli, &config);
    info!(?api, "starting feedwatch-tui");

    let mut app = App::new(api, config, feedwatch_config::config_path());
    if let Some(err) = config_error {
        app.notify_startup(format!("Config ignored: {err}"));
    }
    app.run().await?;

    Ok(())
}
