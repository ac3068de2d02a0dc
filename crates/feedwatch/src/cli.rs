//! Clap derive structures for the `feedwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use feedwatch_core::{AlertType, DatasetMode, FeedSort, FeedStatus, Severity};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// feedwatch -- monitor feed generation, transfers, and alerts
#[derive(Debug, Parser)]
#[command(
    name = "feedwatch",
    version,
    about = "Monitor data feed generation and transfer from the command line",
    long_about = "Inspect feeds, alerts, clients, and pipeline statistics.\n\n\
        Data comes from a simulated backend; use --seed for reproducible output\n\
        and --dataset to choose between a stable or per-request dataset.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FEEDWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Seed for reproducible mock data (overrides config)
    #[arg(long, env = "FEEDWATCH_SEED", global = true)]
    pub seed: Option<u64>,

    /// Dataset lifetime: shared (stable ids) or regenerate (new sample per request)
    #[arg(long, global = true)]
    pub dataset: Option<DatasetMode>,

    /// Skip the simulated backend latency
    #[arg(long, global = true)]
    pub no_latency: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect feeds
    #[command(alias = "f")]
    Feeds(FeedsArgs),

    /// List, summarize, and acknowledge alerts
    #[command(alias = "a")]
    Alerts(AlertsArgs),

    /// List clients receiving feeds
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Show the dashboard statistics snapshot
    Stats,

    /// Show daily feed performance for the last week
    #[command(alias = "perf")]
    Performance,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Feeds ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FeedsArgs {
    #[command(subcommand)]
    pub command: FeedsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeedsCommand {
    /// List feeds, ten per page
    #[command(alias = "ls")]
    List(FeedListArgs),

    /// Show one feed in detail
    Get {
        /// Feed ID (e.g. feed-007)
        feed: String,
    },

    /// Show feed counters (ignores filters)
    Summary,
}

#[derive(Debug, Args)]
pub struct FeedListArgs {
    /// Case-insensitive match on name, client, or ID
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only feeds with this status (active, inactive, error, pending)
    #[arg(long)]
    pub status: Option<FeedStatus>,

    /// Page number, starting at 1
    #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Show every matching feed instead of one page
    #[arg(long, short = 'a', conflicts_with = "page")]
    pub all: bool,

    /// Sort by id, name, status, size, or last_generated
    #[arg(long, default_value = "id")]
    pub sort: FeedSort,
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts, newest first
    #[command(alias = "ls")]
    List(AlertListArgs),

    /// Acknowledge an alert
    Ack {
        /// Alert ID (e.g. alert-007)
        alert: String,
    },

    /// Show alert counters (ignores filters)
    Summary,
}

#[derive(Debug, Args)]
pub struct AlertListArgs {
    /// Case-insensitive match on feed name, message, or client
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only alerts with exactly this severity (low, medium, high, critical)
    #[arg(long)]
    pub severity: Option<Severity>,

    /// Only alerts of this type (generation_delay, transfer_delay, failure, warning)
    #[arg(long = "type")]
    pub alert_type: Option<AlertType>,

    /// Hide acknowledged alerts
    #[arg(long, short = 'u')]
    pub unacknowledged: bool,

    /// Hide alerts below this severity (defaults to the configured threshold)
    #[arg(long)]
    pub min_severity: Option<Severity>,

    /// Show at most this many alerts
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients
    #[command(alias = "ls")]
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default settings
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Dot-separated key, e.g. "dashboard.refresh_interval"
        key: String,

        /// Value to set
        value: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
