//! Command dispatch: bridges CLI args -> facade calls -> output formatting.

pub mod alerts;
pub mod clients;
pub mod config_cmd;
pub mod feeds;
pub mod stats;
pub mod util;

use feedwatch_core::FeedApi;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a data-bound command to the appropriate handler.
pub async fn dispatch<A: FeedApi>(
    cmd: Command,
    api: &A,
    global: &GlobalOpts,
    cfg: &crate::config::Config,
) -> Result<(), CliError> {
    match cmd {
        Command::Feeds(args) => feeds::handle(api, args, global).await,
        Command::Alerts(args) => alerts::handle(api, args, global, cfg).await,
        Command::Clients(args) => clients::handle(api, args, global).await,
        Command::Stats => stats::handle_stats(api, global).await,
        Command::Performance => stats::handle_performance(api, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
