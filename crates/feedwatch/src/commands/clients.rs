//! Client command handlers.

use tabled::Tabled;

use feedwatch_core::view::{format_size_mb, format_timestamp};
use feedwatch_core::{Client, ClientStatus, FeedApi};

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Feeds")]
    feeds: String,
    #[tabled(rename = "Transferred")]
    transferred: String,
    #[tabled(rename = "Last Activity")]
    last_activity: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl ClientRow {
    fn new(c: &Client, color: bool) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            feeds: format!("{}/{}", c.active_feeds, c.feeds_count),
            transferred: format_size_mb(c.total_transfer_mb),
            last_activity: format_timestamp(&c.last_activity),
            status: paint(c.status, color),
        }
    }
}

fn paint(status: ClientStatus, color: bool) -> String {
    use owo_colors::OwoColorize;

    let text = status.to_string();
    match (color, status) {
        (false, _) => text,
        (true, ClientStatus::Active) => text.truecolor(80, 250, 123).to_string(),
        (true, ClientStatus::Inactive) => text.truecolor(98, 114, 164).to_string(),
    }
}

pub async fn handle<A: FeedApi>(
    api: &A,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List => {
            let clients = api.get_clients().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &clients,
                |c| ClientRow::new(c, color),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
