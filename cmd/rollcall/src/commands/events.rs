//! Events command.

use clap::Args;

use super::{open_roster, output_result, print_success};
use crate::Cli;

/// Show recent attendance events, newest first.
#[derive(Args)]
pub struct EventsCommand {
    /// Maximum number of events to show
    #[arg(long, default_value = "50")]
    limit: usize,
}

impl EventsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let roster = open_roster(cli).await?;

        let events = roster.recent_events(self.limit).await?;
        print_success(&format!("Found {} event(s)", events.len()));

        output_result(&events, cli.output.as_deref(), cli.json)
    }
}
