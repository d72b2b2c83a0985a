//! Remove command.

use clap::Args;

use super::{open_roster, output_result, print_success, print_warning};
use crate::Cli;

/// Remove an enrolled identity.
#[derive(Args)]
pub struct RemoveCommand {
    /// Identity id to remove
    #[arg(long)]
    id: String,
}

impl RemoveCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let roster = open_roster(cli).await?;

        if roster.snapshot().get(&self.id).is_none() {
            print_warning(&format!("No enrollment found for {}", self.id));
        }
        roster.remove(&self.id).await?;
        print_success(&format!("Removed {}", self.id));

        let result = serde_json::json!({
            "id": self.id,
            "removed": true,
        });
        output_result(&result, cli.output.as_deref(), cli.json)
    }
}
