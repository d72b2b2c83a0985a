//! Rebind command.

use clap::Args;

use super::{load_embedding, open_roster, output_result, print_success};
use crate::Cli;

/// Replace an enrolled identity's embedding from a new capture.
///
/// Identity metadata and the enrollment time are preserved; only the face
/// vector changes. There is no duplicate check here: the operator has already
/// named which identity the new photo belongs to.
#[derive(Args)]
pub struct RebindCommand {
    /// Identity id to rebind
    #[arg(long)]
    id: String,
}

impl RebindCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let raw = load_embedding(cli)?;
        let roster = open_roster(cli).await?;

        let record = roster.update_embedding(&self.id, &raw).await?;
        print_success(&format!(
            "Rebound {} ({}) to new embedding",
            record.identity.name, record.identity.id
        ));

        let result = serde_json::json!({
            "id": record.identity.id,
            "name": record.identity.name,
            "enrolled_at": record.enrolled_at,
        });
        output_result(&result, cli.output.as_deref(), cli.json)
    }
}
