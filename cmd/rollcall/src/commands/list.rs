//! List command.

use clap::Args;

use super::{open_roster, output_result, print_success};
use crate::Cli;

/// List enrolled identities.
#[derive(Args)]
pub struct ListCommand {
    /// Filter by display name (case-insensitive substring)
    #[arg(long)]
    name: Option<String>,
}

impl ListCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let roster = open_roster(cli).await?;
        let snapshot = roster.snapshot();

        let records: Vec<_> = match self.name.as_deref() {
            Some(query) => snapshot.find_by_name(query),
            None => snapshot.records().iter().collect(),
        };

        print_success(&format!(
            "Found {} enrolled identit{}",
            records.len(),
            if records.len() == 1 { "y" } else { "ies" }
        ));

        // Rows without the embedding vectors; 512 floats per line helps nobody.
        let rows: Vec<_> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.identity.id,
                    "name": r.identity.name,
                    "class": r.identity.profile.class_name,
                    "grade": r.identity.profile.grade,
                    "enrolled_at": r.enrolled_at,
                })
            })
            .collect();
        output_result(&rows, cli.output.as_deref(), cli.json)
    }
}
