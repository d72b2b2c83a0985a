//! Import command.

use clap::Args;
use serde::Deserialize;

use rollcall_roster::{Identity, Profile, RegisterOutcome};

use super::{
    open_roster, output_result, print_error, print_success, print_warning, require_input_file,
};
use crate::Cli;

/// One entry of a roster import file.
#[derive(Debug, Deserialize)]
struct ImportEntry {
    id: String,
    name: String,

    #[serde(flatten)]
    profile: Profile,

    embedding: Vec<f32>,
}

/// Bulk-enroll identities from a roster file.
///
/// The -f file holds a list of entries, each with id, name, optional profile
/// fields, and the raw embedding vector. Entries run through the same
/// duplicate guard as single enrollment; failures are reported per entry and
/// do not stop the rest of the import.
#[derive(Args)]
pub struct ImportCommand {}

impl ImportCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let path = require_input_file(cli)?;
        let entries: Vec<ImportEntry> = super::load_request(path)?;
        let roster = open_roster(cli).await?;

        let total = entries.len();
        let mut enrolled = 0usize;
        let mut duplicates = 0usize;
        let mut failed = 0usize;

        for entry in entries {
            let identity = Identity {
                id: entry.id.clone(),
                name: entry.name.clone(),
                profile: entry.profile,
            };
            match roster.register(identity, &entry.embedding).await {
                Ok(RegisterOutcome::Registered(record)) => {
                    enrolled += 1;
                    print_success(&format!(
                        "Enrolled {} ({})",
                        record.identity.name, record.identity.id
                    ));
                }
                Ok(RegisterOutcome::Duplicate { existing, score }) => {
                    duplicates += 1;
                    print_warning(&format!(
                        "Skipped {}: duplicate of {} (score {:.3})",
                        entry.id, existing.id, score
                    ));
                }
                Err(e) => {
                    failed += 1;
                    print_error(&format!("Failed {}: {}", entry.id, e));
                }
            }
        }

        print_success(&format!(
            "Import done: {} enrolled, {} duplicates, {} failed of {}",
            enrolled, duplicates, failed, total
        ));

        let result = serde_json::json!({
            "total": total,
            "enrolled": enrolled,
            "duplicates": duplicates,
            "failed": failed,
        });
        output_result(&result, cli.output.as_deref(), cli.json)
    }
}
