//! Check-in command.

use clap::Args;

use rollcall_roster::CheckInOutcome;

use super::{load_embedding, open_roster, output_result, print_success, print_warning};
use crate::Cli;

/// Record a check-in from an embedding file.
///
/// The face is matched at the identification threshold; a match inside the
/// dedup window of its previous event is reported, not re-recorded.
#[derive(Args)]
pub struct CheckinCommand {}

impl CheckinCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let raw = load_embedding(cli)?;
        let roster = open_roster(cli).await?;

        match roster.check_in(&raw).await? {
            CheckInOutcome::Recorded(event) => {
                print_success(&format!(
                    "Recorded {} ({}) at {}",
                    event.name, event.identity_id, event.recorded_at
                ));
                output_result(&event, cli.output.as_deref(), cli.json)
            }
            CheckInOutcome::AlreadyRecorded { identity, previous } => {
                print_warning(&format!(
                    "Already recorded: {} ({}) checked in at {}",
                    identity.name, identity.id, previous
                ));

                let result = serde_json::json!({
                    "recorded": false,
                    "id": identity.id,
                    "previous": previous,
                });
                output_result(&result, cli.output.as_deref(), cli.json)
            }
            CheckInOutcome::Unrecognized { best_score } => {
                print_warning(&format!(
                    "Unrecognized face (best score {:.3})",
                    best_score
                ));

                let result = serde_json::json!({
                    "recorded": false,
                    "unrecognized": true,
                    "best_score": best_score,
                });
                output_result(&result, cli.output.as_deref(), cli.json)
            }
        }
    }
}
