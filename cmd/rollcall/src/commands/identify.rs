//! Identify command.

use clap::Args;

use super::{load_embedding, open_roster, output_result, print_success, print_warning};
use crate::Cli;

/// Score an embedding against the catalog without writing anything.
///
/// Reports the best-scoring identity even below the threshold, which is the
/// data needed to calibrate thresholds offline.
#[derive(Args)]
pub struct IdentifyCommand {
    /// Threshold override (default: the configured identification threshold)
    #[arg(long)]
    threshold: Option<f32>,
}

impl IdentifyCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let raw = load_embedding(cli)?;
        let roster = open_roster(cli).await?;

        let threshold = self
            .threshold
            .unwrap_or(roster.config().identify_threshold);
        let result = roster.identify_with_threshold(&raw, threshold)?;

        match &result.matched {
            Some(record) => print_success(&format!(
                "Matched {} ({}) with score {:.3}",
                record.identity.name, record.identity.id, result.best_score
            )),
            None => print_warning(&format!(
                "No match at threshold {:.3}; best {} score {:.3} over {} records",
                threshold,
                result.best_id.as_deref().unwrap_or("-"),
                result.best_score,
                result.scanned
            )),
        }

        let out = serde_json::json!({
            "matched": result.is_match(),
            "matched_id": result.matched.as_ref().map(|r| r.identity.id.clone()),
            "matched_name": result.matched.as_ref().map(|r| r.identity.name.clone()),
            "best_id": result.best_id,
            "best_score": result.best_score,
            "threshold": threshold,
            "scanned": result.scanned,
        });
        output_result(&out, cli.output.as_deref(), cli.json)
    }
}
