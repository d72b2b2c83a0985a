//! Enroll command.

use clap::Args;

use rollcall_roster::{Identity, Profile, RegisterOutcome};

use super::{load_embedding, open_roster, output_result, print_success, print_warning};
use crate::Cli;

/// Enroll a new identity from an embedding file.
///
/// Enrollment is rejected when an already-enrolled face matches the vector at
/// the registration threshold; the existing identity is reported instead.
#[derive(Args)]
pub struct EnrollCommand {
    /// Stable identity id (e.g. a student id)
    #[arg(long)]
    id: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Class name
    #[arg(long)]
    class: Option<String>,

    /// Sub-class
    #[arg(long)]
    sub_class: Option<String>,

    /// Grade
    #[arg(long)]
    grade: Option<String>,

    /// Sub-grade
    #[arg(long)]
    sub_grade: Option<String>,

    /// Program
    #[arg(long)]
    program: Option<String>,

    /// Role
    #[arg(long)]
    role: Option<String>,

    /// Photo reference (path or URL, stored as-is)
    #[arg(long)]
    photo: Option<String>,
}

impl EnrollCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let raw = load_embedding(cli)?;
        let roster = open_roster(cli).await?;

        let identity = Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            profile: Profile {
                class_name: self.class.clone(),
                sub_class: self.sub_class.clone(),
                grade: self.grade.clone(),
                sub_grade: self.sub_grade.clone(),
                program: self.program.clone(),
                role: self.role.clone(),
                photo: self.photo.clone(),
            },
        };

        match roster.register(identity, &raw).await? {
            RegisterOutcome::Registered(record) => {
                print_success(&format!(
                    "Enrolled {} ({})",
                    record.identity.name, record.identity.id
                ));

                let result = serde_json::json!({
                    "registered": true,
                    "id": record.identity.id,
                    "name": record.identity.name,
                    "enrolled_at": record.enrolled_at,
                });
                output_result(&result, cli.output.as_deref(), cli.json)
            }
            RegisterOutcome::Duplicate { existing, score } => {
                print_warning(&format!(
                    "Not enrolled: face already enrolled as {} ({}), score {:.3}",
                    existing.name, existing.id, score
                ));

                let result = serde_json::json!({
                    "registered": false,
                    "duplicate_of": existing.id,
                    "score": score,
                });
                output_result(&result, cli.output.as_deref(), cli.json)
            }
        }
    }
}
