use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::RosterError;
use crate::matcher::find_best_match;
use crate::types::{EnrollmentRecord, Identity};

/// Result of an enrollment attempt.
#[derive(Debug, Clone, Serialize)]
pub enum RegisterOutcome {
    /// A new record was created and published.
    Registered(EnrollmentRecord),

    /// An enrolled face already matches this one; nothing was written.
    /// `score` is the observed similarity, for logging and tuning.
    Duplicate { existing: Identity, score: f32 },
}

/// Enrolls identities, rejecting faces that already match an enrolled one.
#[derive(Debug)]
pub struct RegistrationGuard {
    catalog: Arc<Catalog>,
    threshold: f32,
}

impl RegistrationGuard {
    /// `threshold` is the duplicate-rejection similarity bound; stricter
    /// than the identification threshold used at check-in.
    pub fn new(catalog: Arc<Catalog>, threshold: f32) -> Self {
        Self { catalog, threshold }
    }

    /// Validates the raw vector, scans every enrolled record for a
    /// duplicate face, and writes a new enrollment only when nothing
    /// matches.
    ///
    /// The duplicate check and the write run inside one writer critical
    /// section, so two concurrent registrations of the same face cannot
    /// both pass the check and both insert.
    pub async fn register(
        &self,
        identity: Identity,
        raw: &[f32],
    ) -> Result<RegisterOutcome, RosterError> {
        let embedding = self.catalog.codec().normalize(raw)?;

        let _writer = self.catalog.writer_guard().await;
        let snapshot = self.catalog.snapshot();
        let result = find_best_match(&snapshot, &embedding, self.threshold);
        if let Some(existing) = result.matched {
            debug!(
                "Rejected enrollment of {}: duplicate of {} (score {:.3})",
                identity.id, existing.identity.id, result.best_score
            );
            return Ok(RegisterOutcome::Duplicate {
                existing: existing.identity,
                score: result.best_score,
            });
        }

        let record = EnrollmentRecord {
            identity,
            embedding,
            enrolled_at: Utc::now(),
        };
        self.catalog.commit_upsert(&record).await?;
        debug!("Enrolled {}", record.identity.id);
        Ok(RegisterOutcome::Registered(record))
    }
}
