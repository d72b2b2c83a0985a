use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::RosterError;
use crate::matcher::find_best_match;
use crate::store::AttendanceStore;
use crate::types::{AttendanceEvent, Identity};

/// Result of a check-in attempt.
#[derive(Debug, Clone, Serialize)]
pub enum CheckInOutcome {
    /// A new event was recorded.
    Recorded(AttendanceEvent),

    /// The identity already has an event inside the dedup window;
    /// nothing was written.
    AlreadyRecorded {
        identity: Identity,
        previous: DateTime<Utc>,
    },

    /// No enrolled record cleared the identification threshold; nothing was
    /// written. `best_score` is the highest similarity observed, for tuning.
    Unrecognized { best_score: f32 },
}

/// Records attendance events, collapsing repeated recognitions of the same
/// person into one event per dedup window.
#[derive(Debug)]
pub struct AttendanceRecorder {
    catalog: Arc<Catalog>,
    store: Arc<dyn AttendanceStore>,
    threshold: f32,
    dedup_window: Duration,
}

impl AttendanceRecorder {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn AttendanceStore>,
        threshold: f32,
        dedup_window: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            threshold,
            dedup_window,
        }
    }

    /// Resolves the face against the current snapshot and records an event,
    /// unless one exists for the identity inside the dedup window.
    ///
    /// The matching scan runs lock-free over the immutable snapshot; only
    /// the read-latest/write-event pair is serialized with other writers,
    /// so two concurrent check-ins of the same person record exactly once.
    pub async fn check_in(&self, raw: &[f32]) -> Result<CheckInOutcome, RosterError> {
        let embedding = self.catalog.codec().normalize(raw)?;

        let snapshot = self.catalog.snapshot();
        let result = find_best_match(&snapshot, &embedding, self.threshold);
        let Some(record) = result.matched else {
            debug!(
                "Unrecognized face (best score {:.3} over {} records)",
                result.best_score, result.scanned
            );
            return Ok(CheckInOutcome::Unrecognized {
                best_score: result.best_score,
            });
        };

        let _writer = self.catalog.writer_guard().await;
        let now = Utc::now();
        if let Some(previous) = self.store.load_latest_event(&record.identity.id).await? {
            if now - previous.recorded_at <= self.dedup_window {
                debug!(
                    "Deduplicated check-in for {} (previous at {})",
                    record.identity.id, previous.recorded_at
                );
                return Ok(CheckInOutcome::AlreadyRecorded {
                    identity: record.identity,
                    previous: previous.recorded_at,
                });
            }
        }

        let event = AttendanceEvent {
            identity_id: record.identity.id.clone(),
            name: record.identity.name.clone(),
            recorded_at: now,
            class_name: record.identity.profile.class_name.clone(),
            grade: record.identity.profile.grade.clone(),
        };
        self.store.write_event(&event).await?;
        debug!(
            "Recorded attendance for {} (score {:.3})",
            event.identity_id, result.best_score
        );
        Ok(CheckInOutcome::Recorded(event))
    }

    /// Most recent events across all identities, newest first. Read-only;
    /// has no bearing on deduplication.
    pub async fn recent_events(&self, limit: usize) -> Result<Vec<AttendanceEvent>, RosterError> {
        Ok(self.store.load_recent_events(limit).await?)
    }
}
