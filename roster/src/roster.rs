use std::sync::Arc;

use rollcall_embedding::EmbeddingCodec;

use crate::attendance::{AttendanceRecorder, CheckInOutcome};
use crate::catalog::{Catalog, CatalogSnapshot};
use crate::config::RosterConfig;
use crate::error::RosterError;
use crate::matcher::{MatchResult, find_best_match};
use crate::register::{RegisterOutcome, RegistrationGuard};
use crate::store::AttendanceStore;
use crate::types::{AttendanceEvent, EnrollmentRecord, Identity};

/// Entry point wiring a catalog, registration guard, and attendance recorder
/// over one durable store.
///
/// The components stay independently constructible; this is the convenient
/// single handle an application holds for its lifetime.
#[derive(Debug)]
pub struct Roster {
    catalog: Arc<Catalog>,
    guard: RegistrationGuard,
    recorder: AttendanceRecorder,
    cfg: RosterConfig,
}

impl Roster {
    /// Validates the configuration, performs the initial catalog load, and
    /// wires the components.
    pub async fn open(
        store: Arc<dyn AttendanceStore>,
        cfg: RosterConfig,
    ) -> Result<Self, RosterError> {
        cfg.validate()?;
        let codec = EmbeddingCodec::new(cfg.dim);
        let catalog = Arc::new(Catalog::open(store.clone(), codec).await?);
        let guard = RegistrationGuard::new(catalog.clone(), cfg.register_threshold);
        let recorder = AttendanceRecorder::new(
            catalog.clone(),
            store,
            cfg.identify_threshold,
            cfg.dedup_window,
        );
        Ok(Self {
            catalog,
            guard,
            recorder,
            cfg,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.cfg
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Current catalog snapshot.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.catalog.snapshot()
    }

    /// Reloads the catalog from the store.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, RosterError> {
        self.catalog.refresh().await
    }

    /// Enrolls an identity; see [`RegistrationGuard::register`].
    pub async fn register(
        &self,
        identity: Identity,
        raw: &[f32],
    ) -> Result<RegisterOutcome, RosterError> {
        self.guard.register(identity, raw).await
    }

    /// Records a check-in; see [`AttendanceRecorder::check_in`].
    pub async fn check_in(&self, raw: &[f32]) -> Result<CheckInOutcome, RosterError> {
        self.recorder.check_in(raw).await
    }

    /// Diagnostics: scores a vector against the catalog with the
    /// identification threshold, writing nothing.
    pub fn identify(&self, raw: &[f32]) -> Result<MatchResult, RosterError> {
        self.identify_with_threshold(raw, self.cfg.identify_threshold)
    }

    /// [`identify`](Self::identify) with an explicit threshold, for offline
    /// threshold calibration.
    pub fn identify_with_threshold(
        &self,
        raw: &[f32],
        threshold: f32,
    ) -> Result<MatchResult, RosterError> {
        let embedding = self.catalog.codec().normalize(raw)?;
        Ok(find_best_match(&self.snapshot(), &embedding, threshold))
    }

    /// Replaces an enrolled identity's embedding (photo re-capture).
    pub async fn update_embedding(
        &self,
        identity_id: &str,
        raw: &[f32],
    ) -> Result<EnrollmentRecord, RosterError> {
        self.catalog.update_embedding(identity_id, raw).await
    }

    /// Writes a record through the catalog (metadata edits).
    pub async fn upsert(&self, record: EnrollmentRecord) -> Result<(), RosterError> {
        self.catalog.upsert(record).await
    }

    /// Removes an enrolled identity.
    pub async fn remove(&self, identity_id: &str) -> Result<(), RosterError> {
        self.catalog.remove(identity_id).await
    }

    /// Most recent attendance events, newest first.
    pub async fn recent_events(&self, limit: usize) -> Result<Vec<AttendanceEvent>, RosterError> {
        self.recorder.recent_events(limit).await
    }
}
