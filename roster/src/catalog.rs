use std::sync::{Arc, RwLock};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use rollcall_embedding::EmbeddingCodec;

use crate::error::RosterError;
use crate::store::AttendanceStore;
use crate::types::EnrollmentRecord;

/// An immutable point-in-time view of every enrolled record.
///
/// Records are ordered by enrollment time (ties by identity id), which fixes
/// the scan order of [`find_best_match`](crate::find_best_match) and makes
/// match outcomes deterministic.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    version: u64,
    records: Vec<EnrollmentRecord>,
}

impl CatalogSnapshot {
    pub(crate) fn new(version: u64, mut records: Vec<EnrollmentRecord>) -> Self {
        records.sort_by(|a, b| {
            a.enrolled_at
                .cmp(&b.enrolled_at)
                .then_with(|| a.identity.id.cmp(&b.identity.id))
        });
        Self { version, records }
    }

    /// Monotonically increasing publish counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All records in enrollment order.
    pub fn records(&self) -> &[EnrollmentRecord] {
        &self.records
    }

    /// Looks up a record by identity id.
    pub fn get(&self, identity_id: &str) -> Option<&EnrollmentRecord> {
        self.records.iter().find(|r| r.identity.id == identity_id)
    }

    /// Case-insensitive substring search over display names.
    pub fn find_by_name(&self, query: &str) -> Vec<&EnrollmentRecord> {
        let q = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.identity.name.to_lowercase().contains(&q))
            .collect()
    }

    /// Number of enrolled records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is enrolled.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The authoritative, refreshable set of enrolled records.
///
/// Readers take cheap immutable snapshots and never block on I/O. Every
/// mutation runs under a single writer lock, writes through to the store,
/// then reloads and republishes — publish is one reference swap, so readers
/// never see partial state and a failed write leaves the previous snapshot
/// in place.
#[derive(Debug)]
pub struct Catalog {
    store: Arc<dyn AttendanceStore>,
    codec: EmbeddingCodec,
    current: RwLock<Arc<CatalogSnapshot>>,
    writer: Mutex<()>,
}

impl Catalog {
    /// Opens a catalog over the store and performs the initial load.
    pub async fn open(
        store: Arc<dyn AttendanceStore>,
        codec: EmbeddingCodec,
    ) -> Result<Self, RosterError> {
        let catalog = Self {
            store,
            codec,
            current: RwLock::new(Arc::new(CatalogSnapshot::new(0, Vec::new()))),
            writer: Mutex::new(()),
        };
        catalog.refresh().await?;
        Ok(catalog)
    }

    /// The codec every vector entering this catalog must pass.
    pub fn codec(&self) -> &EmbeddingCodec {
        &self.codec
    }

    /// Returns the current snapshot. O(1); never touches the store.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().unwrap().clone()
    }

    /// Reloads all records from the store and publishes a new snapshot.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, RosterError> {
        let _writer = self.writer.lock().await;
        self.reload().await
    }

    /// Writes one record through to the store, then republishes.
    pub async fn upsert(&self, record: EnrollmentRecord) -> Result<(), RosterError> {
        let _writer = self.writer.lock().await;
        self.commit_upsert(&record).await
    }

    /// Deletes a record by identity id, then republishes.
    pub async fn remove(&self, identity_id: &str) -> Result<(), RosterError> {
        let _writer = self.writer.lock().await;
        self.store.delete(identity_id).await?;
        self.reload().await?;
        debug!("Removed enrollment {}", identity_id);
        Ok(())
    }

    /// Replaces the embedding of an existing record from a newly captured
    /// vector (photo re-capture), keeping identity metadata and the original
    /// enrollment time.
    pub async fn update_embedding(
        &self,
        identity_id: &str,
        raw: &[f32],
    ) -> Result<EnrollmentRecord, RosterError> {
        let embedding = self.codec.normalize(raw)?;

        let _writer = self.writer.lock().await;
        let current = self.snapshot();
        let Some(existing) = current.get(identity_id) else {
            return Err(RosterError::UnknownIdentity(identity_id.to_string()));
        };

        let record = EnrollmentRecord {
            identity: existing.identity.clone(),
            embedding,
            enrolled_at: existing.enrolled_at,
        };
        self.commit_upsert(&record).await?;
        debug!("Replaced embedding for {}", identity_id);
        Ok(record)
    }

    /// Serializes a multi-step write sequence (check + commit) with every
    /// other writer.
    pub(crate) async fn writer_guard(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    /// Store write followed by republish. Caller must hold the writer lock.
    pub(crate) async fn commit_upsert(&self, record: &EnrollmentRecord) -> Result<(), RosterError> {
        self.store.write(record).await?;
        self.reload().await?;
        Ok(())
    }

    /// Loads the store contents and atomically swaps in a new snapshot.
    /// Caller must hold the writer lock.
    async fn reload(&self) -> Result<Arc<CatalogSnapshot>, RosterError> {
        let loaded = self.store.load_all().await?;
        let total = loaded.len();

        // Re-validate stored vectors; one corrupt row must not take the
        // whole catalog down.
        let mut records = Vec::with_capacity(total);
        for record in loaded {
            match self.codec.normalize(record.embedding.as_slice()) {
                Ok(embedding) => records.push(EnrollmentRecord { embedding, ..record }),
                Err(e) => {
                    warn!("Skipping stored record {}: {}", record.identity.id, e);
                }
            }
        }

        let next_version = self.current.read().unwrap().version() + 1;
        let snapshot = Arc::new(CatalogSnapshot::new(next_version, records));
        *self.current.write().unwrap() = snapshot.clone();
        debug!(
            "Published catalog snapshot v{} ({} records, {} skipped)",
            snapshot.version(),
            snapshot.len(),
            total - snapshot.len()
        );
        Ok(snapshot)
    }
}
