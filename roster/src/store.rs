use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AttendanceEvent, EnrollmentRecord};

/// Errors from durable-store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store: storage error: {0}")]
    Storage(String),

    #[error("store: serialization error: {0}")]
    Serialization(String),
}

/// Durable storage for enrollment records and attendance events.
///
/// The catalog is the only caller for enrollment data and the attendance
/// recorder the only caller for events; neither caches what the other owns.
/// Implementations must be safe for concurrent use.
///
/// Use [`MemoryStore`] for testing/ephemeral data and
/// [`RedbStore`](crate::RedbStore) for persistence.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Returns every stored enrollment record, in no particular order.
    async fn load_all(&self) -> Result<Vec<EnrollmentRecord>, StoreError>;

    /// Writes one record, replacing any existing record with the same
    /// identity id.
    async fn write(&self, record: &EnrollmentRecord) -> Result<(), StoreError>;

    /// Deletes the record with the given identity id.
    /// Deleting an unknown id is not an error.
    async fn delete(&self, identity_id: &str) -> Result<(), StoreError>;

    /// Returns the most recent event for the identity, if any.
    async fn load_latest_event(
        &self,
        identity_id: &str,
    ) -> Result<Option<AttendanceEvent>, StoreError>;

    /// Appends one attendance event.
    async fn write_event(&self, event: &AttendanceEvent) -> Result<(), StoreError>;

    /// Returns up to `limit` events, most recent first.
    async fn load_recent_events(&self, limit: usize) -> Result<Vec<AttendanceEvent>, StoreError>;
}

impl fmt::Debug for dyn AttendanceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttendanceStore {{ ... }}")
    }
}

/// In-memory [`AttendanceStore`] implementation.
/// Data is lost on restart. Suitable for testing or ephemeral use.
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

struct MemoryStoreInner {
    records: Vec<EnrollmentRecord>,
    events: Vec<AttendanceEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryStoreInner {
                records: Vec::new(),
                events: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<EnrollmentRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.records.clone())
    }

    async fn write(&self, record: &EnrollmentRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .records
            .iter_mut()
            .find(|r| r.identity.id == record.identity.id)
        {
            Some(slot) => *slot = record.clone(),
            None => inner.records.push(record.clone()),
        }
        Ok(())
    }

    async fn delete(&self, identity_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.records.retain(|r| r.identity.id != identity_id);
        Ok(())
    }

    async fn load_latest_event(
        &self,
        identity_id: &str,
    ) -> Result<Option<AttendanceEvent>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .events
            .iter()
            .filter(|e| e.identity_id == identity_id)
            .max_by_key(|e| e.recorded_at)
            .cloned())
    }

    async fn write_event(&self, event: &AttendanceEvent) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.push(event.clone());
        Ok(())
    }

    async fn load_recent_events(&self, limit: usize) -> Result<Vec<AttendanceEvent>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut events = inner.events.clone();
        events.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        events.truncate(limit);
        Ok(events)
    }
}
