//! Redb-backed persistent store implementation.

use std::path::Path;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};

use crate::store::{AttendanceStore, StoreError};
use crate::types::{AttendanceEvent, EnrollmentRecord};

const ENROLLMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("enrollments");
const EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("events");

/// Key for one event in the events table.
/// Format: `{identity_id}:{ts_us_20d}` — the timestamp is zero-padded to 20
/// decimal digits so lexicographic order matches time order per identity.
fn event_key(identity_id: &str, ts_us: i64) -> String {
    format!("{identity_id}:{ts_us:020}")
}

/// Prefix selecting all events of one identity.
fn event_prefix(identity_id: &str) -> String {
    format!("{identity_id}:")
}

/// Persistent [`AttendanceStore`] backed by redb.
///
/// Enrollment records are keyed by identity id, events by identity id plus
/// timestamp. Values are msgpack-encoded.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Opens or creates a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Create the tables if they don't exist.
        let tx = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(ENROLLMENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            let _ = tx
                .open_table(EVENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self { db })
    }
}

#[async_trait]
impl AttendanceStore for RedbStore {
    async fn load_all(&self) -> Result<Vec<EnrollmentRecord>, StoreError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(ENROLLMENTS)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let mut records = Vec::new();
        for item in table.iter().map_err(|e| StoreError::Storage(e.to_string()))? {
            let (_, value) = item.map_err(|e| StoreError::Storage(e.to_string()))?;
            let record: EnrollmentRecord = rmp_serde::from_slice(value.value())
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }

    async fn write(&self, record: &EnrollmentRecord) -> Result<(), StoreError> {
        let data = rmp_serde::to_vec_named(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(ENROLLMENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(record.identity.id.as_str(), data.as_slice())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, identity_id: &str) -> Result<(), StoreError> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(ENROLLMENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .remove(identity_id)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn load_latest_event(
        &self,
        identity_id: &str,
    ) -> Result<Option<AttendanceEvent>, StoreError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(EVENTS)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        // Keys iterate in ascending order, so the last key under the prefix
        // is the newest event.
        let prefix = event_prefix(identity_id);
        let mut latest: Option<Vec<u8>> = None;
        for item in table.iter().map_err(|e| StoreError::Storage(e.to_string()))? {
            let (key, value) = item.map_err(|e| StoreError::Storage(e.to_string()))?;
            if key.value().starts_with(&prefix) {
                latest = Some(value.value().to_vec());
            }
        }

        match latest {
            Some(data) => {
                let event = rmp_serde::from_slice(&data)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    async fn write_event(&self, event: &AttendanceEvent) -> Result<(), StoreError> {
        let data = rmp_serde::to_vec_named(event)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let key = event_key(&event.identity_id, event.recorded_at.timestamp_micros());

        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(EVENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(key.as_str(), data.as_slice())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn load_recent_events(&self, limit: usize) -> Result<Vec<AttendanceEvent>, StoreError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(EVENTS)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let mut events: Vec<AttendanceEvent> = Vec::new();
        for item in table.iter().map_err(|e| StoreError::Storage(e.to_string()))? {
            let (_, value) = item.map_err(|e| StoreError::Storage(e.to_string()))?;
            let event = rmp_serde::from_slice(value.value())
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            events.push(event);
        }

        events.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        events.truncate(limit);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;
    use chrono::{Duration, Utc};
    use rollcall_embedding::EmbeddingCodec;
    use tempfile::tempdir;

    fn record(id: &str, raw: &[f32]) -> EnrollmentRecord {
        let codec = EmbeddingCodec::new(raw.len());
        EnrollmentRecord {
            identity: Identity::new(id, format!("Person {id}")),
            embedding: codec.normalize(raw).unwrap(),
            enrolled_at: Utc::now(),
        }
    }

    fn event(id: &str, age: Duration) -> AttendanceEvent {
        AttendanceEvent {
            identity_id: id.into(),
            name: format!("Person {id}"),
            recorded_at: Utc::now() - age,
            class_name: Some("10A".into()),
            grade: None,
        }
    }

    #[tokio::test]
    async fn record_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        let rec = record("s1", &[1.0, 2.0, 2.0]);
        store.write(&rec).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].identity, rec.identity);
        assert_eq!(all[0].embedding, rec.embedding);
        assert_eq!(all[0].enrolled_at, rec.enrolled_at);
    }

    #[tokio::test]
    async fn write_replaces_same_id() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.write(&record("s1", &[1.0, 0.0, 0.0])).await.unwrap();
        store.write(&record("s1", &[0.0, 1.0, 0.0])).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!((all[0].embedding.as_slice()[1] - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn delete_removes() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.write(&record("s1", &[1.0, 0.0])).await.unwrap();
        store.delete("s1").await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());

        // Unknown id is fine.
        store.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn latest_event_is_newest_for_identity() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.write_event(&event("s1", Duration::minutes(30))).await.unwrap();
        store.write_event(&event("s1", Duration::minutes(5))).await.unwrap();
        store.write_event(&event("s2", Duration::zero())).await.unwrap();

        let latest = store.load_latest_event("s1").await.unwrap().unwrap();
        assert!(Utc::now() - latest.recorded_at < Duration::minutes(6));

        assert!(store.load_latest_event("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_events_ordered_and_limited() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.write_event(&event("a", Duration::minutes(3))).await.unwrap();
        store.write_event(&event("b", Duration::minutes(1))).await.unwrap();
        store.write_event(&event("c", Duration::minutes(2))).await.unwrap();

        let recent = store.load_recent_events(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].identity_id, "b");
        assert_eq!(recent[1].identity_id, "c");
    }

    #[tokio::test]
    async fn reopen_preserves_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.write(&record("s1", &[0.5, 0.5])).await.unwrap();
            store.write_event(&event("s1", Duration::zero())).await.unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.load_all().await.unwrap().len(), 1);
        assert!(store.load_latest_event("s1").await.unwrap().is_some());
    }
}
