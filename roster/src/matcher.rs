use serde::Serialize;

use rollcall_embedding::Embedding;

use crate::catalog::CatalogSnapshot;
use crate::types::EnrollmentRecord;

/// Outcome of one best-match scan.
///
/// `best_score` and `best_id` are filled even when nothing clears the
/// threshold, so callers can log rejections and tune thresholds offline.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// The matched record, when the best score clears the threshold.
    pub matched: Option<EnrollmentRecord>,

    /// Highest similarity observed across the snapshot. 0.0 when the
    /// snapshot is empty.
    pub best_score: f32,

    /// Identity id of the highest-scoring record, matched or not.
    pub best_id: Option<String>,

    /// Number of records scanned.
    pub scanned: usize,
}

impl MatchResult {
    /// True when a record cleared the threshold.
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// Scans the snapshot for the record most similar to `query`.
///
/// Plain linear scan in enrollment order: catalogs in this domain hold at
/// most a few thousand records, so O(N) per query beats the correctness risk
/// of an approximate index. Ties keep the earliest-enrolled record, which
/// makes repeated queries deterministic. A best score exactly at `threshold`
/// counts as a match (inclusive). Never fails; an empty snapshot or a
/// below-threshold best both yield a no-match result.
pub fn find_best_match(
    snapshot: &CatalogSnapshot,
    query: &Embedding,
    threshold: f32,
) -> MatchResult {
    let mut best_score: f32 = -1.0;
    let mut best: Option<&EnrollmentRecord> = None;
    for record in snapshot.records() {
        let score = record.embedding.similarity(query);
        if best.is_none() || score > best_score {
            best_score = score;
            best = Some(record);
        }
    }

    match best {
        Some(record) if best_score >= threshold => MatchResult {
            matched: Some(record.clone()),
            best_score,
            best_id: Some(record.identity.id.clone()),
            scanned: snapshot.len(),
        },
        Some(record) => MatchResult {
            matched: None,
            best_score,
            best_id: Some(record.identity.id.clone()),
            scanned: snapshot.len(),
        },
        None => MatchResult {
            matched: None,
            best_score: 0.0,
            best_id: None,
            scanned: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;
    use chrono::{TimeZone, Utc};
    use rollcall_embedding::EmbeddingCodec;

    fn snapshot(entries: &[(&str, &[f32], i64)]) -> CatalogSnapshot {
        let records = entries
            .iter()
            .map(|(id, raw, ts)| {
                let codec = EmbeddingCodec::new(raw.len());
                EnrollmentRecord {
                    identity: Identity::new(*id, id.to_uppercase()),
                    embedding: codec.normalize(raw).unwrap(),
                    enrolled_at: Utc.timestamp_opt(*ts, 0).unwrap(),
                }
            })
            .collect();
        CatalogSnapshot::new(1, records)
    }

    fn query(raw: &[f32]) -> Embedding {
        EmbeddingCodec::new(raw.len()).normalize(raw).unwrap()
    }

    #[test]
    fn empty_snapshot_no_match() {
        let snap = CatalogSnapshot::new(1, Vec::new());
        let result = find_best_match(&snap, &query(&[1.0, 0.0, 0.0]), 0.5);
        assert!(!result.is_match());
        assert_eq!(result.best_score, 0.0);
        assert!(result.best_id.is_none());
        assert_eq!(result.scanned, 0);
    }

    #[test]
    fn picks_highest_score() {
        let snap = snapshot(&[
            ("a", &[1.0, 0.0, 0.0], 100),
            ("b", &[0.0, 1.0, 0.0], 200),
        ]);
        let result = find_best_match(&snap, &query(&[0.1, 0.99, 0.0]), 0.5);
        assert!(result.is_match());
        assert_eq!(result.matched.unwrap().identity.id, "b");
        assert_eq!(result.scanned, 2);
    }

    #[test]
    fn below_threshold_reports_best() {
        let snap = snapshot(&[("a", &[1.0, 0.0, 0.0], 100)]);
        // cos = 0.5 against the x axis.
        let result = find_best_match(&snap, &query(&[0.5, 0.8660254, 0.0]), 0.6);
        assert!(!result.is_match());
        assert_eq!(result.best_id.as_deref(), Some("a"));
        assert!((result.best_score - 0.5).abs() < 1e-5);
    }

    #[test]
    fn threshold_is_inclusive() {
        let snap = snapshot(&[("a", &[1.0, 0.0, 0.0, 0.0], 100)]);
        // (0.8, 0.6) is already unit length, so the score is exactly 0.8.
        let q = query(&[0.8, 0.6, 0.0, 0.0]);

        let at = find_best_match(&snap, &q, 0.8);
        assert!(at.is_match(), "score at threshold must match, got {}", at.best_score);

        let above = find_best_match(&snap, &q, 0.800001);
        assert!(!above.is_match(), "score below threshold must not match");
    }

    #[test]
    fn tie_breaks_to_earliest_enrolled() {
        // Same embedding, different enrollment times, inserted out of order.
        let snap = snapshot(&[
            ("later", &[1.0, 0.0, 0.0], 500),
            ("earlier", &[1.0, 0.0, 0.0], 100),
        ]);
        let result = find_best_match(&snap, &query(&[1.0, 0.0, 0.0]), 0.5);
        assert_eq!(result.matched.unwrap().identity.id, "earlier");
    }

    #[test]
    fn deterministic_across_calls() {
        let snap = snapshot(&[
            ("a", &[1.0, 0.1, 0.0], 100),
            ("b", &[1.0, 0.0, 0.1], 200),
        ]);
        let q = query(&[1.0, 0.05, 0.05]);

        let first = find_best_match(&snap, &q, 0.0);
        for _ in 0..3 {
            let again = find_best_match(&snap, &q, 0.0);
            assert_eq!(
                first.matched.as_ref().unwrap().identity.id,
                again.matched.as_ref().unwrap().identity.id
            );
            assert_eq!(first.best_score, again.best_score);
        }
    }

    #[test]
    fn opposite_vector_still_reported() {
        let snap = snapshot(&[("a", &[1.0, 0.0], 100)]);
        let result = find_best_match(&snap, &query(&[-1.0, 0.0]), 0.5);
        assert!(!result.is_match());
        assert_eq!(result.best_id.as_deref(), Some("a"));
        assert!((result.best_score + 1.0).abs() < 1e-6);
    }
}
