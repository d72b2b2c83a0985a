use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rollcall_embedding::EmbeddingCodec;
use rollcall_roster::{
    AttendanceStore, Catalog, EnrollmentRecord, Identity, MemoryStore, find_best_match,
};

fn random_unit_vec(dim: usize, seed: u64) -> Vec<f32> {
    let mut v = Vec::with_capacity(dim);
    let mut state = seed;
    for _ in 0..dim {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        v.push(((state >> 33) as f32) / (u32::MAX as f32) - 0.5);
    }
    let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let s = (1.0 / norm) as f32;
        for x in &mut v {
            *x *= s;
        }
    }
    v
}

async fn seeded_catalog(dim: usize, n: usize) -> Catalog {
    let codec = EmbeddingCodec::new(dim);
    let store = Arc::new(MemoryStore::new());
    for i in 0..n {
        let record = EnrollmentRecord {
            identity: Identity::new(format!("s-{i:05}"), format!("Person {i}")),
            embedding: codec.normalize(&random_unit_vec(dim, i as u64 + 1)).unwrap(),
            enrolled_at: Utc::now(),
        };
        store.write(&record).await.unwrap();
    }
    Catalog::open(store, codec).await.unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let dim = 512;
    let rt = tokio::runtime::Runtime::new().unwrap();
    let query = EmbeddingCodec::new(dim)
        .normalize(&random_unit_vec(dim, 9999))
        .unwrap();

    for n in [100usize, 1000] {
        let snapshot = rt.block_on(async { seeded_catalog(dim, n).await.snapshot() });

        c.bench_function(&format!("matcher_scan_512d_{n}records"), |b| {
            b.iter(|| {
                let _ = black_box(find_best_match(
                    black_box(&snapshot),
                    black_box(&query),
                    0.6,
                ));
            });
        });
    }
}

fn bench_snapshot_handoff(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let catalog = rt.block_on(seeded_catalog(512, 1000));

    c.bench_function("catalog_snapshot_handoff_1000records", |b| {
        b.iter(|| {
            let _ = black_box(catalog.snapshot());
        });
    });
}

criterion_group!(benches, bench_scan, bench_snapshot_handoff);
criterion_main!(benches);
