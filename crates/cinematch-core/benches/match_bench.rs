use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cinematch_core::reconcile::{AssetIndex, Reconciler};
use cinematch_core::{CatalogEntry, best_match, encode_vector};

const DIMENSIONS: usize = 1536;

fn synthetic_vector(seed: usize) -> Vec<f32> {
    (0..DIMENSIONS)
        .map(|i| (((seed * 31 + i * 17) % 97) as f32 - 48.0) / 48.0)
        .collect()
}

fn bench_cosine_scan(c: &mut Criterion) {
    let catalog: Vec<CatalogEntry> = (0..1000)
        .map(|i| {
            CatalogEntry::new(i as i64, format!("Movie {i}"))
                .with_embedding(encode_vector(&synthetic_vector(i)))
        })
        .collect();
    let query = synthetic_vector(4242);

    c.bench_function("cosine_scan_1000x1536", |b| {
        b.iter(|| best_match(black_box(&query), black_box(&catalog), DIMENSIONS));
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let reconciler = Reconciler::with_defaults().unwrap();
    let index = AssetIndex::new((0..500).map(|i| format!("m_Movie_Title_{i}.jpg")));

    let titles = vec![
        "The Matrix",
        "Amélie & Co.",
        "Lord of the Rings: The Return of the King",
        "Movie Title 250",
    ];

    c.bench_function("resolve_asset_exact", |b| {
        b.iter(|| reconciler.resolve_asset(black_box("Movie Title 250"), &index));
    });

    c.bench_function("resolve_asset_batch_4", |b| {
        b.iter(|| {
            for title in &titles {
                let _ = reconciler.resolve_asset(black_box(title), &index);
            }
        });
    });
}

criterion_group!(benches, bench_cosine_scan, bench_reconcile);
criterion_main!(benches);
