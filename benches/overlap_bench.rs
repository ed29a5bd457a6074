use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use shiftboard::db;
use shiftboard::overlap::{find_conflicts, ResourceFilter, Window};
use shiftboard::search::{MemoryIndex, SearchMirror, SearchQuery};
use shiftboard::paging::PageRequest;
use shiftboard::store;
use shiftboard::types::Shift;
use sqlx::sqlite::SqlitePoolOptions;
use std::hint::black_box;
use tokio::runtime::Runtime;

/// `n` hour-long shifts spread over 50 cars and 80 drivers.
fn fleet(n: usize) -> Vec<Shift> {
    (0..n)
        .map(|i| {
            let i = i as i64;
            Shift { id: Some(i + 1), ..Shift::new(Some(i % 50), Some(i % 80), i * 600, i * 600 + 3600) }
        })
        .collect()
}

fn benchmark_in_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_conflicts");
    let filter = ResourceFilter::new(Some(7), Some(13));
    let window = Window::new(1_000_000, 1_003_600);

    for size in [1_000usize, 10_000, 100_000] {
        let shifts = fleet(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &shifts, |b, shifts| {
            b.iter(|| black_box(find_conflicts(shifts, black_box(&filter), black_box(window)).len()))
        });
    }
    group.finish();
}

fn benchmark_sql(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let pool = rt.block_on(async {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_db(&pool).await.unwrap();
        for shift in fleet(10_000) {
            store::shifts::insert(&pool, &shift).await.unwrap();
        }
        pool
    });

    let filter = ResourceFilter::new(Some(7), Some(13));
    c.bench_function("find_overlapping_sql_10k", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(
                    store::shifts::find_overlapping(&pool, &filter, Window::new(1_000_000, 1_003_600))
                        .await
                        .unwrap()
                        .len(),
                )
            })
        })
    });
}

fn benchmark_mirror_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let index: MemoryIndex<Shift> = MemoryIndex::new();
    rt.block_on(async {
        for shift in fleet(10_000) {
            index.index(&shift).await.unwrap();
        }
    });

    let query = SearchQuery::parse("car:7 AND safetyDriver:13").unwrap();
    c.bench_function("mirror_search_10k", |b| {
        b.iter(|| rt.block_on(async { black_box(index.search(&query, &PageRequest::new(0, 20)).await.unwrap().total) }))
    });
}

criterion_group!(benches, benchmark_in_memory, benchmark_sql, benchmark_mirror_search);
criterion_main!(benches);
