use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lodecache::{CacheBuilder, DynCache, StatsListener, Strategy};
use std::sync::Arc;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for strategy in [Strategy::Fifo, Strategy::Lru] {
        group.bench_function(format!("get_hit_{}", strategy), |b| {
            let mut cache: DynCache<u64, Vec<u8>> =
                CacheBuilder::with_capacity(strategy, 1000).build();
            let data = vec![b'x'; 1024];

            // Pre-populate
            for id in 0..100u64 {
                cache.put(id, data.clone()).unwrap();
            }

            let mut counter = 0u64;
            b.iter(|| {
                black_box(cache.get(&(counter % 100)).unwrap());
                counter += 1;
            });
        });
    }

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write_evicting", |b| {
        let stats = Arc::new(StatsListener::new());
        let mut cache: DynCache<u64, u64> = CacheBuilder::with_capacity(Strategy::Lru, 100)
            .listener(stats.clone())
            .build();

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 150)).unwrap());
            } else {
                black_box(cache.put(counter, counter).ok());
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_cache_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_miss");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_miss", |b| {
        // Small cache
        let mut cache: DynCache<u64, u64> = CacheBuilder::with_capacity(Strategy::Lru, 10).build();

        // Pre-populate with more than cache size
        for id in 0..100u64 {
            cache.put(id, id).unwrap();
        }

        let mut counter = 0u64;
        b.iter(|| {
            // Keys below 90 were evicted
            black_box(cache.get(&(counter % 90)).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cached_get,
    bench_mixed_50_50,
    bench_cache_miss
);
criterion_main!(benches);
