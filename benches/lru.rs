use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use lrukit::policy::lru::{LruCache, LruCore};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

fn bench_lru_insert_get(c: &mut Criterion) {
    c.bench_function("lru_insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_pop_lru(c: &mut Criterion) {
    c.bench_function("lru_pop_lru", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for _ in 0..1024u64 {
                    let _ = std::hint::black_box(cache.pop_lru());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_touch_hotset(c: &mut Criterion) {
    c.bench_function("lru_touch_hotset", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(4096);
                for i in 0..4096u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(cache.touch(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_cache_get_hit_ns(c: &mut Criterion) {
    c.bench_function("lru_cache_get_hit_ns", |b| {
        b.iter_custom(|iters| {
            let capacity = 16_384u64;
            let cache = LruCache::new(capacity as usize);
            for i in 0..capacity {
                cache.put(i, i);
            }
            let start = Instant::now();
            for i in 0..iters {
                let _ = std::hint::black_box(cache.get(&(i % capacity)));
            }
            start.elapsed()
        })
    });
}

fn bench_lru_cache_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_cache_contended");
    let threads = 4usize;
    let ops_per_thread = 10_000u64;
    group.throughput(Throughput::Elements(threads as u64 * ops_per_thread));
    group.bench_function("mixed_4_threads", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::default();
            for _ in 0..iters {
                let cache: LruCache<u64, u64> = LruCache::new(1024);
                let barrier = Arc::new(Barrier::new(threads + 1));
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let cache = cache.clone();
                        let barrier = barrier.clone();
                        thread::spawn(move || {
                            barrier.wait();
                            for i in 0..ops_per_thread {
                                let key = (i * 7 + t as u64) % 2048;
                                if i % 4 == 0 {
                                    cache.put(key, i);
                                } else {
                                    let _ = std::hint::black_box(cache.get(&key));
                                }
                            }
                        })
                    })
                    .collect();
                barrier.wait();
                let start = Instant::now();
                for handle in handles {
                    let _ = handle.join();
                }
                total += start.elapsed();
            }
            total
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_lru_insert_get,
    bench_lru_pop_lru,
    bench_lru_eviction_churn,
    bench_lru_touch_hotset
);
criterion_group!(handles, bench_lru_cache_get_hit_ns, bench_lru_cache_contended);
criterion_main!(benches, handles);
