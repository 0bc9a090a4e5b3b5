use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use lrukit::policy::lru::LruCore;
use lrukit::policy::lru_k::LrukCore;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
enum Workload {
    Uniform,
    Hotset { hot_fraction: f64, hot_prob: f64 },
    Scan,
}

fn next_key(workload: Workload, rng: &mut SmallRng, universe: u64, step: u64) -> u64 {
    match workload {
        Workload::Uniform => rng.gen_range(0..universe),
        Workload::Hotset {
            hot_fraction,
            hot_prob,
        } => {
            let hot = ((universe as f64 * hot_fraction) as u64).max(1);
            if rng.gen_bool(hot_prob) {
                rng.gen_range(0..hot)
            } else {
                rng.gen_range(hot..universe)
            }
        },
        Workload::Scan => step % universe,
    }
}

fn bench_lru_k_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_k_policy");
    let ops_per_iter = 1024u64 * 2;
    group.throughput(Throughput::Elements(ops_per_iter));
    group.bench_function("insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = LrukCore::new(1024, 2048, 2);
                for i in 0..1024u64 {
                    cache.put(i, i);
                    cache.put(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..1024u64 {
                    cache.put(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_lru_k_promotion_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_k_policy");
    group.throughput(Throughput::Elements(4096 * 2));
    group.bench_function("promotion_churn", |b| {
        b.iter_batched(
            || LrukCore::new(1024, 2048, 2),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.put(std::hint::black_box(i), i);
                    cache.put(std::hint::black_box(i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_lru_k_history_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_k_policy");
    group.throughput(Throughput::Elements(4096));
    group.bench_function("history_churn", |b| {
        b.iter_batched(
            || LrukCore::new(1024, 1024, 2),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.put(std::hint::black_box(i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_lru_k_get_hit_ns(c: &mut Criterion) {
    c.bench_function("lru_k_get_hit_ns", |b| {
        b.iter_custom(|iters| {
            let capacity = 16_384u64;
            let mut cache = LrukCore::new(capacity as usize, capacity as usize, 2);
            for i in 0..capacity {
                cache.put(i, i);
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

#[derive(Debug, Clone, Copy, Default)]
struct HitRate {
    hits: u64,
    misses: u64,
}

impl HitRate {
    fn hit_rate(self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

const OPERATIONS: u64 = 200_000;
const UNIVERSE: u64 = 16_384;

/// Lookup, insert on miss.
fn run_lru_k(workload: Workload) -> HitRate {
    let mut cache = LrukCore::new(4096, 8192, 2);
    let mut rng = SmallRng::seed_from_u64(42);
    let mut stats = HitRate::default();
    for step in 0..OPERATIONS {
        let key = next_key(workload, &mut rng, UNIVERSE, step);
        if cache.get(&key).is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
            cache.put(key, key);
        }
    }
    stats
}

fn run_lru(workload: Workload) -> HitRate {
    let mut cache = LruCore::new(4096);
    let mut rng = SmallRng::seed_from_u64(42);
    let mut stats = HitRate::default();
    for step in 0..OPERATIONS {
        let key = next_key(workload, &mut rng, UNIVERSE, step);
        if cache.get(&key).is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
            cache.insert(key, key);
        }
    }
    stats
}

fn bench_workload_hit_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("workload_hit_rate");
    group.throughput(Throughput::Elements(OPERATIONS));

    let specs = [
        ("uniform", Workload::Uniform),
        (
            "hotset_90_10",
            Workload::Hotset {
                hot_fraction: 0.1,
                hot_prob: 0.9,
            },
        ),
        ("scan", Workload::Scan),
    ];

    println!("{:<14} {:>10} {:>10}", "workload", "lru_k", "lru");
    for (name, workload) in specs {
        // Seeded runs are deterministic, so one pass gives the ratio
        println!(
            "{:<14} {:>9.2}% {:>9.2}%",
            name,
            run_lru_k(workload).hit_rate() * 100.0,
            run_lru(workload).hit_rate() * 100.0
        );

        group.bench_function(format!("lru_k/{name}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                for _ in 0..iters {
                    let _ = std::hint::black_box(run_lru_k(workload).hit_rate());
                }
                start.elapsed()
            })
        });

        group.bench_function(format!("lru/{name}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                for _ in 0..iters {
                    let _ = std::hint::black_box(run_lru(workload).hit_rate());
                }
                start.elapsed()
            })
        });
    }

    group.finish();
}

criterion_group!(
    end_to_end,
    bench_lru_k_insert_get,
    bench_lru_k_promotion_churn,
    bench_lru_k_history_churn
);
criterion_group!(micro_ops, bench_lru_k_get_hit_ns);
criterion_group!(workloads, bench_workload_hit_rate);
criterion_main!(end_to_end, micro_ops, workloads);
