use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use digestx::{Fnv1a64, Murmur3, Unseeded};
use mapx::HashMap;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_keys(n: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(0x6d61_7078);
    (0..n).map(|_| rng.gen()).collect()
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for n in [1_000_usize, 100_000] {
        let keys = random_keys(n);
        group.bench_with_input(BenchmarkId::new("murmur3", n), &keys, |b, keys| {
            b.iter_batched(
                HashMap::<u64, u64>::new,
                |mut m| {
                    for &k in keys {
                        m.insert(k, k);
                    }
                    m
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("fnv1a64", n), &keys, |b, keys| {
            b.iter_batched(
                || HashMap::<u64, u64, _>::with_hasher(Unseeded::<Fnv1a64>::new()),
                |mut m| {
                    for &k in keys {
                        m.insert(k, k);
                    }
                    m
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("std", n), &keys, |b, keys| {
            b.iter_batched(
                std::collections::HashMap::<u64, u64>::new,
                |mut m| {
                    for &k in keys {
                        m.insert(k, k);
                    }
                    m
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let keys = random_keys(100_000);
    let m: HashMap<u64, u64, Unseeded<Murmur3>> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function("hit", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % keys.len();
            black_box(m.get(&keys[i]))
        })
    });
    group.bench_function("miss", |b| {
        let mut k = 0_u64;
        b.iter(|| {
            k = k.wrapping_add(0x9e37_79b9_7f4a_7c15);
            black_box(m.get(&k))
        })
    });
    group.finish();
}

criterion_group!(benches, insert, lookup);
criterion_main!(benches);
