use bloom_search::experiment::random_word;
use bloom_search::{BloomFilter, StrategyKind};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SET_SIZE: usize = 10_000;
const BITS_PER_ELEMENT: usize = 8;

fn words(seed: u64, n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| random_word(&mut rng, 12)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let keys = words(1, SET_SIZE);
    let mut group = c.benchmark_group("insert");

    for kind in [StrategyKind::Deterministic, StrategyKind::Randomized] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &keys, |b, keys| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(7);
                let mut filter =
                    BloomFilter::with_rng(SET_SIZE, BITS_PER_ELEMENT, kind, &mut rng).unwrap();
                for key in keys {
                    filter.insert(key);
                }
                black_box(filter.count())
            })
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let keys = words(1, SET_SIZE);
    let probes = words(2, SET_SIZE);
    let mut group = c.benchmark_group("query");

    for kind in [StrategyKind::Deterministic, StrategyKind::Randomized] {
        let mut rng = StdRng::seed_from_u64(7);
        let mut filter = BloomFilter::with_rng(SET_SIZE, BITS_PER_ELEMENT, kind, &mut rng).unwrap();
        for key in &keys {
            filter.insert(key);
        }

        group.bench_with_input(BenchmarkId::from_parameter(kind), &probes, |b, probes| {
            b.iter(|| probes.iter().filter(|probe| filter.query(probe)).count())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query);
criterion_main!(benches);
