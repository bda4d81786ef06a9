//! Criterion benchmarks for eventree-tree: tree growth and series scoring.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use eventree_tree::{ForestConfig, ThresholdSweep};

/// Random-walk series with events on large upward steps.
fn make_series(n_samples: usize, seed: u64) -> (Vec<i64>, Vec<u8>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut level = 0i64;
    let mut samples = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let step = rng.gen_range(-40..=40);
        level += step;
        samples.push(level);
        labels.push(u8::from(step > 25));
    }
    (samples, labels)
}

fn bench_train(c: &mut Criterion) {
    let (samples, labels) = make_series(5_000, 42);
    let cfg = ForestConfig::new(16).unwrap();

    c.bench_function("train_5000_samples_frame16", |b| {
        b.iter(|| cfg.fit(&samples, &labels).unwrap());
    });
}

fn bench_train_distinct(c: &mut Criterion) {
    let (samples, labels) = make_series(5_000, 42);
    let cfg = ForestConfig::new(16)
        .unwrap()
        .with_threshold_sweep(ThresholdSweep::DistinctValues);

    c.bench_function("train_5000_samples_frame16_distinct", |b| {
        b.iter(|| cfg.fit(&samples, &labels).unwrap());
    });
}

fn bench_score_series(c: &mut Criterion) {
    let (samples, labels) = make_series(5_000, 42);
    let forest = ForestConfig::new(16).unwrap().fit(&samples, &labels).unwrap();

    c.bench_function("score_series_5000_samples", |b| {
        b.iter(|| forest.score_series(&samples).unwrap());
    });
}

criterion_group!(benches, bench_train, bench_train_distinct, bench_score_series);
criterion_main!(benches);
