//! Benchmarks for matrix construction and the three reducers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skelred::{drg, drgep, pfa, CsrBuilder, CsrMatrix, Global};

/// Deterministic LCG so runs are comparable without a rand dependency.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    fn coef(&mut self) -> f64 {
        // Uniform in (0, 1], quantized to keep the matrix texture stable.
        ((self.next() >> 11) % 1000 + 1) as f64 / 1000.0
    }
}

/// A sparse random digraph with roughly `degree` out-edges per vertex.
fn random_matrix(n: usize, degree: usize, seed: u64) -> CsrMatrix {
    let mut rng = Lcg(seed);
    let mut builder = CsrBuilder::new(n).unwrap();
    let mut row = vec![0.0; n];
    for from in 0..n {
        row.iter_mut().for_each(|v| *v = 0.0);
        for _ in 0..degree {
            let to = (rng.next() as usize) % n;
            if to != from {
                row[to] = rng.coef();
            }
        }
        builder.add_row(from, &row).unwrap();
    }
    builder.finalize()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(random_matrix(n, 8, 0x5EED)));
        });
    }
    group.finish();
}

fn bench_reducers(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    for &n in &[1_000usize, 10_000] {
        let sources: Vec<usize> = (0..n / 100).map(|i| i * 97 % n).collect();

        group.bench_with_input(BenchmarkId::new("drg", n), &n, |b, &n| {
            b.iter_batched(
                || random_matrix(n, 8, 0x5EED),
                |mut matrix| drg(&mut matrix, &sources, 0.25, Global).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });

        let matrix = random_matrix(n, 8, 0x5EED);
        group.bench_with_input(BenchmarkId::new("drgep", n), &n, |b, _| {
            b.iter(|| drgep(&matrix, black_box(&sources), 0.25, Global).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("pfa", n), &n, |b, _| {
            b.iter(|| pfa(&matrix, black_box(&sources), 0.25, Global).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_reducers);
criterion_main!(benches);
