//! Benchmarks for 64-bit modular field operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use decs_engine::field::{add_mod, mul_add_mod, mul_mod, sub_mod};

const Q: u64 = (1u64 << 32) - (1u64 << 20) + 1;

fn bench_add(c: &mut Criterion) {
    let a = Q - 12345;
    let b = Q - 67890;
    c.bench_function("field_add_mod", |bench| bench.iter(|| add_mod(black_box(a), black_box(b), black_box(Q))));
}

fn bench_sub(c: &mut Criterion) {
    let a = 12345u64;
    let b = 67890u64;
    c.bench_function("field_sub_mod", |bench| bench.iter(|| sub_mod(black_box(a), black_box(b), black_box(Q))));
}

fn bench_mul(c: &mut Criterion) {
    let a = Q - 1;
    let b = Q - 2;
    c.bench_function("field_mul_mod", |bench| bench.iter(|| mul_mod(black_box(a), black_box(b), black_box(Q))));
}

fn bench_mul_add(c: &mut Criterion) {
    let (acc, a, b) = (42u64, 12345u64, 67890u64);
    c.bench_function("field_mul_add_mod", |bench| {
        bench.iter(|| mul_add_mod(black_box(acc), black_box(a), black_box(b), black_box(Q)))
    });
}

fn bench_accumulate_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_accumulate_row");
    for r in [4usize, 16, 64] {
        let gamma: Vec<u64> = (0..r as u64).map(|i| (i * 97 + 1) % Q).collect();
        let pvals: Vec<u64> = (0..r as u64).map(|i| (i * 31 + 5) % Q).collect();
        group.bench_with_input(BenchmarkId::new("r", r), &r, |bench, _| {
            bench.iter(|| {
                let mut acc = 0u64;
                for j in 0..r {
                    acc = mul_add_mod(acc, black_box(gamma[j]), black_box(pvals[j]), Q);
                }
                acc
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_sub, bench_mul, bench_mul_add, bench_accumulate_row);
criterion_main!(benches);
