//! Benchmarks for the evaluation-domain Merkle tree.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use decs_engine::merkle::{hash_leaf, hash_pair, verify_path, MerkleTree};

fn bench_hash_leaf(c: &mut Criterion) {
    let payload = vec![0u8; 64];
    c.bench_function("merkle_hash_leaf", |bench| bench.iter(|| hash_leaf(black_box(&payload))));
}

fn bench_hash_pair(c: &mut Criterion) {
    let left = hash_leaf(b"left");
    let right = hash_leaf(b"right");
    c.bench_function("merkle_hash_pair", |bench| bench.iter(|| hash_pair(black_box(&left), black_box(&right))));
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle_build_tree");
    for size in [16usize, 64, 256, 1024, 4096] {
        let leaves: Vec<Vec<u8>> = (0..size as u32).map(|i| i.to_le_bytes().to_vec()).collect();
        group.bench_with_input(BenchmarkId::new("leaves", size), &leaves, |bench, leaves| {
            bench.iter(|| MerkleTree::build(black_box(leaves)))
        });
    }
    group.finish();
}

fn bench_path_for(c: &mut Criterion) {
    let leaves: Vec<Vec<u8>> = (0..4096u32).map(|i| i.to_le_bytes().to_vec()).collect();
    let tree = MerkleTree::build(&leaves);

    c.bench_function("merkle_path_for", |bench| bench.iter(|| tree.path_for(black_box(2048))));
}

fn bench_verify_path(c: &mut Criterion) {
    let leaves: Vec<Vec<u8>> = (0..4096u32).map(|i| i.to_le_bytes().to_vec()).collect();
    let tree = MerkleTree::build(&leaves);
    let root = tree.root();
    let path = tree.path_for(2048);
    let leaf_hash = tree.leaf_hash(2048);

    c.bench_function("merkle_verify_path", |bench| {
        bench.iter(|| verify_path(black_box(&leaf_hash), black_box(&path), black_box(&root), black_box(2048)))
    });
}

fn bench_multi_open(c: &mut Criterion) {
    let leaves: Vec<Vec<u8>> = (0..4096u32).map(|i| i.to_le_bytes().to_vec()).collect();
    let tree = MerkleTree::build(&leaves);

    let mut group = c.benchmark_group("merkle_multi_open");
    for count in [8usize, 32, 128] {
        group.bench_with_input(BenchmarkId::new("challenged", count), &count, |bench, &count| {
            bench.iter(|| {
                for idx in 0..count {
                    black_box(tree.path_for(idx * 7 % tree.size()));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hash_leaf,
    bench_hash_pair,
    bench_build_tree,
    bench_path_for,
    bench_verify_path,
    bench_multi_open,
);
criterion_main!(benches);
