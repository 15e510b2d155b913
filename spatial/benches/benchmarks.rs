use common::{Body, BoundaryBox};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use spatial::{Tree, TreeConfig, TreeStorage};

fn random_bodies(count: usize) -> Vec<Body> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| Body::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect()
}

fn build_benchmark(c: &mut Criterion) {
    let bodies = random_bodies(1000);
    let mut storage = TreeStorage::new();
    let config = TreeConfig::new(2, 8).unwrap();

    c.bench_function("tree_build_free", |b| {
        b.iter(|| {
            let tree = Tree::build(&mut storage, black_box(&bodies), &config);
            black_box(tree.leaf_count());
            tree.free();
        })
    });
}

fn build_divider_benchmark(c: &mut Criterion) {
    let bodies = random_bodies(1000);
    let mut storage = TreeStorage::new();
    let config = TreeConfig::new(4, 16).unwrap();

    c.bench_function("tree_build_free_divider_4", |b| {
        b.iter(|| {
            let tree = Tree::build(&mut storage, black_box(&bodies), &config);
            black_box(tree.leaf_count());
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let bodies = random_bodies(1000);
    let mut storage = TreeStorage::new();
    let config = TreeConfig::new(2, 8).unwrap();
    let tree = Tree::build(&mut storage, &bodies, &config);
    let area = BoundaryBox::new(400.0, 600.0, 400.0, 600.0);

    c.bench_function("tree_query_rect", |b| {
        let mut found = Vec::new();
        b.iter(|| {
            found.clear();
            tree.query_rect(black_box(&area), &mut found);
        })
    });
}

fn candidate_pairs_benchmark(c: &mut Criterion) {
    let bodies = random_bodies(1000);
    let mut storage = TreeStorage::new();
    let config = TreeConfig::new(2, 8).unwrap();
    let tree = Tree::build(&mut storage, &bodies, &config);

    c.bench_function("tree_candidate_pairs", |b| {
        let mut pairs = Vec::new();
        b.iter(|| {
            pairs.clear();
            tree.candidate_pairs(&mut pairs);
            black_box(pairs.len());
        })
    });
}

criterion_group!(
    tree_benchmarks,
    build_benchmark,
    build_divider_benchmark,
    query_benchmark,
    candidate_pairs_benchmark
);
criterion_main!(tree_benchmarks);
