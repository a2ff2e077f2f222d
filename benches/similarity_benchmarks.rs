use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use labscape::{build_view, compute_edges, Entity, EntityId, GraphConfig, VectorSpace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic corpus with a Zipf-like vocabulary: a few common terms, a long tail of rare ones
fn corpus(size: usize) -> Vec<Entity> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    (0..size)
        .map(|i| {
            let words = rng.gen_range(3..15);
            let text: Vec<String> = (0..words)
                .map(|_| {
                    let rank = (rng.gen::<f64>().powi(3) * 2000.0) as usize;
                    format!("term{rank}")
                })
                .collect();
            Entity::new(format!("lab{i}"), text.join(" "))
        })
        .collect()
}

/// Benchmark vector space construction
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_space_build");

    for size in [100, 1000, 5000].iter() {
        let entities = corpus(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let space = VectorSpace::build(&entities);
                criterion::black_box(space.vocabulary_size());
            });
        });
    }
    group.finish();
}

/// Benchmark inverted-index edge computation over the whole corpus
fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_edges");

    for size in [100, 1000, 3000].iter() {
        let space = VectorSpace::build(&corpus(*size));
        let ids: Vec<EntityId> = space.entity_ids().cloned().collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let edges = compute_edges(&space, &ids, 0.15);
                criterion::black_box(edges.len());
            });
        });
    }
    group.finish();
}

/// Benchmark a full view (edges, top-K, Louvain) over half the corpus
fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_view");
    let config = GraphConfig::default();

    for size in [100, 1000].iter() {
        let space = VectorSpace::build(&corpus(*size));
        let ids: Vec<EntityId> = space.entity_ids().step_by(2).cloned().collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let view = build_view(&space, &ids, &config);
                criterion::black_box(view.graph.edge_count());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_edges, bench_view);
criterion_main!(benches);
