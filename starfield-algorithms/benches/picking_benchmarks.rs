//! Benchmarks comparing BruteForcePicker vs IndexedPicker

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starfield_algorithms::{looking_down_negative_z, BruteForcePicker, IndexedPicker, PointPicker};
use starfield_core::{DatasetRegistry, Point3d, Point3f, PointDataset};

fn generate_catalog(size: usize) -> DatasetRegistry {
    let mut rng = StdRng::seed_from_u64(1234);
    let points = (0..size)
        .map(|_| {
            // Roughly shell-shaped, like a redshift survey
            let r = rng.gen_range(10.0f32..300.0);
            let theta = rng.gen_range(0.0f32..std::f32::consts::TAU);
            let z = rng.gen_range(-1.0f32..1.0);
            let s = (1.0 - z * z).sqrt();
            Point3f::new(r * s * theta.cos(), r * s * theta.sin(), r * z)
        })
        .collect();

    let mut registry = DatasetRegistry::new();
    registry
        .insert(PointDataset::new("2MRS", points))
        .expect("fresh registry");
    registry
}

fn bench_picking(c: &mut Criterion) {
    let sizes = [10_000, 100_000, 500_000];
    let ray = looking_down_negative_z(
        Point3d::new(0.0, 0.0, 60.0),
        90f64.to_radians(),
        16.0 / 9.0,
        (0.1, -0.2),
    );

    let mut group = c.benchmark_group("picking");

    for &size in &sizes {
        let registry = generate_catalog(size);

        group.bench_with_input(BenchmarkId::new("brute_force", size), &registry, |b, registry| {
            let mut picker = BruteForcePicker::new();
            b.iter(|| black_box(picker.pick(black_box(&ray), registry)))
        });

        let mut indexed = IndexedPicker::new();
        indexed.prepare(&registry);
        group.bench_with_input(BenchmarkId::new("indexed", size), &registry, |b, registry| {
            b.iter(|| black_box(indexed.pick(black_box(&ray), registry)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_picking);
criterion_main!(benches);
