//! Benchmarks for domain construction and overlap detection.
//!
//! Measures radii computation, polygon construction at several resolutions,
//! pairwise detection and full scenario runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ship_domain::{
    build_domain_polygon, compute_radii, detect_overlap, KinematicSample, ScenarioConfig,
    ScenarioDriver, Track, VesselRegistry,
};
use std::f64::consts::PI;

fn bench_radii(c: &mut Criterion) {
    c.bench_function("compute_radii", |b| {
        b.iter(|| compute_radii(black_box(100.0), black_box(10.0)))
    });
}

fn bench_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_domain_polygon");
    let radii = compute_radii(100.0, 10.0).unwrap();

    for &n in &[10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| build_domain_polygon(black_box(0.0), black_box(0.0), &radii, 0.4, n))
        });
    }
    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_overlap");
    let radii = compute_radii(100.0, 10.0).unwrap();

    for &n in &[10, 100, 500] {
        let a = build_domain_polygon(0.0, 0.0, &radii, 0.0, n).unwrap();
        let b = build_domain_polygon(150.0, 700.0, &radii, PI + 0.2, n).unwrap();
        group.bench_with_input(BenchmarkId::new("head_on", n), &(a, b), |bench, (a, b)| {
            bench.iter(|| detect_overlap(black_box(a), black_box(b)))
        });
    }
    group.finish();
}

fn bench_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario");
    group.sample_size(10);

    let frames = 200;
    let registry: VesselRegistry = [("A", 120.0), ("B", 90.0)].into_iter().collect();
    let a = Track::new(
        "A",
        (0..frames)
            .map(|i| KinematicSample::planar(0.0, i as f64 * 20.0, 11.0, 0.0, i))
            .collect(),
    );
    let b = Track::new(
        "B",
        (0..frames)
            .map(|i| KinematicSample::planar(200.0, 5000.0 - i as f64 * 20.0, 13.0, 182.0, i))
            .collect(),
    );
    let driver = ScenarioDriver::new(registry, a, b, ScenarioConfig::default()).unwrap();

    group.bench_function("run", |bench| bench.iter(|| black_box(driver.run())));
    group.bench_function("run_parallel", |bench| {
        bench.iter(|| black_box(driver.run_parallel()))
    });
    group.finish();
}

criterion_group!(benches, bench_radii, bench_polygon, bench_detect, bench_scenario);
criterion_main!(benches);
