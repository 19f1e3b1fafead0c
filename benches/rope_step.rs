//! Benchmarks for rope stepping and ribbon building.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use tether::integrator::{integrate, integrate_serial};
use tether::solver::{solve, Pins};
use tether::{RopeConfig, RopeController, SegmentStore, StripMeshBuilder};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);
const GRAPPLE: Vec3 = Vec3::new(3.0, 8.0, -4.0);

fn attached(count: usize, iterations: u32) -> RopeController {
    let mut rope = RopeController::new(RopeConfig {
        segment_count: count,
        segment_length: 0.5,
        constraint_iterations: iterations,
        ..Default::default()
    })
    .unwrap();
    rope.attach_to(Vec3::ZERO, GRAPPLE);
    rope
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("rope_step");

    for count in [15, 64, 256, 1024] {
        group.bench_with_input(BenchmarkId::new("segments", count), &count, |b, &count| {
            let mut rope = attached(count, 5);
            let mut t = 0.0f32;
            b.iter(|| {
                t += 0.02;
                let launcher = Vec3::new(t.sin(), 0.0, t.cos());
                rope.step(black_box(0.02), GRAVITY, launcher);
            })
        });
    }

    for iterations in [1, 5, 20] {
        group.bench_with_input(
            BenchmarkId::new("iterations", iterations),
            &iterations,
            |b, &iterations| {
                let mut rope = attached(15, iterations);
                b.iter(|| rope.step(black_box(0.02), GRAVITY, Vec3::ZERO))
            },
        );
    }

    group.finish();
}

fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");

    for count in [64, 4096, 65_536] {
        let mut store = SegmentStore::along_line(Vec3::ZERO, GRAPPLE, 0.01, count);

        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, _| {
            b.iter(|| integrate(black_box(store.as_mut_slice()), GRAVITY, 0.02))
        });
        group.bench_with_input(BenchmarkId::new("serial", count), &count, |b, _| {
            b.iter(|| integrate_serial(black_box(store.as_mut_slice()), GRAVITY, 0.02))
        });
    }

    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let pins = Pins {
        anchor: Vec3::ZERO,
        grapple: GRAPPLE,
    };
    let mut store = SegmentStore::along_line(Vec3::ZERO, GRAPPLE, 0.5, 256);

    c.bench_function("solve_256x5", |b| {
        b.iter(|| solve(black_box(store.as_mut_slice()), pins, 0.5, 5))
    });
}

fn bench_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_mesh");

    for count in [15, 256, 4096] {
        let mut rope = attached(count, 5);
        rope.step(0.02, GRAVITY, Vec3::ZERO);
        let mut builder = StripMeshBuilder::new(0.1);

        group.bench_with_input(BenchmarkId::new("build", count), &count, |b, _| {
            b.iter(|| {
                let mesh = builder.build(rope.current_segments(), black_box(0.5), Vec3::ZERO);
                black_box(mesh.vertices.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_integrate, bench_solve, bench_mesh);
criterion_main!(benches);
