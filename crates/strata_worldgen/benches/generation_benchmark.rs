//! Benchmark for world generation.
//!
//! Run with: cargo bench --package strata_worldgen --bench generation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_noise::{NoiseFieldConfig, NoiseLibrary, WorldSeed};
use strata_worldgen::caves::smooth_pass;
use strata_worldgen::{GenerationParameters, WorldGenerator};

fn params(width: i32, height: i32) -> GenerationParameters {
    GenerationParameters {
        seed: WorldSeed::new(42),
        width,
        height,
        noise: NoiseLibrary::new().with_field(
            "surface",
            NoiseFieldConfig::default().with_amplitude(16.0).with_octaves(4),
        ),
        ..GenerationParameters::default()
    }
}

fn benchmark_default_world(c: &mut Criterion) {
    let generator = WorldGenerator::new(params(256, 256)).unwrap();

    let mut group = c.benchmark_group("world_generation");
    group.throughput(Throughput::Elements(256 * 256));
    group.bench_function("256x256_default", |b| {
        b.iter(|| black_box(generator.generate().unwrap()));
    });
    group.finish();
}

fn benchmark_wide_world(c: &mut Criterion) {
    let generator = WorldGenerator::new(params(1024, 256)).unwrap();

    let mut group = c.benchmark_group("world_generation");
    group.sample_size(10);
    group.throughput(Throughput::Elements(1024 * 256));
    group.bench_function("1024x256_default", |b| {
        b.iter(|| black_box(generator.generate().unwrap()));
    });
    group.finish();
}

fn benchmark_smoothing_pass(c: &mut Criterion) {
    let params = GenerationParameters {
        caves_smoothing_passes: 0,
        ..params(256, 256)
    };
    let world = WorldGenerator::new(params.clone()).unwrap().generate().unwrap();
    let wall = params.palette[1];

    c.bench_function("smoothing_pass_256", |b| {
        b.iter(|| {
            let mut grid = world.grid.clone();
            black_box(smooth_pass(&mut grid, &params, &world.surface_offsets, wall))
        });
    });
}

criterion_group!(
    benches,
    benchmark_default_world,
    benchmark_wide_world,
    benchmark_smoothing_pass
);
criterion_main!(benches);
