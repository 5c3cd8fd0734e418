//! Benchmarks for the CPU-side setup work: shader assembly and random
//! table generation. Both run once per system, but they sit on the startup
//! path and regressions there show up as window-open latency.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use embers::profile::Profile;
use embers::random::RandomTable;
use embers::shaders;

fn bench_shader_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("shader_assembly");

    group.bench_function("simulation_smoke", |b| {
        let profile = Profile::smoke();
        b.iter(|| black_box(shaders::simulation_shader(&profile)))
    });

    group.bench_function("simulation_rain", |b| {
        let profile = Profile::rain();
        b.iter(|| black_box(shaders::simulation_shader(&profile)))
    });

    group.bench_function("render_smoke", |b| {
        let profile = Profile::smoke();
        b.iter(|| black_box(shaders::render_shader(&profile)))
    });

    group.finish();
}

fn bench_random_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_table");

    for len in [256u32, 1024, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| black_box(RandomTable::new(len, 42)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shader_assembly, bench_random_table);
criterion_main!(benches);
