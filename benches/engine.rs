//! Benchmarks for maze rendering, deviation scoring and a generation step.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use maze_evo::{
    Chromosome, EvolutionConfig, EvolutionEngine, Gene, MazeRng, RenderLayout,
    compute::metrics,
    schema::{GridConfig, PopulationConfig},
};

fn grid(blocks: usize) -> GridConfig {
    GridConfig {
        blocks_y: blocks,
        blocks_x: blocks,
        block_height: 8,
        block_width: 8,
    }
}

fn reference(size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    })
}

fn bench_maze_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("maze_fill");

    for size in [4, 8, 16, 32] {
        let mut rng = MazeRng::new(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, &size| {
                b.iter(|| Gene::random(black_box(size), size, &mut rng, None));
            },
        );
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for blocks in [4, 8, 16] {
        let grid = grid(blocks);
        let layout = RenderLayout::new(grid, 4, 4);
        let chromosome = Chromosome::random(grid, &mut MazeRng::new(42), None);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}_blocks", blocks, blocks)),
            &blocks,
            |b, _| {
                b.iter(|| chromosome.render(black_box(&layout)));
            },
        );
    }

    group.finish();
}

fn bench_deviation(c: &mut Criterion) {
    let mut group = c.benchmark_group("deviation");

    for size in [128, 256, 512] {
        let a = reference(size);
        let b = RgbImage::new(size, size);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |bench, _| {
                bench.iter(|| metrics::deviation(black_box(&a), black_box(&b)));
            },
        );
    }

    group.finish();
}

fn bench_generation_step(c: &mut Criterion) {
    let config = EvolutionConfig {
        grid: grid(8),
        population: PopulationConfig {
            mutations: 20,
            siblings: 4,
            survivors: 10,
            generations: 1,
        },
        random_seed: Some(42),
        ..Default::default()
    };

    let mut engine = match EvolutionEngine::new(config, reference(256)) {
        Ok(engine) => engine,
        Err(e) => panic!("benchmark setup failed: {e}"),
    };

    c.bench_function("generation_step_8x8_blocks", |b| {
        b.iter(|| engine.step());
    });
}

criterion_group!(
    benches,
    bench_maze_fill,
    bench_render,
    bench_deviation,
    bench_generation_step
);
criterion_main!(benches);
