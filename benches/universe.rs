//! Benchmarks for the universe and the incremental renderers.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use life_view::{
    engine::{Engine, Universe},
    render::{PixelSurface, RasterBackend, RenderBackend, SceneBackend, SoftwareRenderer},
    schema::Palette,
};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for size in [64u16, 128, 256, 512] {
        let mut universe = Universe::new(size, size, Some(42));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    universe.tick();
                    universe.clear_changed_cells();
                    black_box(&universe);
                });
            },
        );
    }

    group.finish();
}

fn bench_raster_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_frame");

    for size in [64u16, 128, 256] {
        let mut universe = Universe::new(size, size, Some(42));
        let mut backend = RasterBackend::new(Palette::default());
        backend
            .initialize(PixelSurface::new(512, 512), &universe)
            .unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    for _ in 0..3 {
                        universe.tick();
                    }
                    black_box(backend.draw_frame(&mut universe).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_scene_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_frame");

    for size in [64u16, 128] {
        let mut universe = Universe::new(size, size, Some(42));
        let mut backend = SceneBackend::new(Palette::default(), 100.0);
        backend
            .initialize(SoftwareRenderer::new(PixelSurface::new(512, 512)), &universe)
            .unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    for _ in 0..3 {
                        universe.tick();
                    }
                    black_box(backend.draw_frame(&mut universe).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_raster_frame, bench_scene_frame);
criterion_main!(benches);
