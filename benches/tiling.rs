//! Tiling pipeline timings on a mid-sized gradient image.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use image::Rgb;
use seamweave::core::buffer::RgbBuffer;
use seamweave::texture::{PatternType, TextureTiler, TilerParams};
use std::hint::black_box;

fn source() -> RgbBuffer {
    RgbBuffer::from_fn(256, 192, |x, y| {
        Rgb([x as f32 / 256.0, y as f32 / 192.0, ((x ^ y) & 31) as f32 / 31.0])
    })
}

/// Each seam construction with everything else at defaults.
fn bench_patterns(c: &mut Criterion) {
    let image = source();
    let mut group = c.benchmark_group("pattern");
    for pattern in PatternType::ALL {
        let Ok(tiler) = TextureTiler::new(TilerParams {
            pattern_type: *pattern,
            tile_size: 256,
            ..TilerParams::default()
        }) else {
            return;
        };
        group.bench_with_input(BenchmarkId::from_parameter(pattern), &image, |b, image| {
            b.iter(|| black_box(tiler.run(image)));
        });
    }
    group.finish();
}

/// Every optional stage switched on.
fn bench_full_pipeline(c: &mut Criterion) {
    let image = source();
    let Ok(tiler) = TextureTiler::new(TilerParams {
        tile_size: 256,
        detail_level: 1.5,
        edge_blur: 40.0,
        edge_fade: 20.0,
        color_correction: true,
        light_equalization: 50.0,
        gradient_removal: 50.0,
        ..TilerParams::default()
    }) else {
        return;
    };
    c.bench_function("full_pipeline", |b| b.iter(|| black_box(tiler.run(&image))));
}

criterion_group!(benches, bench_patterns, bench_full_pipeline);
criterion_main!(benches);
